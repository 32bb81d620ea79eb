//! ethlens Core Library
//!
//! Domain models, configuration and dataset handling for the Ethereum
//! transaction explorer.

pub mod address;
pub mod config;
pub mod dataset;
pub mod error;
pub mod options;
pub mod timeline;
pub mod transaction;

pub use config::{load_config, Config};
pub use error::{EthlensError, EthlensResult};
pub use options::{Expansion, Metric};
