//! Distance functions. Smaller is always more similar.

use ethlens_core::Metric;

/// Cosine distance assigned to a zero candidate row.
pub const MAX_COSINE_DISTANCE: f64 = 2.0;

pub fn euclidean(a: &[f32], b: &[f32]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = f64::from(*x) - f64::from(*y);
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

pub fn norm(a: &[f32]) -> f64 {
    a.iter().map(|x| f64::from(*x).powi(2)).sum::<f64>().sqrt()
}

/// `1 - cos(a, b)`, given the precomputed norm of `a`.
///
/// `a_norm` must be non-zero. A zero `b` gets [`MAX_COSINE_DISTANCE`].
pub fn cosine_with_norm(a: &[f32], a_norm: f64, b: &[f32]) -> f64 {
    let b_norm = norm(b);
    if b_norm == 0.0 {
        return MAX_COSINE_DISTANCE;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| f64::from(*x) * f64::from(*y)).sum();
    1.0 - dot / (a_norm * b_norm)
}

/// Distance between a query row (with its norm) and a candidate row.
pub fn distance(metric: Metric, query: &[f32], query_norm: f64, candidate: &[f32]) -> f64 {
    match metric {
        Metric::Euclidean => euclidean(query, candidate),
        Metric::Cosine => cosine_with_norm(query, query_norm, candidate),
    }
}
