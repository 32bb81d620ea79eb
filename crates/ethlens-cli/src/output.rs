//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use unicode_width::UnicodeWidthStr;

use ethlens_core::address::model::AddressRecord;
use ethlens_core::timeline::model::{ActivityProfile, Bucket, Frequency};
use ethlens_embedding::Neighbor;
use ethlens_graph::{EgoGraph, NodeTable};

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Shorten an address to `max_width`, keeping both ends.
fn shorten(s: &str, max_width: usize) -> String {
    let width = UnicodeWidthStr::width(s);
    if width <= max_width || max_width < 8 || !s.is_ascii() {
        return s.to_string();
    }
    let keep = (max_width - 2) / 2;
    format!("{}..{}", &s[..keep], &s[s.len() - keep..])
}

fn category(record: &AddressRecord) -> ColoredString {
    if record.phish_flag {
        "phishing".red()
    } else if record.is_paired() {
        format!("pair {}", record.pair_idx).yellow()
    } else {
        "-".dimmed()
    }
}

/// Print one node-table record.
pub fn print_record(record: &AddressRecord) {
    println!(
        "{} {}",
        record.address.cyan().bold(),
        format!("(id {})", record.id).dimmed()
    );
    println!("  {}: {}", "Type".bold(), record.node_type);
    println!("  {}: {}", "Label".bold(), category(record));
}

/// Print the edges of an ego-subgraph as a table.
pub fn print_ego_table(graph: &EgoGraph, nodes: &NodeTable) {
    if graph.is_empty() {
        println!("{}", "No edges within two hops.".dimmed());
        return;
    }

    // Two address columns share what is left after value, count and hop.
    let addr_width = term_width().saturating_sub(36).clamp(12, 44) / 2;
    println!(
        "{} {} {:>14} {:>7} {:>4}",
        pad_right("FROM", addr_width),
        pad_right("TO", addr_width),
        "VALUE (ETH)",
        "COUNT",
        "HOP"
    );
    println!("{}", "─".repeat(addr_width * 2 + 30));

    for edge in &graph.edges {
        let from = nodes.address_of(edge.from_id).unwrap_or("?");
        let to = nodes.address_of(edge.to_id).unwrap_or("?");
        let hop = if edge.hop == 1 {
            "1".green()
        } else {
            "2".normal()
        };
        let mark = |id: u32, s: String| {
            let padded = pad_right(&s, addr_width);
            if graph.focal.contains(&id) {
                padded.cyan().bold()
            } else {
                padded.normal()
            }
        };
        println!(
            "{} {} {:>14.4} {:>7} {:>4}",
            mark(edge.from_id, shorten(from, addr_width)),
            mark(edge.to_id, shorten(to, addr_width)),
            edge.value,
            edge.count,
            hop
        );
    }

    println!();
    println!(
        "{} edge(s), {} node(s), expansion {}",
        graph.len(),
        graph.node_ids().len(),
        graph.expansion
    );
}

/// Print a neighbor ranking.
pub fn print_neighbors_table(neighbors: &[Neighbor], nodes: Option<&NodeTable>) {
    if neighbors.is_empty() {
        println!("{}", "No neighbors found.".dimmed());
        return;
    }

    println!("{:>4}  {:<44} {:>12}  {}", "#", "ADDRESS", "SCORE", "LABEL");
    println!("{}", "─".repeat(74));
    for (rank, n) in neighbors.iter().enumerate() {
        let label = nodes
            .and_then(|t| t.lookup(&n.address).ok())
            .map(category)
            .unwrap_or_else(|| "".normal());
        println!(
            "{:>4}  {} {:>12.4}  {}",
            rank + 1,
            pad_right(&n.address, 44),
            n.score,
            label
        );
    }
}

/// Print buckets as a horizontal bar chart scaled to the terminal.
pub fn print_buckets(buckets: &[Bucket], freq: Frequency) {
    if buckets.is_empty() {
        println!("{}", "No transactions in range.".dimmed());
        return;
    }

    let fmt = match freq {
        Frequency::Hourly => "%Y-%m-%d %H:00",
        Frequency::Daily => "%Y-%m-%d",
        Frequency::Monthly => "%Y-%m",
    };
    let labels: Vec<String> = buckets.iter().map(|b| b.start.format(fmt).to_string()).collect();
    let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
    print_bars(&labels, &counts);
}

/// Print hourly and weekday profiles.
pub fn print_profile(profile: &ActivityProfile) {
    println!("{}", "By hour of day (UTC)".bold());
    let hours: Vec<String> = (0..24).map(|h| format!("{:02}h", h)).collect();
    print_bars(&hours, &profile.hourly);
    println!();
    println!("{}", "By weekday".bold());
    let days: Vec<String> = WEEKDAYS.iter().map(|d| d.to_string()).collect();
    print_bars(&days, &profile.weekly);
}

fn print_bars(labels: &[String], counts: &[usize]) {
    let label_width = labels.iter().map(|l| UnicodeWidthStr::width(l.as_str())).max().unwrap_or(0);
    let max = counts.iter().copied().max().unwrap_or(0).max(1);
    let count_width = max.to_string().len();
    let bar_width = term_width().saturating_sub(label_width + count_width + 4).max(10);

    for (label, &count) in labels.iter().zip(counts) {
        let len = count * bar_width / max;
        println!(
            "{} {:>cw$} {}",
            pad_right(label, label_width),
            count,
            "█".repeat(len).blue(),
            cw = count_width
        );
    }
}
