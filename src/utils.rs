use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, distr::Alphanumeric};
use tabled::Table;

use crate::types::{Track, TrackTableRow};

pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(30)
        .map(char::from)
        .collect()
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Renders stored records as a table, sorted by key for stable output.
pub fn render_track_table(records: &[(String, Track)]) -> String {
    let mut rows: Vec<TrackTableRow> = records
        .iter()
        .map(|(key, track)| TrackTableRow::new(key, track))
        .collect();
    rows.sort_by(|a, b| a.key.cmp(&b.key));
    Table::new(rows).to_string()
}
