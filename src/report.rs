//! Ranking and fixed-width rendering of room reports.

use crate::room::{AvailabilitySignal, RoomReport};
use std::fmt::Write;
use yansi::Paint;

pub const NAME_WIDTH: usize = 55;
pub const STATE_LABEL_WIDTH: usize = 10;
const STATE_LABEL: &str = "State:";

#[derive(Debug, Clone, Copy, Default)]
pub struct FormatOptions {
    /// Colour the state text with ANSI escapes.
    pub color: bool,
}

/// Sort reports most-free-time first. The sort is stable, so equal keys
/// keep their incoming order.
pub fn rank(reports: &mut [RoomReport]) {
    reports.sort_by_key(|report| std::cmp::Reverse(report.sort_key()));
}

fn render_state(signal: AvailabilitySignal, options: FormatOptions) -> String {
    let text = signal.to_string();
    if !options.color {
        return text;
    }
    match signal {
        AvailabilitySignal::Occupied => text.red().to_string(),
        AvailabilitySignal::FreeForHorizon => text.green().bold().to_string(),
        AvailabilitySignal::FreeForMinutes(_) => text.yellow().to_string(),
    }
}

/// Render a single report line (without trailing newline).
pub fn render_line(report: &RoomReport, options: FormatOptions) -> String {
    let Some(signal) = report.signal else {
        return report.display_name.clone();
    };

    let mut line = format!(
        "{:<NAME_WIDTH$}{:<STATE_LABEL_WIDTH$}{}",
        report.display_name,
        STATE_LABEL,
        render_state(signal, options)
    );
    if let Some(link) = &report.nav_link {
        let _ = write!(line, "  {link}");
    }
    line
}

/// Rank `reports` and render the whole report, one line per room.
pub fn format(mut reports: Vec<RoomReport>, options: FormatOptions) -> String {
    rank(&mut reports);
    let mut out = String::new();
    for report in &reports {
        out.push_str(&render_line(report, options));
        out.push('\n');
    }
    out
}
