pub mod check;
pub mod import;
pub mod inspect;
pub mod list;
pub mod load;

use indicatif::{ProgressBar, ProgressStyle};
use stickerpack_core::{CoreError, ErrorKind};
use stickerpack_schema::PackSummary;
use std::time::Duration;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_MANIFEST_ERROR: u8 = 2;
pub const EXIT_STORE_ERROR: u8 = 3;

/// A failed command: the message for stderr and the process exit code.
#[derive(Debug)]
pub struct Failure {
    pub code: u8,
    pub message: String,
}

impl From<CoreError> for Failure {
    fn from(e: CoreError) -> Self {
        Self {
            code: exit_code(e.kind()),
            message: e.to_string(),
        }
    }
}

impl From<String> for Failure {
    fn from(message: String) -> Self {
        Self {
            code: EXIT_FAILURE,
            message,
        }
    }
}

pub fn exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::Structural | ErrorKind::Schema | ErrorKind::Invariant => EXIT_MANIFEST_ERROR,
        ErrorKind::StoreUnavailable | ErrorKind::AssetUnavailable => EXIT_STORE_ERROR,
        ErrorKind::Config => EXIT_FAILURE,
    }
}

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

fn finished_style() -> ProgressStyle {
    ProgressStyle::with_template("{msg}").unwrap_or_else(|_| ProgressStyle::default_spinner())
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
    pb.set_style(style);
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(finished_style());
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    pb.set_style(finished_style());
    pb.finish_with_message(format!("✗ {msg}"));
}

/// Human-readable byte count, e.g. `12.3 KiB`.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}

pub fn print_summaries(summaries: &[PackSummary], json: bool) -> Result<(), String> {
    if json {
        println!("{}", json_pretty(&summaries)?);
        return Ok(());
    }
    let bold = console::Style::new().bold();
    println!(
        "{:<24} {:<24} {:<20} {:>8} {:>10}",
        "IDENTIFIER", "NAME", "PUBLISHER", "STICKERS", "SIZE"
    );
    for s in summaries {
        println!(
            "{:<24} {:<24} {:<20} {:>8} {:>10}",
            bold.apply_to(s.identifier.as_str()),
            s.name,
            s.publisher,
            s.items,
            format_size(s.total_size)
        );
    }
    Ok(())
}
