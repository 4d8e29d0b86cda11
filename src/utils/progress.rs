//! Progress bars for per-file fan-out

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Styled bar, or a hidden one when progress output is off
pub fn create_progress_bar(total: u64, message: &str, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {pos:>7}/{len:7} ({eta})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━━─");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
