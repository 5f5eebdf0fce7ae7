use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::presentation::Tone;

/// Spinner shown while a blocking step (license check, downloads) runs
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.magenta} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"]),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spinner_success(pb: &ProgressBar, message: &str) {
    pb.finish_and_clear();
    println!("{} {}", style("✓").green().bold(), message);
}

pub fn spinner_error(pb: &ProgressBar, message: &str) {
    pb.finish_and_clear();
    println!("{} {}", style("✗").red().bold(), message);
}

/// Render one status line in its tone's colour
pub fn status_line(message: &str, tone: Tone) -> String {
    let styled = match tone {
        Tone::Info => style(message).white(),
        Tone::Pending => style(message).yellow(),
        Tone::Success => style(message).green(),
        Tone::Error => style(message).red(),
    };
    styled.to_string()
}
