//! Output formatting for the CLI.
//!
//! Rendered HTML and JSON go to stdout; everything else goes to stderr so
//! the output can be piped into a file.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        eprintln!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        eprintln!("  {} {}", style("•").dim(), item);
    }

    /// Print rendered HTML.
    pub fn html(&self, html: &str) {
        println!("{}", html);
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print `value` as JSON in JSON mode, else the HTML `render` produces.
    pub fn emit<T: serde::Serialize>(&self, value: &T, render: impl FnOnce() -> String) {
        if self.json {
            self.json(value);
        } else {
            self.html(&render());
        }
    }

    /// Create a spinner for a fetch.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(template);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Status badge for query and page states.
pub fn status_badge(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "ready" | "success" | "ok" => style(status).green().to_string(),
        "loading" | "partial" => style(status).yellow().to_string(),
        "failed" | "error" | "missing" => style(status).red().to_string(),
        _ => status.to_string(),
    }
}

/// Format a duration in seconds as a short human-readable string.
pub fn format_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(45), "45s");
        assert_eq!(format_duration(1800), "30m 0s");
        assert_eq!(format_duration(7260), "2h 1m");
    }

    #[test]
    fn test_status_badge_keeps_text() {
        console::set_colors_enabled(false);
        assert_eq!(status_badge("ready"), "ready");
        assert_eq!(status_badge("unknown"), "unknown");
    }
}
