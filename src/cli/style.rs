//! Terminal styling helpers

use indicatif::ProgressStyle;
use owo_colors::{OwoColorize, Stream, Style};

/// Check mark used for completed steps
pub const CHECK: &str = "✓";

/// Semantic styles for CLI output
pub trait Stylize {
    /// Secondary, low-emphasis text
    fn muted(&self) -> String;
    /// Bold text
    fn emphasis(&self) -> String;
    /// Highlighted values (counts, ids)
    fn accent(&self) -> String;
    /// Warnings
    fn warn(&self) -> String;
    /// Errors
    fn error(&self) -> String;
}

fn paint(text: &str, style: Style) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.style(style))
        .to_string()
}

impl<T: AsRef<str>> Stylize for T {
    fn muted(&self) -> String {
        paint(self.as_ref(), Style::new().dimmed())
    }

    fn emphasis(&self) -> String {
        paint(self.as_ref(), Style::new().bold())
    }

    fn accent(&self) -> String {
        paint(self.as_ref(), Style::new().cyan())
    }

    fn warn(&self) -> String {
        paint(self.as_ref(), Style::new().yellow())
    }

    fn error(&self) -> String {
        paint(self.as_ref(), Style::new().red().bold())
    }
}

/// Green check mark
pub fn check() -> String {
    paint(CHECK, Style::new().green())
}

/// Render a merge color token as a colored tag
pub fn color_tag(token: &str) -> String {
    let style = match token {
        "blue" => Style::new().blue(),
        "green" => Style::new().green(),
        "purple" => Style::new().magenta(),
        "orange" => Style::new().yellow(),
        "pink" => Style::new().bright_magenta(),
        "teal" => Style::new().cyan(),
        _ => Style::new().white(),
    };
    paint(&format!("[{token}]"), style)
}

/// Spinner style for long-running store calls
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}
