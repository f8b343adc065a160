//! Status messages on stderr.

use owo_colors::{OwoColorize, Style};

use super::colors_enabled;

fn paint(text: &str, style: Style) -> String {
    if colors_enabled() {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Print a success line.
///
/// ```no_run
/// snapbuild_cli::ui::success("Bundle written to dist/bundle.js");
/// ```
pub fn success(message: &str) {
    eprintln!("{} {}", paint("✓", Style::new().green().bold()), message);
}

pub fn info(message: &str) {
    eprintln!("{} {}", paint("ℹ", Style::new().blue().bold()), message);
}

pub fn warning(message: &str) {
    eprintln!(
        "{} {}",
        paint("⚠", Style::new().yellow().bold()),
        paint(message, Style::new().yellow())
    );
}

pub fn error(message: &str) {
    eprintln!(
        "{} {}",
        paint("✗", Style::new().red().bold()),
        paint(message, Style::new().red())
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_do_not_panic() {
        success("ok");
        info("info");
        warning("careful");
        error("failed");
    }
}
