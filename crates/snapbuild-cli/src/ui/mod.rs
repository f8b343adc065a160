//! Terminal status lines.
//!
//! ```no_run
//! use snapbuild_cli::ui;
//!
//! ui::init_colors(false);
//! ui::info("Building src/index.js");
//! ui::success("Bundle written");
//! ```

mod format;
mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use format::{format_duration, format_size};
pub use messages::{error, info, success, warning};

static COLORS_ENABLED: AtomicBool = AtomicBool::new(true);

/// Whether the terminal should get ANSI colors.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise colors follow whether
/// stderr is an attended terminal.
pub fn should_use_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::user_attended_stderr()
}

/// Decide once whether status lines are colored. Call early in `main`.
pub fn init_colors(no_color: bool) {
    COLORS_ENABLED.store(!no_color && should_use_color(), Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS_ENABLED.load(Ordering::Relaxed)
}
