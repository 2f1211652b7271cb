//! Status lines on stderr.
//!
//! Reports go to stdout; everything a human reads while the run is in
//! progress goes through these helpers so it never mixes with piped output.

mod messages;

use std::sync::atomic::{AtomicBool, Ordering};

pub use messages::{error, info, success, warning};

static COLORS: AtomicBool = AtomicBool::new(false);

/// Decide once whether status lines are colored.
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && crate::logger::should_use_colors(), Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

/// `1 error`, `2 warnings`.
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural() {
        assert_eq!(plural(0, "error"), "0 errors");
        assert_eq!(plural(1, "warning"), "1 warning");
        assert_eq!(plural(12, "module"), "12 modules");
    }

    #[test]
    fn test_no_color_flag_disables_colors() {
        init_colors(true);
        assert!(!colors_enabled());
    }
}
