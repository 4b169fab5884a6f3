//! Human-readable reporting of validation failures.
//!
//! Each failing field becomes one line, `<message> for --<flag>`, followed by
//! the parser's help text. [`CaepBuilder::load`](crate::CaepBuilder::load)
//! prints this and exits with [`EXIT_VALIDATION`] unless configured to return
//! the error instead.

use crate::error::ValidationError;

/// Process exit status after a reported validation failure.
pub const EXIT_VALIDATION: i32 = 1;

/// Render the per-field report followed by `usage`.
pub fn render(err: &ValidationError, usage: &str) -> String {
    let mut out = String::new();
    for issue in &err.issues {
        out.push_str(&issue.to_string());
        out.push('\n');
    }
    if !usage.is_empty() {
        out.push('\n');
        out.push_str(usage.trim_end());
        out.push('\n');
    }
    out
}
