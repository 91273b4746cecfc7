//! De-duplicated parser diagnostics.
//!
//! Diagnostics that are not parse errors (skipped fixtures, unsupported
//! options) are reported through the `log` facade. Repeating the same
//! message would flood the output on large inputs, so each unique message is
//! forwarded once per thread until [`clear_warnings`] is called.

use std::cell::RefCell;
use std::collections::HashSet;

thread_local! {
    /// Warnings already forwarded on this thread.
    static WARNED: RefCell<HashSet<String>> = RefCell::new(HashSet::new());
}

/// Warn about a condition once per unique `component`/`message` pair.
///
/// Returns `true` if the warning was forwarded, `false` if it had already
/// been reported on this thread.
///
/// # Example
/// ```
/// use sapling_common::warning::{clear_warnings, warn_once};
///
/// clear_warnings();
/// assert!(warn_once("HTML Fixtures", "fragment cases are skipped"));
/// assert!(!warn_once("HTML Fixtures", "fragment cases are skipped"));
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let first_time = WARNED.with(|warned| warned.borrow_mut().insert(key));

    if first_time {
        log::warn!(target: "sapling", "[{component}] {message}");
    }
    first_time
}

/// Forget every recorded warning (call before starting an unrelated parse).
pub fn clear_warnings() {
    WARNED.with(|warned| warned.borrow_mut().clear());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_warning_is_suppressed() {
        clear_warnings();
        assert!(warn_once("Test", "first"));
        assert!(!warn_once("Test", "first"));
        assert!(warn_once("Test", "second"));
        assert!(warn_once("Other", "first"));
    }

    #[test]
    fn clearing_allows_warning_again() {
        clear_warnings();
        assert!(warn_once("Test", "again"));
        clear_warnings();
        assert!(warn_once("Test", "again"));
    }
}
