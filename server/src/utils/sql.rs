//! SQL utility functions

/// Escape SQL LIKE metacharacters (%, _, \) in user input
///
/// Patterns built from the result must be matched with `ESCAPE '\'`.
///
/// # Example
///
/// ```
/// use carelink_server::utils::sql::escape_like_pattern;
///
/// let user_input = "100% match_test";
/// let pattern = format!("%{}%", escape_like_pattern(user_input));
/// assert_eq!(pattern, "%100\\% match\\_test%");
/// ```
pub fn escape_like_pattern(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Case-insensitive substring pattern, matched against `UPPER(column)`
///
/// SQLite's `UPPER` only folds ASCII letters, so the pattern is folded the same way.
pub fn contains_pattern(s: &str) -> String {
    format!("%{}%", escape_like_pattern(&s.to_ascii_uppercase()))
}

/// `?, ?, ?` for `n` bound parameters
pub fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}
