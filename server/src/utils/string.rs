//! String utility functions

/// Replace line breaks and tabs so a value cannot forge extra log lines
pub fn single_line(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => '_',
            other => other,
        })
        .collect()
}

/// Split a comma-separated parameter value, trimming each item
///
/// An empty input yields no items.
pub fn split_csv(value: &str) -> Vec<&str> {
    if value.trim().is_empty() {
        return Vec::new();
    }
    value.split(',').map(str::trim).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_replaces_control_chars() {
        assert_eq!(single_line("a\nb\r\tc"), "a_b__c");
        assert_eq!(single_line("plain"), "plain");
    }

    #[test]
    fn test_split_csv() {
        assert_eq!(split_csv("1, 2,3"), vec!["1", "2", "3"]);
        assert_eq!(split_csv("solo"), vec!["solo"]);
        assert!(split_csv("").is_empty());
        assert!(split_csv("  ").is_empty());
    }
}
