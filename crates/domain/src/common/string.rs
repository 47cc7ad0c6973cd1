//! String conversion utilities.

/// Converts an empty string to `None`, otherwise returns `Some(value)`.
///
/// Sheet slots treat an empty string as "nothing entered".
///
/// # Examples
///
/// ```
/// use sheetkeep_domain::common::none_if_empty;
///
/// assert_eq!(none_if_empty("hello"), Some("hello"));
/// assert_eq!(none_if_empty(""), None);
/// assert_eq!(none_if_empty(" "), Some(" ")); // Whitespace is not empty
/// ```
pub fn none_if_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Returns `value` unless it is empty, in which case `fallback` is returned.
///
/// # Examples
///
/// ```
/// use sheetkeep_domain::common::or_fallback;
///
/// assert_eq!(or_fallback("Troy", "Unnamed Hero"), "Troy");
/// assert_eq!(or_fallback("", "Unnamed Hero"), "Unnamed Hero");
/// ```
pub fn or_fallback<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    none_if_empty(value).unwrap_or(fallback)
}

/// Joins the non-empty parts with `separator`.
///
/// # Examples
///
/// ```
/// use sheetkeep_domain::common::join_non_empty;
///
/// assert_eq!(join_non_empty(["Elf", "", "Sage"], " · "), "Elf · Sage");
/// ```
pub fn join_non_empty<'a>(parts: impl IntoIterator<Item = &'a str>, separator: &str) -> String {
    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_if_empty_with_content() {
        assert_eq!(none_if_empty("hello"), Some("hello"));
        assert_eq!(none_if_empty("hello world"), Some("hello world"));
    }

    #[test]
    fn test_none_if_empty_empty_string() {
        assert_eq!(none_if_empty(""), None);
    }

    #[test]
    fn test_none_if_empty_whitespace_is_not_empty() {
        assert_eq!(none_if_empty(" "), Some(" "));
        assert_eq!(none_if_empty("\t"), Some("\t"));
    }

    #[test]
    fn test_or_fallback() {
        assert_eq!(or_fallback("Wizard", "Classless Wanderer"), "Wizard");
        assert_eq!(or_fallback("", "Classless Wanderer"), "Classless Wanderer");
    }

    #[test]
    fn test_join_non_empty_skips_blanks() {
        assert_eq!(join_non_empty(["", ""], " · "), "");
        assert_eq!(join_non_empty(["Lawful Good", "Level 3"], " · "), "Lawful Good · Level 3");
    }
}
