//! Small text helpers for display-only fields

/// Upper-cases the first character, leaving the rest untouched.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Percent-encodes a value used as a single URL path segment.
pub fn path_segment(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_first() {
        assert_eq!(capitalize_first("anna andersson"), "Anna andersson");
        assert_eq!(capitalize_first("Bo"), "Bo");
        assert_eq!(capitalize_first("örjan"), "Örjan");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_path_segment() {
        assert_eq!(path_segment("a@x.com"), "a%40x.com");
        assert_eq!(path_segment("a b/c"), "a%20b%2Fc");
    }
}
