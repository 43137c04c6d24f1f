//! Input validation.

/// Check an email address against `local@domain.tld`.
///
/// Exactly one `@`, no whitespace, a non-empty local part, and a domain
/// containing a `.` with text on both sides.
pub fn is_valid_email(input: &str) -> bool {
    if input.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = input.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_simple_addresses() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@mail.example.com"));
    }

    #[test]
    fn test_rejects_missing_parts() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_rejects_whitespace_and_double_at() {
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@b.co "));
        assert!(!is_valid_email("a@b@c.co"));
    }
}
