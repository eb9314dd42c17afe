//! Text cleanup applied before field extraction.

use super::rules::patterns::{HYPHEN_LINE_BREAK, WHITESPACE_RUN};

/// Rejoin hyphenated line wraps, collapse whitespace and trim.
///
/// Idempotent: the output has no line breaks left to unwrap.
pub fn normalize(text: &str) -> String {
    let unwrapped = HYPHEN_LINE_BREAK.replace_all(text, "");
    collapse_whitespace(&unwrapped)
}

/// Collapse every whitespace run to a single space and trim.
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejoins_hyphenated_wrap() {
        assert_eq!(normalize("Refi-\n   nance Agreement"), "Refinance Agreement");
        assert_eq!(normalize("Spring-  \r\nfield"), "Springfield");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(
            normalize("  Loan Amount\n\tof   $350,000.00 \n"),
            "Loan Amount of $350,000.00"
        );
    }

    #[test]
    fn test_keeps_inline_hyphens() {
        assert_eq!(normalize("ZIP 62704-1234"), "ZIP 62704-1234");
        assert_eq!(normalize("A - B"), "A - B");
    }

    #[test]
    fn test_idempotent() {
        let text = "Closing  Date:\n01/15/2024 -\n end";
        let once = normalize(text);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }
}
