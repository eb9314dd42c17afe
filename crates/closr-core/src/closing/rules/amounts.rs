//! Numeric normalizers: currency, percentage and integer values.

/// Parse a currency amount such as `"$1,234.56"`.
///
/// Thousand separators are dropped, then everything but digits and `.` is
/// stripped. Signs and parenthesized negatives are not recognized.
pub fn parse_currency(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .replace(',', "")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a percentage as written: `"5.25%"` is `5.25`, not `0.0525`.
pub fn parse_percentage(raw: &str) -> Option<f64> {
    parse_currency(&raw.replace('%', ""))
}

/// Parse a whole number, truncating a decimal part (`"30.0"` is `30`).
///
/// Anything other than digits with at most one decimal point is rejected, as
/// is a value outside the `i64` range.
pub fn parse_integer(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.matches('.').count() > 1 {
        return None;
    }

    let digits = s.replace('.', "");
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole = s.split('.').next().unwrap_or("");
    if whole.is_empty() {
        return Some(0);
    }
    whole.parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("$1,234.56"), Some(1234.56));
        assert_eq!(parse_currency("350,000.00"), Some(350000.0));
        assert_eq!(parse_currency("USD 1 200"), Some(1200.0));
        assert_eq!(parse_currency("$2,100.00 per year"), Some(2100.0));
    }

    #[test]
    fn test_parse_currency_without_digits() {
        assert_eq!(parse_currency(""), None);
        assert_eq!(parse_currency("N/A"), None);
        assert_eq!(parse_currency("$"), None);
        assert_eq!(parse_currency("."), None);
    }

    #[test]
    fn test_parse_currency_malformed() {
        assert_eq!(parse_currency("1.234.56"), None);
        // Sign is stripped, not honored.
        assert_eq!(parse_currency("-500"), Some(500.0));
        assert_eq!(parse_currency("(500.00)"), Some(500.0));
    }

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage("5.25%"), Some(5.25));
        assert_eq!(parse_percentage("5.25"), Some(5.25));
        assert_eq!(parse_percentage("3 %"), Some(3.0));
        assert_eq!(parse_percentage("%"), None);
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_integer("30"), Some(30));
        assert_eq!(parse_integer("30.0"), Some(30));
        assert_eq!(parse_integer("29.9"), Some(29));
        assert_eq!(parse_integer("1998"), Some(1998));
    }

    #[test]
    fn test_parse_integer_rejects_non_digits() {
        assert_eq!(parse_integer("thirty"), None);
        assert_eq!(parse_integer("30 years"), None);
        assert_eq!(parse_integer("3.0.0"), None);
        assert_eq!(parse_integer("1,500"), None);
        assert_eq!(parse_integer("."), None);
        assert_eq!(parse_integer(""), None);
    }

    #[test]
    fn test_parse_integer_out_of_range() {
        assert_eq!(parse_integer("99999999999999999999"), None);
        assert_eq!(parse_integer("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_integer(".5"), Some(0));
    }
}
