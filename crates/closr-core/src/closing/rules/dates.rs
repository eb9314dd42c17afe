//! Date normalization for US-style closing documents.

use chrono::NaiveDate;

use super::patterns::{DATE_LONG, DATE_MDY, DATE_YMD};

/// Parse the first date found in `raw`.
///
/// Accepts `M/D/YYYY`, `M-D-YY`, `YYYY-MM-DD` and `January 15, 2024` style
/// dates. Impossible dates (`02/30/2024`) yield `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    // YYYY-MM-DD first so "2024-01-15" is never read as a two-digit year
    if let Some(caps) = DATE_YMD.captures(raw) {
        let year: i32 = caps[1].parse().unwrap_or(0);
        let month: u32 = caps[2].parse().unwrap_or(0);
        let day: u32 = caps[3].parse().unwrap_or(0);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    if let Some(caps) = DATE_MDY.captures(raw) {
        let month: u32 = caps[1].parse().unwrap_or(0);
        let day: u32 = caps[2].parse().unwrap_or(0);
        let year = parse_year(&caps[3]);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    for caps in DATE_LONG.captures_iter(raw) {
        let Some(month) = month_to_number(&caps[1]) else {
            continue;
        };
        let day: u32 = caps[2].parse().unwrap_or(0);
        let year: i32 = caps[3].parse().unwrap_or(0);
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return Some(date);
        }
    }

    None
}

fn parse_year(s: &str) -> i32 {
    let year: i32 = s.parse().unwrap_or(0);
    if year < 100 {
        // Two-digit year: assume 2000s for 00-50, 1900s for 51-99
        if year <= 50 {
            2000 + year
        } else {
            1900 + year
        }
    } else {
        year
    }
}

fn month_to_number(month: &str) -> Option<u32> {
    let month = month.to_lowercase();
    let number = match month.as_str() {
        "january" | "jan" => 1,
        "february" | "feb" => 2,
        "march" | "mar" => 3,
        "april" | "apr" => 4,
        "may" => 5,
        "june" | "jun" => 6,
        "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sept" | "sep" => 9,
        "october" | "oct" => 10,
        "november" | "nov" => 11,
        "december" | "dec" => 12,
        _ => return None,
    };
    Some(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_parse_us_numeric() {
        assert_eq!(parse_date("01/15/2024"), ymd(2024, 1, 15));
        assert_eq!(parse_date("1-5-2024"), ymd(2024, 1, 5));
        assert_eq!(parse_date("12/31/99"), ymd(1999, 12, 31));
        assert_eq!(parse_date("3/1/24"), ymd(2024, 3, 1));
    }

    #[test]
    fn test_parse_iso() {
        assert_eq!(parse_date("2024-01-15"), ymd(2024, 1, 15));
    }

    #[test]
    fn test_parse_long_form() {
        assert_eq!(parse_date("January 15, 2024"), ymd(2024, 1, 15));
        assert_eq!(parse_date("Effective on Sept. 3rd, 2023"), ymd(2023, 9, 3));
        assert_eq!(parse_date("dec 1 2022"), ymd(2022, 12, 1));
    }

    #[test]
    fn test_invalid_dates() {
        assert_eq!(parse_date("02/30/2024"), None);
        assert_eq!(parse_date("TBD"), None);
        assert_eq!(parse_date("Someday 15, 2024"), None);
        assert_eq!(parse_date(""), None);
    }
}
