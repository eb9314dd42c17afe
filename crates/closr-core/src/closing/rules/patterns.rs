//! Common regex patterns shared by the closing-packet normalizers.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Text cleanup
    pub static ref HYPHEN_LINE_BREAK: Regex = Regex::new(r"-\s*\n\s*").unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    // "<street>, <city>, <ST> [ZIP]"
    pub static ref US_ADDRESS: Regex = Regex::new(
        r"^(.+?),\s*([^,]+),\s*([A-Z]{2})\b(?:\s+(\d{5}(?:-\d{4})?))?"
    ).unwrap();

    // Owner-name separators: "and", "&", commas (", & " counts once)
    pub static ref OWNER_SEPARATOR: Regex = Regex::new(
        r"(?i)\s*,\s*(?:(?:and|&)\s+)?|\s+(?:and|&)\s+"
    ).unwrap();

    // US dates
    pub static ref DATE_MDY: Regex = Regex::new(
        r"\b(\d{1,2})[/\-.](\d{1,2})[/\-.](\d{4}|\d{2})\b"
    ).unwrap();

    pub static ref DATE_YMD: Regex = Regex::new(
        r"\b(\d{4})[/\-.](\d{1,2})[/\-.](\d{1,2})\b"
    ).unwrap();

    pub static ref DATE_LONG: Regex = Regex::new(
        r"(?i)\b([a-z]{3,9})\.?\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})\b"
    ).unwrap();
}
