//! Single-line US address decomposition.

use crate::models::document::AddressParts;

use super::patterns::US_ADDRESS;

/// Split `"123 Main St, Springfield, IL 62704"` into street, city, state and
/// ZIP.
///
/// Input that does not follow that shape is kept whole as the street line.
/// Empty input yields all parts absent.
pub fn decompose_address(raw: &str) -> AddressParts {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return AddressParts::default();
    }

    let full_address = Some(trimmed.to_string());

    match US_ADDRESS.captures(trimmed) {
        Some(caps) => AddressParts {
            full_address,
            address: Some(caps[1].trim().to_string()),
            city: Some(caps[2].trim().to_string()),
            state: Some(caps[3].to_string()),
            zip: caps.get(4).map(|m| m.as_str().to_string()),
        },
        None => AddressParts {
            full_address,
            address: Some(trimmed.to_string()),
            ..Default::default()
        },
    }
}
