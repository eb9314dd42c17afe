//! Owner list derivation.

use crate::models::document::Owner;

use super::patterns::OWNER_SEPARATOR;

/// Split a combined owner-name string on `and`, `&` and commas.
///
/// Names keep their order of appearance; empty segments are dropped.
pub fn split_owner_names(raw: &str) -> Vec<String> {
    OWNER_SEPARATOR
        .split(raw)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Build one [`Owner`] per name, each sharing the document's owner email
/// and phone.
pub fn split_owners(names: Option<&str>, email: Option<&str>, phone: Option<&str>) -> Vec<Owner> {
    let Some(names) = names else {
        return Vec::new();
    };

    split_owner_names(names)
        .into_iter()
        .map(|full_name| Owner {
            full_name,
            email: email.map(str::to_string),
            phone: phone.map(str::to_string),
        })
        .collect()
}
