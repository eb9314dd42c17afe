//! Prepayment-penalty schedule derivation.

use crate::models::document::PenaltyStep;

use super::amounts::parse_percentage;

/// Build the schedule from `(year, raw percentage)` pairs.
///
/// Years without a numeric percentage are skipped. Returns `None` when no
/// year yields a value, so "no schedule" stays distinct from an empty one.
pub fn build_schedule<'a, I>(years: I) -> Option<Vec<PenaltyStep>>
where
    I: IntoIterator<Item = (u8, Option<&'a str>)>,
{
    let mut steps: Vec<PenaltyStep> = years
        .into_iter()
        .filter_map(|(year, raw)| {
            let pct = parse_percentage(raw?)?;
            Some(PenaltyStep { year, pct })
        })
        .collect();

    if steps.is_empty() {
        return None;
    }

    steps.sort_by_key(|step| step.year);
    Some(steps)
}
