//! Record filtering.
//!
//! Every restriction is an independent predicate, so the result does not
//! depend on the order restrictions are applied in.

use crate::models::criteria::{FilterCriteria, Restriction};
use crate::models::record::SaleRecord;

/// Keep the records that satisfy every active restriction in `criteria`.
///
/// Records are borrowed, never copied; the output keeps input order and
/// can be fed back into `filter` or into aggregation.
pub fn filter<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a SaleRecord>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let restrictions = criteria.restrictions();
    let filtered: Vec<&SaleRecord> = records
        .into_iter()
        .filter(|record| restrictions.iter().all(|r| r.matches(record)))
        .collect();

    tracing::debug!(
        "Filter with {} restrictions kept {} records",
        restrictions.len(),
        filtered.len()
    );

    filtered
}

/// Keep the records that satisfy a single restriction.
pub fn apply<'a, I>(records: I, restriction: &Restriction) -> Vec<&'a SaleRecord>
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    records
        .into_iter()
        .filter(|record| restriction.matches(record))
        .collect()
}
