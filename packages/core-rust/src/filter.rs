//! Filter orchestration across the whole catalog.
//!
//! Pure projections: nothing here mutates its inputs, so every call can be
//! re-issued on each filter edit and the new result list simply supersedes
//! the previous one.

use crate::catalog::CmsCatalog;
use crate::evaluate::{evaluate, FilterResult, SHARE_NOT_APPLICABLE};
use crate::fields::FilterFieldSet;

/// Runs the rule evaluator over every catalog entry.
///
/// Produces exactly one result per entry, in catalog insertion order.
/// Sorting for display is a presentation concern.
#[must_use]
pub fn filter_cms(fields: &FilterFieldSet, catalog: &CmsCatalog) -> Vec<FilterResult> {
    catalog.values().map(|cms| evaluate(cms, fields)).collect()
}

/// Results for a catalog before any field has been touched.
///
/// Equivalent to [`filter_cms`] with every field inactive: each entry is
/// satisfactory and both shares are not applicable.
#[must_use]
pub fn unfiltered_cms(catalog: &CmsCatalog) -> Vec<FilterResult> {
    catalog
        .values()
        .map(|cms| FilterResult {
            cms_key: cms.key.clone(),
            satisfactory: true,
            has_required_share: SHARE_NOT_APPLICABLE,
            has_nice_to_have_share: SHARE_NOT_APPLICABLE,
        })
        .collect()
}
