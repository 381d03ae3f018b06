//! Deterministic rule evaluation: one CMS entry against one filter tree.
//!
//! `evaluate()` is the hot path -- re-run for every catalog entry on every
//! filter edit. Inactive fields are ignored entirely; active fields are
//! partitioned into required and nice-to-have pools and compared against the
//! entry's actual values.
//!
//! Missing or shape-mismatched catalog data for one field scores that field
//! as unsatisfied and moves on. Nothing in this module returns an error or
//! panics on catalog content.

use serde::{Deserialize, Serialize};

use crate::catalog::{Cms, CmsProperty};
use crate::fields::{FilterFieldSet, FlatField, SpecialField};

/// Share value meaning "no field in this pool is active".
///
/// Kept distinct from `0.0`: a pool with no active fields has no share at
/// all, while `0.0` means every active field in the pool is unsatisfied.
pub const SHARE_NOT_APPLICABLE: f64 = -1.0;

/// Evaluation outcome for one CMS entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterResult {
    /// Identity of the evaluated catalog entry.
    pub cms_key: String,
    /// Whether every currently-active required field is satisfied.
    pub satisfactory: bool,
    /// Satisfied fraction of active required fields, in `[0, 1]`, or
    /// [`SHARE_NOT_APPLICABLE`].
    pub has_required_share: f64,
    /// Satisfied fraction of active nice-to-have fields (including active
    /// special fields), in `[0, 1]`, or [`SHARE_NOT_APPLICABLE`].
    pub has_nice_to_have_share: f64,
}

impl FilterResult {
    /// Whether any required field is active; when false, the required share
    /// must be presented as "not applicable", never as zero.
    #[must_use]
    pub fn required_applicable(&self) -> bool {
        self.has_required_share >= 0.0
    }

    /// Whether any nice-to-have or special field is active.
    #[must_use]
    pub fn nice_to_have_applicable(&self) -> bool {
        self.has_nice_to_have_share >= 0.0
    }
}

/// Evaluates one CMS entry against one filter tree.
///
/// Basic criteria compare for exact equality with the entry's actual
/// boolean value; active special fields are satisfied when the entry's
/// value intersects the selected options (OR semantics) and count toward
/// the nice-to-have pool only. Shares are unrounded floating point;
/// rounding is a presentation concern.
#[must_use]
pub fn evaluate(cms: &Cms, fields: &FilterFieldSet) -> FilterResult {
    let mut active_required = 0_usize;
    let mut satisfied_required = 0_usize;
    let mut active_nice_to_have = 0_usize;
    let mut satisfied_nice_to_have = 0_usize;

    for flat in fields.flatten_basic() {
        let Some(desired) = flat.field.value else {
            continue;
        };
        let satisfied = actual_boolean_value(cms, &flat) == Some(desired);
        if flat.field.required {
            active_required += 1;
            satisfied_required += usize::from(satisfied);
        } else {
            active_nice_to_have += 1;
            satisfied_nice_to_have += usize::from(satisfied);
        }
    }

    for (key, special) in &fields.special {
        if !special.is_active() {
            continue;
        }
        active_nice_to_have += 1;
        satisfied_nice_to_have += usize::from(special_value_matches(cms, key, special));
    }

    FilterResult {
        cms_key: cms.key.clone(),
        // Holds for the empty pool too: a CMS with no active required
        // fields qualifies regardless of nice-to-have scores.
        satisfactory: satisfied_required == active_required,
        has_required_share: share(satisfied_required, active_required),
        has_nice_to_have_share: share(satisfied_nice_to_have, active_nice_to_have),
    }
}

/// Satisfied fraction of a pool, or the sentinel for an empty pool.
#[allow(clippy::cast_precision_loss)]
fn share(satisfied: usize, active: usize) -> f64 {
    if active == 0 {
        SHARE_NOT_APPLICABLE
    } else {
        satisfied as f64 / active as f64
    }
}

/// Looks up the actual boolean value for a flattened filter criterion,
/// descending into the matching category for nested fields.
///
/// `None` when the property is missing or its shape does not match the
/// filter tree; the caller scores that as unsatisfied.
fn actual_boolean_value(cms: &Cms, flat: &FlatField<'_>) -> Option<bool> {
    let Some(property) = cms.properties.get(flat.key) else {
        tracing::debug!(
            cms = %cms.key,
            field = %flat.key,
            "catalog entry has no property for active field"
        );
        return None;
    };

    match (property, flat.sub_key) {
        (CmsProperty::Boolean(boolean), None) => Some(boolean.value),
        (CmsProperty::Category { sub_properties, .. }, Some(sub_key)) => {
            let value = sub_properties.get(sub_key).map(|sub| sub.value);
            if value.is_none() {
                tracing::debug!(
                    cms = %cms.key,
                    field = %flat.key,
                    sub_field = %sub_key,
                    "catalog category has no sub-property for active field"
                );
            }
            value
        }
        _ => {
            tracing::debug!(
                cms = %cms.key,
                field = %flat.key,
                "catalog property shape does not match the filter tree"
            );
            None
        }
    }
}

/// OR-semantics intersection between the selected options and the entry's
/// special value.
fn special_value_matches(cms: &Cms, key: &str, special: &SpecialField) -> bool {
    match cms.special_values.get(key) {
        Some(value) => value.options().any(|option| special.values.contains(option)),
        None => {
            tracing::debug!(
                cms = %cms.key,
                field = %key,
                "catalog entry has no value for active special field"
            );
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use std::collections::BTreeSet;

    use indexmap::IndexMap;

    use super::*;
    use crate::catalog::{BooleanCmsProperty, SpecialValue};
    use crate::fields::{BooleanFilterField, FilterField};

    fn cms(key: &str, properties: &[(&str, bool)]) -> Cms {
        Cms {
            key: key.to_string(),
            name: key.to_string(),
            properties: properties
                .iter()
                .map(|&(property_key, value)| {
                    (
                        property_key.to_string(),
                        CmsProperty::Boolean(BooleanCmsProperty {
                            name: property_key.to_string(),
                            value,
                        }),
                    )
                })
                .collect(),
            special_values: IndexMap::new(),
        }
    }

    fn boolean_field(name: &str, value: Option<bool>, required: bool) -> FilterField {
        FilterField::Boolean(BooleanFilterField {
            name: name.to_string(),
            value,
            required,
        })
    }

    fn fields(entries: &[(&str, Option<bool>, bool)]) -> FilterFieldSet {
        FilterFieldSet {
            basic: entries
                .iter()
                .map(|&(key, value, required)| (key.to_string(), boolean_field(key, value, required)))
                .collect(),
            special: IndexMap::new(),
        }
    }

    // ---- Required fields ----

    #[test]
    fn required_field_satisfied_and_unsatisfied() {
        let filter = fields(&[("hasApi", Some(true), true)]);

        let a = evaluate(&cms("a", &[("hasApi", true)]), &filter);
        assert!(a.satisfactory);
        assert_eq!(a.has_required_share, 1.0);

        let b = evaluate(&cms("b", &[("hasApi", false)]), &filter);
        assert!(!b.satisfactory);
        assert_eq!(b.has_required_share, 0.0);
    }

    #[test]
    fn desired_false_matches_actual_false() {
        let filter = fields(&[("selfHosted", Some(false), true)]);
        let result = evaluate(&cms("a", &[("selfHosted", false)]), &filter);
        assert!(result.satisfactory);
        assert_eq!(result.has_required_share, 1.0);
    }

    #[test]
    fn partial_required_share_is_fractional_and_unsatisfactory() {
        let filter = fields(&[("one", Some(true), true), ("two", Some(true), true)]);
        let result = evaluate(&cms("a", &[("one", true), ("two", false)]), &filter);
        assert!(!result.satisfactory);
        assert_eq!(result.has_required_share, 0.5);
    }

    // ---- Nice-to-have fields ----

    #[test]
    fn half_satisfied_nice_to_haves_leave_satisfactory_untouched() {
        let filter = fields(&[("one", Some(true), false), ("two", Some(true), false)]);
        let result = evaluate(&cms("a", &[("one", true), ("two", false)]), &filter);
        assert!(result.satisfactory);
        assert_eq!(result.has_nice_to_have_share, 0.5);
        assert_eq!(result.has_required_share, SHARE_NOT_APPLICABLE);
    }

    // ---- Inactive fields ----

    #[test]
    fn all_inactive_fields_yield_not_applicable_shares() {
        let filter = fields(&[("one", None, false), ("two", None, true)]);
        let result = evaluate(&cms("a", &[("one", true), ("two", true)]), &filter);
        assert!(result.satisfactory);
        assert_eq!(result.has_required_share, SHARE_NOT_APPLICABLE);
        assert_eq!(result.has_nice_to_have_share, SHARE_NOT_APPLICABLE);
        assert!(!result.required_applicable());
        assert!(!result.nice_to_have_applicable());
    }

    #[test]
    fn inactive_required_flag_contributes_nothing() {
        // required=true on an inactive field must not open the required pool
        let filter = fields(&[("one", None, true), ("two", Some(true), false)]);
        let result = evaluate(&cms("a", &[("one", false), ("two", true)]), &filter);
        assert_eq!(result.has_required_share, SHARE_NOT_APPLICABLE);
        assert_eq!(result.has_nice_to_have_share, 1.0);
    }

    // ---- Missing and mismatched catalog data ----

    #[test]
    fn missing_property_for_active_field_is_unsatisfied() {
        let filter = fields(&[("missing", Some(true), true)]);
        let result = evaluate(&cms("a", &[]), &filter);
        assert!(!result.satisfactory);
        assert_eq!(result.has_required_share, 0.0);
    }

    #[test]
    fn missing_data_does_not_abort_remaining_fields() {
        let filter = fields(&[("missing", Some(true), false), ("present", Some(true), false)]);
        let result = evaluate(&cms("a", &[("present", true)]), &filter);
        assert_eq!(result.has_nice_to_have_share, 0.5);
    }

    #[test]
    fn shape_mismatch_is_unsatisfied() {
        // Filter sees a category; the catalog carries a plain boolean.
        let mut sub_fields = IndexMap::new();
        sub_fields.insert(
            "restApi".to_string(),
            BooleanFilterField {
                name: "REST API".to_string(),
                value: Some(true),
                required: true,
            },
        );
        let filter = FilterFieldSet {
            basic: IndexMap::from_iter([(
                "interfaces".to_string(),
                FilterField::Category {
                    name: "Interfaces".to_string(),
                    sub_fields,
                },
            )]),
            special: IndexMap::new(),
        };

        let result = evaluate(&cms("a", &[("interfaces", true)]), &filter);
        assert!(!result.satisfactory);
        assert_eq!(result.has_required_share, 0.0);
    }

    #[test]
    fn category_sub_field_looks_up_nested_value() {
        let mut sub_properties = IndexMap::new();
        sub_properties.insert(
            "restApi".to_string(),
            BooleanCmsProperty {
                name: "REST API".to_string(),
                value: true,
            },
        );
        let mut entry = cms("a", &[]);
        entry.properties.insert(
            "interfaces".to_string(),
            CmsProperty::Category {
                name: "Interfaces".to_string(),
                sub_properties,
            },
        );

        let mut sub_fields = IndexMap::new();
        sub_fields.insert(
            "restApi".to_string(),
            BooleanFilterField {
                name: "REST API".to_string(),
                value: Some(true),
                required: true,
            },
        );
        let filter = FilterFieldSet {
            basic: IndexMap::from_iter([(
                "interfaces".to_string(),
                FilterField::Category {
                    name: "Interfaces".to_string(),
                    sub_fields,
                },
            )]),
            special: IndexMap::new(),
        };

        let result = evaluate(&entry, &filter);
        assert!(result.satisfactory);
        assert_eq!(result.has_required_share, 1.0);
    }

    // ---- Special fields ----

    fn special_filter(key: &str, selected: &[&str]) -> FilterFieldSet {
        let mut special = IndexMap::new();
        special.insert(
            key.to_string(),
            SpecialField {
                name: key.to_string(),
                values: selected.iter().map(ToString::to_string).collect::<BTreeSet<_>>(),
            },
        );
        FilterFieldSet {
            basic: IndexMap::new(),
            special,
        }
    }

    #[test]
    fn special_scalar_value_intersects_selection() {
        let mut entry = cms("a", &[]);
        entry.special_values.insert(
            "license".to_string(),
            SpecialValue::One("Apache-2.0".to_string()),
        );

        let hit = evaluate(&entry, &special_filter("license", &["MIT", "Apache-2.0"]));
        assert_eq!(hit.has_nice_to_have_share, 1.0);

        let miss = evaluate(&entry, &special_filter("license", &["GPL-3.0"]));
        assert_eq!(miss.has_nice_to_have_share, 0.0);
    }

    #[test]
    fn special_list_value_matches_on_any_option() {
        let mut entry = cms("a", &[]);
        entry.special_values.insert(
            "category".to_string(),
            SpecialValue::Many(vec!["SaaS".to_string(), "OnPremises".to_string()]),
        );

        let result = evaluate(&entry, &special_filter("category", &["OnPremises"]));
        assert_eq!(result.has_nice_to_have_share, 1.0);
    }

    #[test]
    fn special_fields_never_gate_satisfactory() {
        let mut entry = cms("a", &[]);
        entry
            .special_values
            .insert("license".to_string(), SpecialValue::One("MIT".to_string()));

        let result = evaluate(&entry, &special_filter("license", &["GPL-3.0"]));
        assert!(result.satisfactory);
        assert_eq!(result.has_required_share, SHARE_NOT_APPLICABLE);
    }

    #[test]
    fn missing_special_value_is_unsatisfied() {
        let entry = cms("a", &[]);
        let result = evaluate(&entry, &special_filter("license", &["MIT"]));
        assert_eq!(result.has_nice_to_have_share, 0.0);
    }

    #[test]
    fn special_and_basic_nice_to_haves_share_one_pool() {
        let mut entry = cms("a", &[("one", true)]);
        entry
            .special_values
            .insert("license".to_string(), SpecialValue::One("MIT".to_string()));

        let mut filter = fields(&[("one", Some(true), false)]);
        filter.special.insert(
            "license".to_string(),
            SpecialField {
                name: "License".to_string(),
                values: BTreeSet::from(["GPL-3.0".to_string()]),
            },
        );

        // one satisfied basic + one unsatisfied special = 1/2
        let result = evaluate(&entry, &filter);
        assert_eq!(result.has_nice_to_have_share, 0.5);
    }

    // ---- Determinism ----

    #[test]
    fn evaluation_is_idempotent() {
        let filter = fields(&[("one", Some(true), true), ("two", Some(false), false)]);
        let entry = cms("a", &[("one", true), ("two", true)]);
        assert_eq!(evaluate(&entry, &filter), evaluate(&entry, &filter));
    }
}
