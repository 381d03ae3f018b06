//! Filter-side field tree: desired values, the required flag, and the
//! default ("show all") initializer.
//!
//! A filter field mirrors the shape of a catalog property but carries the
//! *desired* state instead of the actual one. `value: None` on a boolean
//! field means "don't care" -- the field is inactive and contributes to no
//! share. Special fields are multi-valued and inactive while their selection
//! set is empty.
//!
//! The initializer output doubles as the untouched diff baseline: building
//! it twice from the same schema yields structurally equal trees.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::{DescriptorKind, PropertySchema};

/// Special attributes every filter set carries, independent of the schema.
const SPECIAL_ATTRIBUTES: &[(&str, &str)] = &[("category", "Category"), ("license", "License")];

/// A boolean filter criterion.
///
/// An active (`value: Some(..)`) field with `required` set is mandatory;
/// active without it, nice-to-have.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BooleanFilterField {
    /// Display name, taken from the schema descriptor.
    pub name: String,
    /// Desired value, or `None` for "don't care".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<bool>,
    /// Marks an active field as mandatory rather than nice-to-have.
    #[serde(default)]
    pub required: bool,
}

impl BooleanFilterField {
    /// Whether the field constrains results at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.value.is_some()
    }
}

/// A filter criterion mirroring the catalog property shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FilterField {
    /// A standalone boolean criterion.
    Boolean(BooleanFilterField),
    /// A named group of boolean criteria. Categories carry no value of their
    /// own; satisfaction derives purely from the sub-fields.
    #[serde(rename_all = "camelCase")]
    Category {
        /// Display name of the category.
        name: String,
        /// Criteria keyed like the schema's sub-properties.
        sub_fields: IndexMap<String, BooleanFilterField>,
    },
}

impl FilterField {
    /// Display name of the field.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Boolean(boolean) => &boolean.name,
            Self::Category { name, .. } => name,
        }
    }
}

/// A multi-valued filter criterion (license, category tags).
///
/// `BTreeSet` rules out duplicate selections and makes equality independent
/// of selection order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialField {
    /// Display name of the attribute.
    pub name: String,
    /// Selected options. Empty means the field is inactive.
    pub values: BTreeSet<String>,
}

impl SpecialField {
    /// Whether the field constrains results at all.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.values.is_empty()
    }
}

/// A flattened boolean criterion with its location in the tree.
///
/// `key` addresses the top-level entry; `sub_key` is set when the criterion
/// lives inside a category, and evaluation descends through both.
#[derive(Debug, Clone, Copy)]
pub struct FlatField<'a> {
    /// Top-level field key, or the enclosing category's key.
    pub key: &'a str,
    /// Sub-field key for criteria nested in a category.
    pub sub_key: Option<&'a str>,
    /// The criterion itself.
    pub field: &'a BooleanFilterField,
}

/// The complete editable filter tree: schema-driven basic fields plus the
/// fixed special fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterFieldSet {
    /// Boolean and category criteria, keyed like the schema.
    pub basic: IndexMap<String, FilterField>,
    /// Multi-valued criteria, keyed by special attribute.
    pub special: IndexMap<String, SpecialField>,
}

impl FilterFieldSet {
    /// Builds the default, fully-permissive field set for a schema.
    #[must_use]
    pub fn from_schema(schema: &PropertySchema) -> Self {
        Self {
            basic: initialize_basic_fields(schema),
            special: initialize_special_fields(),
        }
    }

    /// Flattens the basic tree into individual boolean criteria.
    ///
    /// Top-level booleans appear as-is; category sub-fields appear
    /// individually. Categories themselves never count as a criterion.
    #[must_use]
    pub fn flatten_basic(&self) -> Vec<FlatField<'_>> {
        let mut flat = Vec::new();
        for (key, field) in &self.basic {
            match field {
                FilterField::Boolean(boolean) => flat.push(FlatField {
                    key: key.as_str(),
                    sub_key: None,
                    field: boolean,
                }),
                FilterField::Category { sub_fields, .. } => {
                    flat.extend(sub_fields.iter().map(|(sub_key, sub_field)| FlatField {
                        key: key.as_str(),
                        sub_key: Some(sub_key.as_str()),
                        field: sub_field,
                    }));
                }
            }
        }
        flat
    }
}

/// Builds the default basic fields for a schema.
///
/// Every boolean descriptor becomes an inactive, non-required field;
/// category descriptors recurse one level into their sub-properties.
/// Descriptors with an unrecognized kind are skipped so the rest of the tree
/// still initializes.
#[must_use]
pub fn initialize_basic_fields(schema: &PropertySchema) -> IndexMap<String, FilterField> {
    let mut basic = IndexMap::new();
    for (key, descriptor) in &schema.properties {
        match descriptor.kind {
            DescriptorKind::Boolean => {
                basic.insert(
                    key.clone(),
                    FilterField::Boolean(BooleanFilterField {
                        name: descriptor.name.clone(),
                        value: None,
                        required: false,
                    }),
                );
            }
            DescriptorKind::Category => {
                let sub_fields = descriptor
                    .sub_properties
                    .iter()
                    .map(|(sub_key, sub_property)| {
                        (
                            sub_key.clone(),
                            BooleanFilterField {
                                name: sub_property.name.clone(),
                                value: None,
                                required: false,
                            },
                        )
                    })
                    .collect();
                basic.insert(
                    key.clone(),
                    FilterField::Category {
                        name: descriptor.name.clone(),
                        sub_fields,
                    },
                );
            }
            DescriptorKind::Unknown => {
                tracing::warn!(key = %key, "skipping schema entry with unrecognized kind");
            }
        }
    }
    basic
}

/// Builds the fixed set of special fields, all inactive.
#[must_use]
pub fn initialize_special_fields() -> IndexMap<String, SpecialField> {
    SPECIAL_ATTRIBUTES
        .iter()
        .map(|&(key, name)| {
            (
                key.to_string(),
                SpecialField {
                    name: name.to_string(),
                    values: BTreeSet::new(),
                },
            )
        })
        .collect()
}
