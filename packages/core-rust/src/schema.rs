//! Property schema descriptors supplied by the catalog source.
//!
//! The schema describes which filterable properties exist and how they are
//! shaped: standalone boolean features, or named categories grouping boolean
//! sub-features. It is the input of the field initializer
//! ([`FilterFieldSet::from_schema`](crate::fields::FilterFieldSet::from_schema))
//! and is treated as read-only by the engine.
//!
//! JSON field names are camelCase to match the upstream data files.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Discriminant for the two property shapes in the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Boolean,
    Category,
}

/// Property kind as it appears in schema JSON.
///
/// Unlike [`PropertyType`] this is open: an unrecognized type string
/// deserializes to [`DescriptorKind::Unknown`] instead of failing the whole
/// document. The field initializer skips such entries so the rest of the
/// tree still initializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptorKind {
    Boolean,
    Category,
    #[serde(other)]
    Unknown,
}

/// A boolean property nested inside a category descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubPropertyDescriptor {
    /// Display name of the sub-property.
    pub name: String,
}

/// One entry in the property schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescriptor {
    /// Display name of the property.
    pub name: String,
    /// Shape of the property as declared by the source.
    #[serde(rename = "type")]
    pub kind: DescriptorKind,
    /// Sub-properties of a category descriptor. Empty for boolean entries.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub sub_properties: IndexMap<String, SubPropertyDescriptor>,
}

/// The full property schema delivered by the catalog source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    /// Descriptors keyed the same way the catalog keys its properties.
    pub properties: IndexMap<String, PropertyDescriptor>,
}
