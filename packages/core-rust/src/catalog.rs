//! Catalog-side data model: CMS entries and their actual feature values.
//!
//! The catalog is owned by the data source and read-only to the engine.
//! Properties come in two closed shapes (boolean features and categories of
//! boolean features) plus free-form "special" values such as license or
//! category tags. Mappings are insertion-ordered so result order follows
//! catalog order.

use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::schema::{PropertySchema, PropertyType};

/// A boolean feature with its display name and actual value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanCmsProperty {
    /// Display name of the feature.
    pub name: String,
    /// Whether the CMS has the feature.
    pub value: bool,
}

/// A property carried by a CMS entry.
///
/// Closed tagged variant, so evaluation pattern-matches exhaustively instead
/// of probing for the presence of a `value` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CmsProperty {
    /// A standalone boolean feature.
    Boolean(BooleanCmsProperty),
    /// A named group of boolean sub-features.
    #[serde(rename_all = "camelCase")]
    Category {
        /// Display name of the category.
        name: String,
        /// Sub-features keyed like the schema's sub-properties.
        sub_properties: IndexMap<String, BooleanCmsProperty>,
    },
}

impl CmsProperty {
    /// Display name of the property.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Boolean(boolean) => &boolean.name,
            Self::Category { name, .. } => name,
        }
    }

    /// Which taxonomy shape this property is.
    #[must_use]
    pub fn property_type(&self) -> PropertyType {
        match self {
            Self::Boolean(_) => PropertyType::Boolean,
            Self::Category { .. } => PropertyType::Category,
        }
    }
}

/// A special (non-boolean) attribute value: a scalar or a list of options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpecialValue {
    /// A single option, e.g. `"Apache-2.0"`.
    One(String),
    /// Multiple options, e.g. `["SaaS", "OnPremises"]`.
    Many(Vec<String>),
}

impl SpecialValue {
    /// Iterates the contained options, scalar and list alike.
    pub fn options(&self) -> impl Iterator<Item = &str> {
        let options = match self {
            Self::One(option) => std::slice::from_ref(option),
            Self::Many(options) => options.as_slice(),
        };
        options.iter().map(String::as_str)
    }
}

/// One catalog entry.
///
/// `key` is the unique, immutable identity of the entry. The loader stamps
/// it from the catalog mapping key, so the field and the mapping can never
/// disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cms {
    /// Unique identity within the catalog.
    #[serde(default)]
    pub key: String,
    /// Display name of the product.
    pub name: String,
    /// Schema-driven feature values.
    #[serde(default)]
    pub properties: IndexMap<String, CmsProperty>,
    /// Free-form attribute values (license, category tags).
    #[serde(default)]
    pub special_values: IndexMap<String, SpecialValue>,
}

/// The full CMS catalog, keyed by CMS identity, insertion-ordered.
pub type CmsCatalog = IndexMap<String, Cms>;

/// Schema plus catalog: the complete payload delivered by the catalog source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogData {
    /// Property schema driving the default filter field tree.
    pub fields: PropertySchema,
    /// The catalog entries.
    pub cms: CmsCatalog,
}

impl CatalogData {
    /// Parses a combined catalog document.
    ///
    /// Stamps each entry's `key` from its mapping key. A document that is
    /// not valid catalog JSON is a loading error; individually missing or
    /// odd values inside a well-formed document are left for evaluation to
    /// absorb.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        let mut data: Self = serde_json::from_str(json).context("parsing catalog document")?;
        for (key, cms) in &mut data.cms {
            cms.key.clone_from(key);
        }
        Ok(data)
    }
}
