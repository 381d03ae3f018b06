//! CMS comparison core — property taxonomy, filter evaluation, scoring, and
//! presets.
//!
//! The engine takes a user-editable tree of feature requirements and a
//! catalog of CMS products, and computes per product whether it qualifies
//! and how well it scores against required vs. nice-to-have criteria. It
//! also narrows the displayed field tree (name search, modified-only) and
//! recognizes when the current tree matches a named preset.
//!
//! Everything is synchronous and pure: callers re-run [`filter_cms`] on
//! every edit and the new result list supersedes the old one by value.

pub mod catalog;
pub mod evaluate;
pub mod fields;
pub mod filter;
pub mod panel;
pub mod preset;
pub mod schema;

pub use catalog::{BooleanCmsProperty, CatalogData, Cms, CmsCatalog, CmsProperty, SpecialValue};
pub use evaluate::{evaluate, FilterResult, SHARE_NOT_APPLICABLE};
pub use fields::{
    initialize_basic_fields, initialize_special_fields, BooleanFilterField, FilterField,
    FilterFieldSet, SpecialField,
};
pub use filter::{filter_cms, unfiltered_cms};
pub use panel::{filtered_filter_fields, FieldEdit, FilterState, PanelSettings};
pub use preset::{ActivePreset, Preset, PresetRegistry};
pub use schema::{DescriptorKind, PropertyDescriptor, PropertySchema, PropertyType, SubPropertyDescriptor};
