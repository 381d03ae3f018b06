//! Filter panel support: narrowing the displayed field tree and owning the
//! current / untouched pairing.
//!
//! The panel never edits the narrowed view it renders. Edits are whole-value
//! replacements targeting the current tree and flow through
//! [`FilterState::apply`], which is also where the recognized preset is
//! recomputed -- the preset can never drift from the tree it describes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::CmsCatalog;
use crate::evaluate::FilterResult;
use crate::fields::{BooleanFilterField, FilterField, FilterFieldSet, SpecialField};
use crate::filter::filter_cms;
use crate::preset::{ActivePreset, PresetRegistry};
use crate::schema::PropertySchema;

/// Display settings for the filter panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSettings {
    /// Case-insensitive substring applied to field display names. Empty
    /// matches everything.
    pub field_filter_string: String,
    /// Restrict the view to fields that differ from the untouched baseline.
    pub show_modified_only: bool,
}

/// Narrows the displayed field tree by name search and modification state.
///
/// Returns a fresh structural view of `current`: neither input is mutated,
/// and edits must keep targeting the current tree, never the view. A
/// category survives through its own name (which admits all its sub-fields)
/// or through at least one surviving sub-field; a category left without
/// sub-fields is dropped.
#[must_use]
pub fn filtered_filter_fields(
    settings: &PanelSettings,
    current: &FilterFieldSet,
    untouched: &FilterFieldSet,
) -> FilterFieldSet {
    let query = settings.field_filter_string.to_lowercase();
    let mut view = FilterFieldSet::default();

    for (key, field) in &current.basic {
        match field {
            FilterField::Boolean(boolean) => {
                let survives = name_matches(&boolean.name, &query)
                    && (!settings.show_modified_only
                        || boolean_modified(key, None, boolean, untouched));
                if survives {
                    view.basic.insert(key.clone(), field.clone());
                }
            }
            FilterField::Category { name, sub_fields } => {
                let category_matches = name_matches(name, &query);
                let survivors: IndexMap<String, BooleanFilterField> = sub_fields
                    .iter()
                    .filter(|(sub_key, sub_field)| {
                        (category_matches || name_matches(&sub_field.name, &query))
                            && (!settings.show_modified_only
                                || boolean_modified(key, Some(sub_key.as_str()), sub_field, untouched))
                    })
                    .map(|(sub_key, sub_field)| (sub_key.clone(), sub_field.clone()))
                    .collect();
                if !survivors.is_empty() {
                    view.basic.insert(
                        key.clone(),
                        FilterField::Category {
                            name: name.clone(),
                            sub_fields: survivors,
                        },
                    );
                }
            }
        }
    }

    for (key, field) in &current.special {
        let survives = name_matches(&field.name, &query)
            && (!settings.show_modified_only || special_modified(key, field, untouched));
        if survives {
            view.special.insert(key.clone(), field.clone());
        }
    }

    view
}

fn name_matches(name: &str, lowercase_query: &str) -> bool {
    lowercase_query.is_empty() || name.to_lowercase().contains(lowercase_query)
}

/// Whether a boolean criterion differs from its untouched counterpart.
/// A criterion with no counterpart in the baseline counts as modified.
fn boolean_modified(
    key: &str,
    sub_key: Option<&str>,
    current: &BooleanFilterField,
    untouched: &FilterFieldSet,
) -> bool {
    let baseline = match (untouched.basic.get(key), sub_key) {
        (Some(FilterField::Boolean(boolean)), None) => Some(boolean),
        (Some(FilterField::Category { sub_fields, .. }), Some(sub_key)) => sub_fields.get(sub_key),
        _ => None,
    };
    baseline != Some(current)
}

/// Whether a special criterion's selection differs from the baseline.
fn special_modified(key: &str, current: &SpecialField, untouched: &FilterFieldSet) -> bool {
    untouched.special.get(key) != Some(current)
}

/// A whole-value edit command targeting the current field tree.
///
/// The panel always replaces entire fields; there are no partial patches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldEdit {
    /// Replace one basic field (a boolean, or a whole category).
    ReplaceBasic {
        /// Top-level key of the field.
        key: String,
        /// The replacement value.
        field: FilterField,
    },
    /// Replace one special field.
    ReplaceSpecial {
        /// Special attribute key.
        key: String,
        /// The replacement value.
        field: SpecialField,
    },
    /// Load a registered preset into the current tree.
    ApplyPreset {
        /// Name of the preset to load.
        name: String,
    },
    /// Restore the untouched default tree.
    Reset,
}

/// Owned pairing of the editable tree, its untouched baseline, and the
/// recognized preset.
///
/// The baseline never mutates after construction and is the single diff
/// reference for the panel view.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    current: FilterFieldSet,
    untouched: FilterFieldSet,
    active_preset: ActivePreset,
}

impl FilterState {
    /// Builds both trees from the schema defaults; starts at show-all.
    #[must_use]
    pub fn new(schema: &PropertySchema) -> Self {
        let untouched = FilterFieldSet::from_schema(schema);
        Self {
            current: untouched.clone(),
            untouched,
            active_preset: ActivePreset::ShowAll,
        }
    }

    /// The user-edited tree.
    #[must_use]
    pub fn current(&self) -> &FilterFieldSet {
        &self.current
    }

    /// The untouched diff baseline.
    #[must_use]
    pub fn untouched(&self) -> &FilterFieldSet {
        &self.untouched
    }

    /// The configuration the current tree was recognized as.
    #[must_use]
    pub fn active_preset(&self) -> &ActivePreset {
        &self.active_preset
    }

    /// Applies one edit and recomputes the recognized preset.
    ///
    /// Edits addressing keys the tree does not define are ignored with a
    /// warning; losing one edit is preferable to losing the panel state.
    pub fn apply(&mut self, edit: FieldEdit, registry: &PresetRegistry) {
        match edit {
            FieldEdit::ReplaceBasic { key, field } => {
                if let Some(slot) = self.current.basic.get_mut(&key) {
                    *slot = field;
                } else {
                    tracing::warn!(key = %key, "ignoring edit of unknown basic field");
                }
            }
            FieldEdit::ReplaceSpecial { key, field } => {
                if let Some(slot) = self.current.special.get_mut(&key) {
                    *slot = field;
                } else {
                    tracing::warn!(key = %key, "ignoring edit of unknown special field");
                }
            }
            FieldEdit::ApplyPreset { name } => match registry.get(&name) {
                Some(preset) => self.current = preset.fields.clone(),
                None => tracing::warn!(preset = %name, "ignoring apply of unknown preset"),
            },
            FieldEdit::Reset => self.current = self.untouched.clone(),
        }
        self.active_preset = registry.match_fields(&self.current);
    }

    /// Narrowed view of the current tree for panel rendering.
    #[must_use]
    pub fn filtered_view(&self, settings: &PanelSettings) -> FilterFieldSet {
        filtered_filter_fields(settings, &self.current, &self.untouched)
    }

    /// Re-runs the orchestrator over the whole catalog.
    #[must_use]
    pub fn results(&self, catalog: &CmsCatalog) -> Vec<FilterResult> {
        filter_cms(&self.current, catalog)
    }
}
