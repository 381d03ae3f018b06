//! Named filter presets and recognition of the active one.
//!
//! A preset is a curated filter configuration recognized by structural
//! equality against the current tree. The registry always knows the
//! show-all configuration (the untouched default); curated presets are
//! registered on top of it and normalized onto the default tree, so a
//! preset document only needs to mention the fields it activates.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::fields::{FilterField, FilterFieldSet};

/// Identity of the recognized filter configuration.
///
/// Recomputed from the field tree on every edit, never stored independently
/// of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivePreset {
    /// The untouched default: every field inactive.
    ShowAll,
    /// A curated named preset.
    Named(String),
    /// No known configuration matches the current tree.
    Custom,
}

/// A curated filter configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    /// Identity shown to the user and reported by [`ActivePreset::Named`].
    pub name: String,
    /// The field tree this preset stands for. May be partial in a preset
    /// document; registration completes it against the default tree.
    pub fields: FilterFieldSet,
}

impl Preset {
    /// Parses a single preset document.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("parsing preset document")
    }
}

/// Known presets for one schema, always including show-all.
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    show_all: FilterFieldSet,
    named: Vec<Preset>,
}

impl PresetRegistry {
    /// Creates a registry whose only known configuration is the untouched
    /// default tree.
    #[must_use]
    pub fn new(show_all: FilterFieldSet) -> Self {
        Self {
            show_all,
            named: Vec::new(),
        }
    }

    /// The untouched default tree this registry was built around.
    #[must_use]
    pub fn show_all(&self) -> &FilterFieldSet {
        &self.show_all
    }

    /// Finds a registered preset by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.named.iter().find(|preset| preset.name == name)
    }

    /// Registers a curated preset, returning whether it was accepted.
    ///
    /// The preset's fields are normalized onto the default tree: untouched
    /// fields are filled in as inactive and display names are taken from the
    /// schema. A preset referencing a field key the schema does not define
    /// is excluded from the candidate set rather than poisoning comparison.
    pub fn register(&mut self, preset: Preset) -> bool {
        let normalized = match normalize(&preset.fields, &self.show_all) {
            Ok(fields) => fields,
            Err(unknown_key) => {
                tracing::warn!(
                    preset = %preset.name,
                    key = %unknown_key,
                    "excluding preset referencing unknown field key"
                );
                return false;
            }
        };
        self.named.push(Preset {
            name: preset.name,
            fields: normalized,
        });
        true
    }

    /// Parses a JSON array of presets and registers each, returning how many
    /// were accepted. A malformed document is a loading error; presets with
    /// unknown keys are excluded per [`register`](Self::register).
    pub fn load_presets(&mut self, json: &str) -> anyhow::Result<usize> {
        let presets: Vec<Preset> =
            serde_json::from_str(json).context("parsing presets document")?;
        let mut accepted = 0;
        for preset in presets {
            accepted += usize::from(self.register(preset));
        }
        Ok(accepted)
    }

    /// Recognizes the configuration a field tree matches.
    ///
    /// Structural equality, independent of mapping key order. Show-all wins
    /// over a named preset that happens to equal the default.
    #[must_use]
    pub fn match_fields(&self, current: &FilterFieldSet) -> ActivePreset {
        if *current == self.show_all {
            return ActivePreset::ShowAll;
        }
        self.named
            .iter()
            .find(|preset| preset.fields == *current)
            .map_or(ActivePreset::Custom, |preset| {
                ActivePreset::Named(preset.name.clone())
            })
    }
}

/// Completes a possibly-partial preset tree against the reference tree.
///
/// Returns the offending key when the preset mentions a basic field,
/// category sub-field, or special field the reference does not define, or
/// when the shapes disagree.
fn normalize(
    preset: &FilterFieldSet,
    reference: &FilterFieldSet,
) -> Result<FilterFieldSet, String> {
    let mut normalized = reference.clone();

    for (key, field) in &preset.basic {
        match (normalized.basic.get_mut(key), field) {
            (Some(FilterField::Boolean(slot)), FilterField::Boolean(given)) => {
                slot.value = given.value;
                slot.required = given.required;
            }
            (
                Some(FilterField::Category { sub_fields: slots, .. }),
                FilterField::Category { sub_fields: given, .. },
            ) => {
                for (sub_key, sub_given) in given {
                    let Some(slot) = slots.get_mut(sub_key) else {
                        return Err(format!("{key}.{sub_key}"));
                    };
                    slot.value = sub_given.value;
                    slot.required = sub_given.required;
                }
            }
            _ => return Err(key.clone()),
        }
    }

    for (key, field) in &preset.special {
        let Some(slot) = normalized.special.get_mut(key) else {
            return Err(key.clone());
        };
        slot.values = field.values.clone();
    }

    Ok(normalized)
}
