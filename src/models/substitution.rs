use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One suggested replacement for an ingredient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubstitutionEntry {
    /// Replacement ingredient or combination
    pub substitute: String,
    /// Conversion quantity, free-form
    pub ratio: String,
    /// Usage guidance
    pub notes: String,
}

impl SubstitutionEntry {
    pub fn new(substitute: &str, ratio: &str, notes: &str) -> Self {
        Self {
            substitute: substitute.to_string(),
            ratio: ratio.to_string(),
            notes: notes.to_string(),
        }
    }
}

/// Ingredient name to substitutes, iterated in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SubstitutionMatches {
    entries: IndexMap<String, Vec<SubstitutionEntry>>,
}

impl SubstitutionMatches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record substitutes for `ingredient`. A name already present keeps its
    /// original position and entries.
    pub fn insert(&mut self, ingredient: impl Into<String>, substitutes: Vec<SubstitutionEntry>) {
        self.entries.entry(ingredient.into()).or_insert(substitutes);
    }

    pub fn get(&self, ingredient: &str) -> Option<&[SubstitutionEntry]> {
        self.entries.get(ingredient).map(Vec::as_slice)
    }

    /// Stored name and substitutes for an exact `ingredient` lookup
    pub fn get_key_value(&self, ingredient: &str) -> Option<(&str, &[SubstitutionEntry])> {
        self.entries
            .get_key_value(ingredient)
            .map(|(name, subs)| (name.as_str(), subs.as_slice()))
    }

    pub fn contains(&self, ingredient: &str) -> bool {
        self.entries.contains_key(ingredient)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[SubstitutionEntry])> {
        self.entries
            .iter()
            .map(|(name, subs)| (name.as_str(), subs.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
