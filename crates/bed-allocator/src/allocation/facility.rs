use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical facility identity: trimmed, whitespace-collapsed, lowercased.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FacilityKey(String);

impl FacilityKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FacilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FacilityNameError {
    #[error("facility name must contain at least one non-whitespace character")]
    Blank,
}

/// Canonicalize a free-text facility name.
///
/// Idempotent: canonicalizing an already canonical key yields the same key.
pub fn canonicalize(name: &str) -> Result<FacilityKey, FacilityNameError> {
    let cleaned = name.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(FacilityNameError::Blank);
    }

    Ok(FacilityKey(collapsed.to_lowercase()))
}

/// Facility identity registry with a reverse map back to presentation names.
#[derive(Debug, Clone, Default)]
pub struct FacilityRegistry {
    display_names: BTreeMap<FacilityKey, String>,
}

impl FacilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spelling. The first spelling seen for a key is kept for display.
    pub fn register(&mut self, name: &str) -> Result<FacilityKey, FacilityNameError> {
        let key = canonicalize(name)?;
        self.display_names
            .entry(key.clone())
            .or_insert_with(|| name.trim().to_string());
        Ok(key)
    }

    pub fn contains(&self, key: &FacilityKey) -> bool {
        self.display_names.contains_key(key)
    }

    /// Display name for a key, falling back to the canonical form for unregistered keys.
    pub fn display_name<'a>(&'a self, key: &'a FacilityKey) -> &'a str {
        self.display_names
            .get(key)
            .map(String::as_str)
            .unwrap_or_else(|| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.display_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.display_names.is_empty()
    }

    /// Registered facilities ordered by canonical key.
    pub fn iter(&self) -> impl Iterator<Item = (&FacilityKey, &str)> {
        self.display_names
            .iter()
            .map(|(key, name)| (key, name.as_str()))
    }
}
