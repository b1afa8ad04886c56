//! Symbol directory: code → company-name lookup and search.
//!
//! Market listings ship as flat JSON dictionaries of `"CODE": "Name"`
//! pairs. The directory is built explicitly from such a file (or from
//! in-memory pairs); nothing is loaded at process start. Search is a
//! ranked case-insensitive substring match: exact code first, then code
//! prefix, then any code or name hit, stable within a rank.

use std::collections::BTreeMap;
use std::path::Path;

use super::error::CrosstraderError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct SymbolDirectory {
    entries: Vec<SymbolEntry>,
}

impl SymbolDirectory {
    pub fn from_entries(pairs: Vec<(String, String)>) -> Self {
        let entries = pairs
            .into_iter()
            .map(|(code, name)| SymbolEntry { code, name })
            .collect();
        SymbolDirectory { entries }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CrosstraderError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|reason| CrosstraderError::Data {
            reason: format!("failed to parse {}: {}", path.display(), reason),
        })
    }

    /// Parse a JSON object of `"CODE": "Name"` pairs, sorted by code.
    pub fn from_json(content: &str) -> Result<Self, String> {
        let map: BTreeMap<String, String> =
            serde_json::from_str(content).map_err(|e| e.to_string())?;
        Ok(Self::from_entries(map.into_iter().collect()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display name for an exact (case-insensitive) code.
    pub fn name_of(&self, code: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.code.eq_ignore_ascii_case(code))
            .map(|e| e.name.as_str())
    }

    /// Best matches for `query`, at most `limit`, best first.
    pub fn search(&self, query: &str, limit: usize) -> Vec<&SymbolEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || limit == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<(u8, &SymbolEntry)> = Vec::new();
        for entry in &self.entries {
            let code = entry.code.to_lowercase();
            let rank = if code == needle {
                0
            } else if code.starts_with(&needle) {
                1
            } else if code.contains(&needle) || entry.name.to_lowercase().contains(&needle) {
                2
            } else {
                continue;
            };
            ranked.push((rank, entry));
        }

        // sort_by_key is stable, so directory order is kept within a rank
        ranked.sort_by_key(|&(rank, _)| rank);
        ranked.into_iter().take(limit).map(|(_, e)| e).collect()
    }
}
