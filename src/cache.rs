//! File-backed cache of identifier → accession and sequence.
//!
//! The cache is loaded once, passed explicitly to the code that needs it and
//! saved by the caller when the run is over.

use crate::error::{Error, Result};
use crate::utils::to_pretty_json;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accession: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
}

/// On-disk value: either a full entry or the plain accession string of the
/// older `ID_relationships.json` layout.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Accession(String),
    Entry(CacheEntry),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdCache {
    entries: IndexMap<String, CacheEntry>,
}

impl IdCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a cache from `path`. A missing file gives an empty cache.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("No cache found at {}, starting empty", path.display());
            return Ok(Self::new());
        }

        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let cache = Self::from_json(&text).map_err(|e| Error::json(path, e))?;
        info!("Loaded {} cached identifiers from {}", cache.len(), path.display());
        Ok(cache)
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let stored: IndexMap<String, StoredEntry> = serde_json::from_str(text)?;
        let entries = stored
            .into_iter()
            .map(|(id, value)| {
                let entry = match value {
                    StoredEntry::Accession(accession) => CacheEntry {
                        accession: Some(accession),
                        sequence: None,
                    },
                    StoredEntry::Entry(entry) => entry,
                };
                (id, entry)
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        to_pretty_json(&self.entries)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = self.to_json().map_err(|e| Error::json(path, e))?;
        std::fs::write(path, text).map_err(|e| Error::io(path, e))?;
        debug!("Saved {} identifiers to {}", self.len(), path.display());
        Ok(())
    }

    /// Cached sequence of `id`. Empty values count as missing.
    pub fn lookup(&self, id: &str) -> Option<&str> {
        self.entries
            .get(id)
            .and_then(|e| e.sequence.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Cached accession of `id`. Empty values count as missing.
    pub fn accession(&self, id: &str) -> Option<&str> {
        self.entries
            .get(id)
            .and_then(|e| e.accession.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn store(&mut self, id: impl Into<String>, sequence: impl Into<String>) {
        self.entries.entry(id.into()).or_default().sequence = Some(sequence.into());
    }

    pub fn store_accession(&mut self, id: impl Into<String>, accession: impl Into<String>) {
        self.entries.entry(id.into()).or_default().accession = Some(accession.into());
    }

    /// Store every record of a FASTA text. The first word of a header is the
    /// identifier, an optional second word the accession. Returns the number of
    /// sequences stored.
    pub fn import_fasta(&mut self, text: &str) -> usize {
        let mut count = 0;
        let mut current: Option<String> = None;
        let mut sequence = String::new();

        let mut flush = |cache: &mut Self, id: Option<String>, seq: &mut String| {
            if let Some(id) = id {
                if !seq.is_empty() {
                    cache.store(id, std::mem::take(seq));
                    count += 1;
                }
            }
            seq.clear();
        };

        for line in text.lines().map(str::trim) {
            if let Some(header) = line.strip_prefix('>') {
                flush(self, current.take(), &mut sequence);
                let mut words = header.split_whitespace();
                current = words.next().map(str::to_string);
                if let (Some(id), Some(accession)) = (&current, words.next()) {
                    self.store_accession(id.clone(), accession);
                }
            } else {
                sequence.extend(line.chars().filter(|c| !c.is_whitespace()));
            }
        }
        flush(self, current.take(), &mut sequence);

        count
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
