//! Session cache for analysis results
//!
//! Results are keyed by a canonical rendering of the waste entries so that
//! resubmitting the same batch (in any order) never triggers a second
//! chat-completion call. The cache lives for one process/session: no
//! eviction, no expiry, no persistence.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::models::{RecyclingResult, WasteEntry};

/// The fields of an entry that influence the analysis result
#[derive(Debug, Serialize)]
struct KeyTuple<'a> {
    #[serde(rename = "type")]
    material_type: &'a str,
    qty: f64,
    src: &'a str,
    desc: &'a str,
    cont: Option<f64>,
}

impl KeyTuple<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        self.material_type
            .cmp(other.material_type)
            .then_with(|| self.qty.total_cmp(&other.qty))
            .then_with(|| self.src.cmp(other.src))
            .then_with(|| self.desc.cmp(other.desc))
            .then_with(|| match (self.cont, other.cont) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                (a, b) => a.is_some().cmp(&b.is_some()),
            })
    }
}

/// Canonical, order-independent key for a list of waste entries
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build the key for a list of entries
    ///
    /// Entries are sorted by material type (ties broken on the remaining
    /// tracked fields) and rendered as compact JSON. The entry `id` and
    /// moisture level do not affect the key.
    pub fn from_entries(entries: &[WasteEntry]) -> Self {
        let mut tuples: Vec<KeyTuple<'_>> = entries
            .iter()
            .map(|e| KeyTuple {
                material_type: &e.material_type,
                qty: e.quantity,
                src: &e.source_category,
                desc: e.description.as_deref().unwrap_or(""),
                cont: e.contamination,
            })
            .collect();
        tuples.sort_by(|a, b| a.compare(b));

        // Serializing borrowed strings and floats cannot fail
        let canonical = serde_json::to_string(&tuples).unwrap_or_default();
        Self(canonical)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short SHA-256 digest of the canonical key, for log lines
    pub fn digest(&self) -> String {
        let hash = Sha256::digest(self.0.as_bytes());
        hex::encode(&hash[..6])
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// In-memory map from cache key to a previously computed result
///
/// Shared behind an `Arc` by the analyzer and the server; reads and writes
/// are guarded by an `RwLock`.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: RwLock<HashMap<CacheKey, RecyclingResult>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a stored result
    pub fn get(&self, key: &CacheKey) -> Option<RecyclingResult> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    /// Store a result, replacing any previous value for the key
    pub fn put(&self, key: CacheKey, result: RecyclingResult) {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key, result);
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every stored result, returning how many were removed
    pub fn clear(&self) -> usize {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let removed = entries.len();
        entries.clear();
        removed
    }
}
