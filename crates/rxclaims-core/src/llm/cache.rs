//! In-memory TTL cache for embeddings and completions
//!
//! Queries repeat often in a chat session ("and the Lipitor one?"), so the
//! query embedding and the final answer are both worth keeping around.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::RwLock;
use std::time::{Duration, SystemTime};

/// Upper bound on stored entries
pub const MAX_ENTRIES: usize = 10_000;

/// Entries dropped per eviction once the cache is full of live entries
const EVICT_BATCH: usize = MAX_ENTRIES / 10;

#[derive(Clone)]
enum CachedValue {
    Text(String),
    Embedding(Vec<f32>),
}

#[derive(Clone)]
struct CacheEntry {
    value: CachedValue,
    expires_at: SystemTime,
}

/// In-memory cache for LLM responses
pub struct LLMCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl LLMCache {
    /// Create new cache with default TTL of 1 hour
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(3600))
    }

    /// Create cache with custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn get(&self, key: &str) -> Option<CachedValue> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;

        if SystemTime::now() < entry.expires_at {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    fn set(&self, key: String, value: CachedValue) {
        if self.ttl.is_zero() {
            return;
        }
        let entry = CacheEntry {
            value,
            expires_at: SystemTime::now() + self.ttl,
        };
        if let Ok(mut entries) = self.entries.write() {
            if entries.len() >= MAX_ENTRIES && !entries.contains_key(&key) {
                evict(&mut entries);
            }
            entries.insert(key, entry);
        }
    }

    pub fn get_text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            CachedValue::Text(text) => Some(text),
            CachedValue::Embedding(_) => None,
        }
    }

    pub fn set_text(&self, key: String, text: String) {
        self.set(key, CachedValue::Text(text));
    }

    pub fn get_embedding(&self, key: &str) -> Option<Vec<f32>> {
        match self.get(key)? {
            CachedValue::Embedding(embedding) => Some(embedding),
            CachedValue::Text(_) => None,
        }
    }

    pub fn set_embedding(&self, key: String, embedding: Vec<f32>) {
        self.set(key, CachedValue::Embedding(embedding));
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let Ok(entries) = self.entries.read() else {
            return CacheStats::default();
        };
        let now = SystemTime::now();
        let total = entries.len();
        let expired = entries.values().filter(|e| now >= e.expires_at).count();

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
        }
    }
}

impl Default for LLMCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

/// Drop expired entries; if that frees nothing, drop the
/// [`EVICT_BATCH`] entries closest to expiry.
fn evict(entries: &mut HashMap<String, CacheEntry>) {
    let now = SystemTime::now();
    entries.retain(|_, entry| now < entry.expires_at);
    if entries.len() < MAX_ENTRIES {
        return;
    }

    let mut by_expiry: Vec<(SystemTime, String)> = entries
        .iter()
        .map(|(key, entry)| (entry.expires_at, key.clone()))
        .collect();
    by_expiry.sort_unstable_by_key(|(expires_at, _)| *expires_at);
    for (_, key) in by_expiry.into_iter().take(EVICT_BATCH) {
        entries.remove(&key);
    }
}

fn hashed_key(kind: &str, model: &str, payload: &str) -> String {
    let mut hasher = DefaultHasher::new();
    model.hash(&mut hasher);
    payload.hash(&mut hasher);
    format!("{}:{}:{:x}", kind, model, hasher.finish())
}

/// Generate cache key for embeddings
pub fn embedding_cache_key(model: &str, text: &str) -> String {
    hashed_key("embed", model, text)
}

/// Generate cache key for chat completions
pub fn chat_cache_key(model: &str, messages: &str) -> String {
    hashed_key("chat", model, messages)
}
