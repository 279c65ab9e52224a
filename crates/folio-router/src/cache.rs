// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded, time-limited memoization of handler results.
//!
//! Entries are keyed by handler identity plus the normalized query text.
//! Expiry is checked lazily on lookup; there is no background sweeper.
//! When full, inserting a new key evicts the entry with the oldest
//! creation time (not the least recently read).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use folio_config::model::CacheConfig;
use folio_core::StructuredResult;
use serde::Serialize;
use sha2::{Digest, Sha256};
use tokio::time::Instant;
use tracing::debug;

/// Snapshot of cache occupancy and effectiveness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub total_requests: u64,
    pub capacity: usize,
    pub ttl_secs: u64,
}

struct CacheEntry {
    value: StructuredResult,
    created_at: Instant,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    hits: u64,
    misses: u64,
}

/// Exact-match response cache shared by all handlers.
pub struct ResponseCache {
    state: Mutex<CacheState>,
    max_size: usize,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self {
            state: Mutex::new(CacheState::default()),
            max_size,
            ttl,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.max_size, config.ttl())
    }

    /// Hex SHA-256 of `"{handler_id}:{normalized query}"`.
    pub fn cache_key(query: &str, handler_id: &str) -> String {
        let content = format!("{handler_id}:{}", normalize(query));
        hex::encode(Sha256::digest(content.as_bytes()))
    }

    /// Returns a copy of the stored result if present and younger than the TTL.
    ///
    /// An expired entry is removed and counted as a miss.
    pub fn get(&self, query: &str, handler_id: &str) -> Option<StructuredResult> {
        let key = Self::cache_key(query, handler_id);
        let mut state = self.lock();

        let age = state.entries.get(&key).map(|e| e.created_at.elapsed());
        match age {
            Some(age) if age < self.ttl => {
                state.hits += 1;
                debug!(handler = handler_id, age_secs = age.as_secs_f64(), "cache hit");
                state.entries.get(&key).map(|e| e.value.clone())
            }
            Some(age) => {
                state.entries.remove(&key);
                state.misses += 1;
                debug!(handler = handler_id, age_secs = age.as_secs_f64(), "cache entry expired");
                None
            }
            None => {
                state.misses += 1;
                debug!(handler = handler_id, "cache miss");
                None
            }
        }
    }

    /// Stores a copy of `value`, evicting the oldest entry when full.
    pub fn set(&self, query: &str, handler_id: &str, value: &StructuredResult) {
        if self.max_size == 0 {
            return;
        }

        let key = Self::cache_key(query, handler_id);
        let mut state = self.lock();

        if state.entries.len() >= self.max_size && !state.entries.contains_key(&key) {
            let oldest = state
                .entries
                .iter()
                .min_by_key(|(_, e)| e.created_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                state.entries.remove(&oldest);
                debug!(size = state.entries.len(), "evicted oldest cache entry");
            }
        }

        state.entries.insert(
            key,
            CacheEntry {
                value: value.clone(),
                created_at: Instant::now(),
            },
        );
        debug!(handler = handler_id, size = state.entries.len(), "cached response");
    }

    pub fn stats(&self) -> CacheStats {
        let state = self.lock();
        let total = state.hits + state.misses;
        CacheStats {
            size: state.entries.len(),
            hits: state.hits,
            misses: state.misses,
            hit_rate: if total > 0 {
                state.hits as f64 / total as f64
            } else {
                0.0
            },
            total_requests: total,
            capacity: self.max_size,
            ttl_secs: self.ttl.as_secs(),
        }
    }

    /// Drops every entry and resets the hit/miss counters.
    pub fn clear(&self) {
        let mut state = self.lock();
        *state = CacheState::default();
        debug!("cache cleared");
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        // Every critical section leaves the state consistent, so a poisoned
        // lock is still safe to reuse.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Short stable digest of a query, for telemetry that must not carry raw text.
pub fn query_hash(query: &str) -> String {
    let digest = Sha256::digest(normalize(query).as_bytes());
    hex::encode(&digest[..8])
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}
