//! Append-only store for fetched dashboard documents.
//!
//! Responsibilities:
//! - Deduplicate dashboard fetches across resolution tasks.
//! - Serialize `exists`/`get`/`put` behind a single lock.
//!
//! Does NOT handle:
//! - Fetching (callers fetch outside the lock and `put` the result).
//! - Eviction; documents live for the lifetime of the process.
//!
//! Invariants:
//! - A cached document is never mutated or evicted.
//! - The lock is held for one call at a time, never across a network fetch,
//!   so two concurrent callers may both fetch the same uid (benign duplicate
//!   work, identical content).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{ClientError, Result};
use crate::models::DashboardDocument;

/// Shared dashboard-document store keyed by stable identifier (uid).
///
/// Owned by the embedding application and injected into the client,
/// typically behind an `Arc`; no global instance exists.
#[derive(Debug, Default)]
pub struct DashboardCache {
    documents: Mutex<HashMap<String, DashboardDocument>>,
}

impl DashboardCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff a document is cached under `uid`.
    pub fn exists(&self, uid: &str) -> bool {
        self.lock().contains_key(uid)
    }

    /// The cached document for `uid`; `NotCached` if absent.
    pub fn get(&self, uid: &str) -> Result<DashboardDocument> {
        self.lock()
            .get(uid)
            .cloned()
            .ok_or_else(|| ClientError::not_cached(uid))
    }

    /// Store a document under `uid`.
    ///
    /// A second `put` overwrites (last writer wins). Documents for one uid
    /// are immutable upstream, so concurrent fetchers write equal content.
    pub fn put(&self, uid: impl Into<String>, document: DashboardDocument) {
        self.lock().insert(uid.into(), document);
    }

    /// Number of cached documents.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Critical sections are single map operations; a poisoned lock cannot
    // hold a torn map, so the poison is discarded.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, DashboardDocument>> {
        self.documents.lock().unwrap_or_else(|e| e.into_inner())
    }
}
