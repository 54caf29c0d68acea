// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! In-process content store.
//!
//! Versions are content hashes, so a write conditioned on a stale version
//! fails the same way the hosted store does. Writes can be scripted to fail
//! and every call is counted, which is what the synchronizer tests lean on.

use crate::error::{BackendError, Result};
use crate::store::{ContentStore, VersionToken, Versioned, content_hash, encode_document};
use async_trait::async_trait;
use content::ContentDocument;
use diagnostics::*;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Failure injected into the next write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedFailure {
    /// Behave as if another writer committed first.
    VersionMismatch,
    /// Behave as if the store could not be reached.
    Unavailable,
}

#[derive(Default)]
struct Slot {
    document: Option<ContentDocument>,
    version: Option<VersionToken>,
    failures: VecDeque<ScriptedFailure>,
    messages: Vec<String>,
}

impl Slot {
    fn store(&mut self, document: ContentDocument) -> Result<VersionToken> {
        let version = content_hash(&encode_document(&document)?);
        self.document = Some(document);
        self.version = Some(version.clone());
        Ok(version)
    }
}

#[derive(Default)]
pub struct MemoryStore {
    slot: Mutex<Slot>,
    reads: AtomicUsize,
    version_reads: AtomicUsize,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// An empty store; reads fail with `NotFound` until the first write.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: ContentDocument) -> Result<Self> {
        let mut slot = Slot::default();
        slot.store(document)?;
        Ok(Self {
            slot: Mutex::new(slot),
            ..Self::default()
        })
    }

    /// Make the next `count` writes fail with `failure`.
    pub async fn fail_next_writes(&self, count: usize, failure: ScriptedFailure) {
        let mut slot = self.slot.lock().await;
        slot.failures.extend(std::iter::repeat_n(failure, count));
    }

    /// Replace the document out of band, as a concurrent editor would.
    pub async fn replace(&self, document: ContentDocument) -> Result<VersionToken> {
        self.slot.lock().await.store(document)
    }

    pub async fn document(&self) -> Option<ContentDocument> {
        self.slot.lock().await.document.clone()
    }

    /// Commit messages of successful writes, oldest first.
    pub async fn messages(&self) -> Vec<String> {
        self.slot.lock().await.messages.clone()
    }

    #[must_use]
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn version_count(&self) -> usize {
        self.version_reads.load(Ordering::SeqCst)
    }

    /// Write attempts, including ones that failed.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn read(&self) -> Result<Versioned> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let slot = self.slot.lock().await;
        match &slot.document {
            Some(document) => Ok(Versioned {
                document: document.clone(),
                version: slot.version.clone(),
            }),
            None => Err(BackendError::NotFound("memory document".to_string())),
        }
    }

    async fn version(&self) -> Result<Option<VersionToken>> {
        self.version_reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.slot.lock().await.version.clone())
    }

    async fn write(
        &self,
        document: &ContentDocument,
        expected: Option<&VersionToken>,
        message: &str,
    ) -> Result<Option<VersionToken>> {
        let attempt = self.writes.fetch_add(1, Ordering::SeqCst) + 1;
        let mut slot = self.slot.lock().await;

        match slot.failures.pop_front() {
            Some(ScriptedFailure::VersionMismatch) => {
                debug!("memory store: scripted mismatch on write {attempt}", attempt: attempt);
                return Err(BackendError::VersionMismatch(
                    "content.json does not match the expected sha".to_string(),
                ));
            }
            Some(ScriptedFailure::Unavailable) => {
                return Err(BackendError::Unavailable("scripted outage".to_string()));
            }
            None => {}
        }

        if slot.version.as_ref() != expected {
            let current = slot.version.as_ref().map_or("none", VersionToken::as_str);
            return Err(BackendError::VersionMismatch(format!(
                "content.json does not match {current}"
            )));
        }

        let version = slot.store(document.clone())?;
        slot.messages.push(message.to_string());
        Ok(Some(version))
    }
}
