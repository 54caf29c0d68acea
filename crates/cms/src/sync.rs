// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The content synchronizer.
//!
//! Owns the site document and is the only thing that mutates it. Every
//! mutation follows the same two steps:
//!
//! 1. Apply the change to a copy of the working document and record it as
//!    *pending*. Subscribers see it immediately.
//! 2. Commit: re-read the store's version token, write conditioned on it,
//!    and retry a bounded number of times when another writer got there
//!    first. After a successful write the synchronizer waits for the
//!    external deploy to pick the change up, reloads, and the pending
//!    document becomes *committed*.
//!
//! A failed commit leaves the pending document in place. It can be
//! re-published with [`Synchronizer::publish_pending`] or thrown away with
//! [`Synchronizer::discard_pending`].
//!
//! Only one commit runs at a time. The gate is an in-process flag; the
//! store's version check is what protects against other processes.

use crate::config::SyncSettings;
use crate::error::{Result, SyncError};
use crate::retry::RetryPolicy;
use backends::{BackendError, ContentStore, Session, VersionToken};
use content::lists::{self, ListRecord};
use content::{
    ContentDocument, FieldPath, GalleryDraft, GalleryImage, GalleryPatch, ServiceDraft,
    ServiceItem, ServicePatch,
};
use diagnostics::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, watch};

/// What [`Synchronizer::load`] ended up with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Remote { version: Option<VersionToken> },
    /// The store could not be read; the built-in document is in use.
    Fallback { reason: String },
}

/// A successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub message: String,
    pub version: Option<VersionToken>,
    /// Write attempts, including the one that succeeded.
    pub attempts: usize,
}

/// Read-only view of the synchronizer handed to subscribers.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// The working document: pending if there is one, committed otherwise.
    pub document: Arc<ContentDocument>,
    pub pending: bool,
    pub saving: bool,
    pub edit_mode: bool,
    pub loading: bool,
}

impl Snapshot {
    #[must_use]
    pub fn read(&self, path: &FieldPath) -> &str {
        content::read(&self.document, path)
    }

    #[must_use]
    pub fn read_dotted(&self, section: &str, field: &str) -> &str {
        content::read_dotted(&self.document, section, field)
    }
}

struct State {
    committed: Arc<ContentDocument>,
    pending: Option<Arc<ContentDocument>>,
    version: Option<VersionToken>,
    edit_mode: bool,
    loading: bool,
}

impl State {
    fn working(&self) -> &Arc<ContentDocument> {
        self.pending.as_ref().unwrap_or(&self.committed)
    }
}

/// Holds the saving flag; clears it on drop, including on early return.
struct SaveGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SaveGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SaveGuard { flag })
    }
}

impl Drop for SaveGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct Synchronizer {
    store: Arc<dyn ContentStore>,
    retry: RetryPolicy,
    settle: Duration,
    state: Mutex<State>,
    saving: AtomicBool,
    snapshots: watch::Sender<Snapshot>,
}

impl Synchronizer {
    /// A synchronizer showing the built-in document until [`load`] runs.
    ///
    /// [`load`]: Synchronizer::load
    pub fn new(store: Arc<dyn ContentStore>, settings: SyncSettings) -> Self {
        let committed = Arc::new(ContentDocument::fallback());
        let (snapshots, _) = watch::channel(Snapshot {
            document: committed.clone(),
            pending: false,
            saving: false,
            edit_mode: false,
            loading: true,
        });
        Self {
            store,
            retry: RetryPolicy::new(settings.max_attempts, settings.backoff()),
            settle: settings.settle(),
            state: Mutex::new(State {
                committed,
                pending: None,
                version: None,
                edit_mode: false,
                loading: true,
            }),
            saving: AtomicBool::new(false),
            snapshots,
        }
    }

    #[must_use]
    pub fn store_name(&self) -> &str {
        self.store.name()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.snapshots.borrow().pending
    }

    /// The last document confirmed by the store (or the fallback).
    pub async fn committed(&self) -> Arc<ContentDocument> {
        self.state.lock().await.committed.clone()
    }

    pub async fn version(&self) -> Option<VersionToken> {
        self.state.lock().await.version.clone()
    }

    async fn publish(&self) {
        let state = self.state.lock().await;
        self.snapshots.send_replace(Snapshot {
            document: state.working().clone(),
            pending: state.pending.is_some(),
            saving: self.is_saving(),
            edit_mode: state.edit_mode,
            loading: state.loading,
        });
    }

    /// Fetch the document from the store. Never fails: any error swaps in
    /// the built-in document. A pending change, if any, stays pending.
    pub async fn load(&self) -> LoadOutcome {
        let read = self.store.read().await;
        let outcome = {
            let mut state = self.state.lock().await;
            let outcome = match read {
                Ok(versioned) => {
                    info!(
                        "loaded content from {store}",
                        store: self.store.name()
                    );
                    state.committed = Arc::new(versioned.document);
                    state.version = versioned.version.clone();
                    LoadOutcome::Remote {
                        version: versioned.version,
                    }
                }
                Err(err) => {
                    let reason = err.to_string();
                    warn!(
                        "loading content from {store} failed, using defaults: {reason}",
                        store: self.store.name(),
                        reason: reason.as_str()
                    );
                    state.committed = Arc::new(ContentDocument::fallback());
                    state.version = None;
                    LoadOutcome::Fallback { reason }
                }
            };
            state.loading = false;
            outcome
        };
        self.publish().await;
        outcome
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.is_saving() {
            debug!("mutation refused: a save is in flight");
            return Err(SyncError::Busy);
        }
        Ok(())
    }

    async fn working_copy(&self) -> ContentDocument {
        ContentDocument::clone(self.state.lock().await.working())
    }

    /// Set one field and commit.
    pub async fn update(&self, path: &FieldPath, value: impl Into<String>) -> Result<Receipt> {
        self.ensure_idle()?;
        let mut document = self.working_copy().await;
        content::assign(&mut document, path, value)?;
        self.commit(document, &format!("Update {path} via admin panel"))
            .await
    }

    /// [`update`](Synchronizer::update) with a `section` + dotted `field`
    /// such as `("services", "items.0.title")`.
    pub async fn update_dotted(
        &self,
        section: &str,
        field: &str,
        value: impl Into<String>,
    ) -> Result<Receipt> {
        let path = FieldPath::parse(section, field)?;
        self.update(&path, value).await
    }

    pub async fn add_item<R: ListRecord>(&self, draft: R::Draft) -> Result<Receipt> {
        self.ensure_idle()?;
        let message = format!("Add {}: {} via admin panel", R::NOUN, R::draft_label(&draft));
        let mut document = self.working_copy().await;
        let id = lists::insert::<R>(&mut document, draft)?;
        debug!("adding {noun} {id}", noun: R::NOUN, id: id);
        self.commit(document, &message).await
    }

    pub async fn delete_item<R: ListRecord>(&self, id: u64) -> Result<Receipt> {
        self.ensure_idle()?;
        let mut document = self.working_copy().await;
        let label = lists::remove::<R>(&mut document, id)
            .map(|item| item.label().to_string())
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| id.to_string());
        let message = format!("Delete {}: {label} via admin panel", R::NOUN);
        self.commit(document, &message).await
    }

    /// Merge `patch` into the element with `id`. When nothing matches the
    /// list is left as is and the document is still committed.
    pub async fn update_item<R: ListRecord>(&self, id: u64, patch: R::Patch) -> Result<Receipt> {
        self.ensure_idle()?;
        let label = R::patch_label(&patch)
            .filter(|label| !label.is_empty())
            .map_or_else(|| id.to_string(), str::to_string);
        let message = format!("Update {}: {label} via admin panel", R::NOUN);
        let mut document = self.working_copy().await;
        if !lists::patch::<R>(&mut document, id, patch) {
            debug!("no {noun} with id {id}", noun: R::NOUN, id: id);
        }
        self.commit(document, &message).await
    }

    pub async fn add_service(&self, draft: ServiceDraft) -> Result<Receipt> {
        self.add_item::<ServiceItem>(draft).await
    }

    pub async fn delete_service(&self, id: u64) -> Result<Receipt> {
        self.delete_item::<ServiceItem>(id).await
    }

    pub async fn update_service(&self, id: u64, patch: ServicePatch) -> Result<Receipt> {
        self.update_item::<ServiceItem>(id, patch).await
    }

    pub async fn add_gallery_image(&self, draft: GalleryDraft) -> Result<Receipt> {
        self.add_item::<GalleryImage>(draft).await
    }

    pub async fn delete_gallery_image(&self, id: u64) -> Result<Receipt> {
        self.delete_item::<GalleryImage>(id).await
    }

    pub async fn update_gallery_image(&self, id: u64, patch: GalleryPatch) -> Result<Receipt> {
        self.update_item::<GalleryImage>(id, patch).await
    }

    /// Persist `document` as the new site content.
    ///
    /// Returns [`SyncError::Busy`] without touching the store when another
    /// commit is in flight. Otherwise the document becomes pending and is
    /// written under the retry policy; each attempt reads the current
    /// version immediately before writing.
    pub async fn commit(&self, document: ContentDocument, message: &str) -> Result<Receipt> {
        let Some(guard) = SaveGuard::acquire(&self.saving) else {
            debug!("commit refused: a save is in flight");
            return Err(SyncError::Busy);
        };

        let document = Arc::new(document);
        self.state.lock().await.pending = Some(document.clone());
        self.publish().await;
        info!("committing {message}", message: message);

        let attempted = self
            .retry
            .run(
                || self.write_once(&document, message),
                BackendError::is_version_mismatch,
            )
            .await;
        let attempts = attempted.attempts;

        let result = match attempted.result {
            Ok(version) => {
                tokio::time::sleep(self.settle).await;
                let reloaded = self.store.read().await;

                let mut state = self.state.lock().await;
                match reloaded {
                    Ok(current) => {
                        state.committed = Arc::new(current.document);
                        state.version = current.version;
                    }
                    Err(err) => {
                        let reason = err.to_string();
                        warn!(
                            "reload after commit failed, keeping written document: {reason}",
                            reason: reason.as_str()
                        );
                        state.committed = document.clone();
                        state.version = version.clone();
                    }
                }
                state.pending = None;
                info!(
                    "committed {message} after {attempts} attempts",
                    message: message,
                    attempts: attempts
                );
                Ok(Receipt {
                    message: message.to_string(),
                    version,
                    attempts,
                })
            }
            Err(err) => {
                let err = SyncError::from_backend(err, attempts);
                let reason = err.to_string();
                error!(
                    "commit {message} failed: {reason}",
                    message: message,
                    reason: reason.as_str()
                );
                Err(err)
            }
        };

        drop(guard);
        self.publish().await;
        result
    }

    async fn write_once(
        &self,
        document: &ContentDocument,
        message: &str,
    ) -> backends::Result<Option<VersionToken>> {
        let current = self.store.version().await?;
        debug!(
            "writing against version {version}",
            version: current.as_ref().map_or("(none)", VersionToken::as_str)
        );
        self.store.write(document, current.as_ref(), message).await
    }

    /// Drop the pending document, returning whether there was one.
    pub async fn discard_pending(&self) -> Result<bool> {
        let Some(guard) = SaveGuard::acquire(&self.saving) else {
            return Err(SyncError::Busy);
        };
        let discarded = self.state.lock().await.pending.take().is_some();
        if discarded {
            info!("discarded pending changes");
        }
        drop(guard);
        self.publish().await;
        Ok(discarded)
    }

    /// Commit the pending document left behind by a failed save.
    pub async fn publish_pending(&self) -> Result<Receipt> {
        self.ensure_idle()?;
        let pending = self
            .state
            .lock()
            .await
            .pending
            .clone()
            .ok_or(SyncError::NothingPending)?;
        self.commit(
            ContentDocument::clone(&pending),
            "Publish pending changes via admin panel",
        )
        .await
    }

    /// Flip edit mode when `session` belongs to the admin; otherwise leave
    /// it alone. Returns the resulting mode.
    pub async fn toggle_edit_mode(&self, session: &Session) -> bool {
        let mode = {
            let mut state = self.state.lock().await;
            if session.is_authorized() {
                state.edit_mode = !state.edit_mode;
            } else {
                debug!("edit mode toggle ignored: not authorized");
            }
            state.edit_mode
        };
        self.publish().await;
        mode
    }
}
