// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Id-keyed list records: service items and gallery images.

use crate::document::{ContentDocument, GalleryImage, ServiceItem};
use crate::error::{PathError, Result};

/// A record living in one of the document's id-keyed lists.
pub trait ListRecord: Clone + Send + Sync + 'static {
    /// Fields supplied when adding a record (everything but the id).
    type Draft: Send;
    /// Optional replacements merged into an existing record.
    type Patch: Send;

    /// Human name used in commit messages, e.g. "service".
    const NOUN: &'static str;

    fn id(&self) -> u64;
    fn build(id: u64, draft: Self::Draft) -> Self;
    fn merge(&mut self, patch: Self::Patch);

    /// Text identifying the record in commit messages.
    fn label(&self) -> &str;
    fn draft_label(draft: &Self::Draft) -> &str;
    fn patch_label(patch: &Self::Patch) -> Option<&str>;

    fn list(doc: &ContentDocument) -> &[Self];
    fn list_mut(doc: &mut ContentDocument) -> &mut Vec<Self>;
}

/// `max(existing ids, 0) + 1`, or `None` when the largest id is `u64::MAX`.
#[must_use]
pub fn next_id<R: ListRecord>(items: &[R]) -> Option<u64> {
    items.iter().map(R::id).max().unwrap_or(0).checked_add(1)
}

/// Append a new record with the next id; returns that id.
pub fn insert<R: ListRecord>(doc: &mut ContentDocument, draft: R::Draft) -> Result<u64> {
    let items = R::list_mut(doc);
    let id = next_id(items).ok_or(PathError::IdsExhausted(R::NOUN))?;
    items.push(R::build(id, draft));
    Ok(id)
}

/// Remove the record with `id`, returning it if it was present.
pub fn remove<R: ListRecord>(doc: &mut ContentDocument, id: u64) -> Option<R> {
    let items = R::list_mut(doc);
    let position = items.iter().position(|item| item.id() == id)?;
    Some(items.remove(position))
}

/// Merge `patch` into the record with `id`. Returns false (and leaves the
/// list untouched) when no record matches.
pub fn patch<R: ListRecord>(doc: &mut ContentDocument, id: u64, patch: R::Patch) -> bool {
    match R::list_mut(doc).iter_mut().find(|item| item.id() == id) {
        Some(item) => {
            item.merge(patch);
            true
        }
        None => false,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceDraft {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServicePatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl ListRecord for ServiceItem {
    type Draft = ServiceDraft;
    type Patch = ServicePatch;

    const NOUN: &'static str = "service";

    fn id(&self) -> u64 {
        self.id
    }

    fn build(id: u64, draft: ServiceDraft) -> Self {
        ServiceItem {
            id,
            title: draft.title,
            description: draft.description,
        }
    }

    fn merge(&mut self, patch: ServicePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }

    fn label(&self) -> &str {
        &self.title
    }

    fn draft_label(draft: &ServiceDraft) -> &str {
        &draft.title
    }

    fn patch_label(patch: &ServicePatch) -> Option<&str> {
        patch.title.as_deref()
    }

    fn list(doc: &ContentDocument) -> &[Self] {
        &doc.services.items
    }

    fn list_mut(doc: &mut ContentDocument) -> &mut Vec<Self> {
        &mut doc.services.items
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryDraft {
    pub url: String,
    pub caption: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GalleryPatch {
    pub url: Option<String>,
    pub caption: Option<String>,
}

impl ListRecord for GalleryImage {
    type Draft = GalleryDraft;
    type Patch = GalleryPatch;

    const NOUN: &'static str = "gallery image";

    fn id(&self) -> u64 {
        self.id
    }

    fn build(id: u64, draft: GalleryDraft) -> Self {
        GalleryImage {
            id,
            url: draft.url,
            caption: draft.caption,
        }
    }

    fn merge(&mut self, patch: GalleryPatch) {
        if let Some(url) = patch.url {
            self.url = url;
        }
        if let Some(caption) = patch.caption {
            self.caption = caption;
        }
    }

    fn label(&self) -> &str {
        &self.caption
    }

    fn draft_label(draft: &GalleryDraft) -> &str {
        &draft.caption
    }

    fn patch_label(patch: &GalleryPatch) -> Option<&str> {
        patch.caption.as_deref()
    }

    fn list(doc: &ContentDocument) -> &[Self] {
        &doc.gallery.images
    }

    fn list_mut(doc: &mut ContentDocument) -> &mut Vec<Self> {
        &mut doc.gallery.images
    }
}
