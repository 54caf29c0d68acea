// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Editable fields: view, edit, save.
//!
//! An [`EditableField`] is bound to one [`FieldPath`]. It starts in
//! [`FieldState::Viewing`], opens into [`FieldState::Editing`] when edit mode
//! is on, and passes through [`FieldState::Saving`] while the synchronizer
//! commits. A failed save returns to `Editing` with the draft intact.

use crate::error::SyncError;
use crate::sync::{Receipt, Snapshot, Synchronizer};
use backends::{BackendError, ImageFile, ImageHost, encode_upload};
use content::FieldPath;
use diagnostics::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Field is not being edited")]
    NotEditing,

    /// Rejected locally; nothing was sent.
    #[error("{0}")]
    Validation(String),

    #[error("Image upload failed: {0}")]
    Upload(#[source] BackendError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}

impl EditorError {
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            EditorError::Sync(err) => err.user_message(),
            EditorError::Upload(_) => "Failed to upload image. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Image,
    BackgroundImage,
}

impl FieldKind {
    fn is_image(self) -> bool {
        matches!(self, FieldKind::Image | FieldKind::BackgroundImage)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageMethod {
    #[default]
    Url,
    Upload,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    pub value: String,
    pub method: ImageMethod,
    pub file: Option<ImageFile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldState {
    Viewing,
    Editing(Draft),
    Saving,
}

#[derive(Debug, Clone)]
pub struct EditableField {
    path: FieldPath,
    kind: FieldKind,
    state: FieldState,
    last_error: Option<String>,
}

impl EditableField {
    #[must_use]
    pub fn new(path: FieldPath, kind: FieldKind) -> Self {
        Self {
            path,
            kind,
            state: FieldState::Viewing,
            last_error: None,
        }
    }

    #[must_use]
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    #[must_use]
    pub fn state(&self) -> &FieldState {
        &self.state
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    #[must_use]
    pub fn draft(&self) -> Option<&Draft> {
        match &self.state {
            FieldState::Editing(draft) => Some(draft),
            _ => None,
        }
    }

    /// Current value, or `fallback` when the document has nothing there.
    #[must_use]
    pub fn display<'a>(&self, snapshot: &'a Snapshot, fallback: &'a str) -> &'a str {
        content::read_or(&snapshot.document, &self.path, fallback)
    }

    /// Start editing with the current value. Only from `Viewing` and only
    /// while edit mode is on; returns whether the field opened.
    pub fn open(&mut self, snapshot: &Snapshot) -> bool {
        if self.state != FieldState::Viewing || !snapshot.edit_mode {
            return false;
        }
        self.state = FieldState::Editing(Draft {
            value: snapshot.read(&self.path).to_string(),
            ..Draft::default()
        });
        self.last_error = None;
        true
    }

    pub fn set_draft(&mut self, value: impl Into<String>) {
        if let FieldState::Editing(draft) = &mut self.state {
            draft.value = value.into();
        }
    }

    pub fn select_method(&mut self, method: ImageMethod) {
        if !self.kind.is_image() {
            return;
        }
        if let FieldState::Editing(draft) = &mut self.state {
            draft.method = method;
        }
    }

    /// Pick a file for upload; switches the draft to the upload method.
    pub fn attach_file(&mut self, file: ImageFile) {
        if !self.kind.is_image() {
            return;
        }
        if let FieldState::Editing(draft) = &mut self.state {
            draft.method = ImageMethod::Upload;
            draft.file = Some(file);
        }
    }

    pub fn cancel(&mut self) {
        self.state = FieldState::Viewing;
        self.last_error = None;
    }

    /// Save the draft through `sync`, uploading first when the draft is an
    /// image file. On failure the field goes back to `Editing` with the
    /// same draft and [`last_error`](EditableField::last_error) set.
    pub async fn save(
        &mut self,
        sync: &Synchronizer,
        host: &dyn ImageHost,
    ) -> Result<Receipt, EditorError> {
        let draft = match std::mem::replace(&mut self.state, FieldState::Saving) {
            FieldState::Editing(draft) => draft,
            other => {
                self.state = other;
                return Err(EditorError::NotEditing);
            }
        };

        match self.persist(&draft, sync, host).await {
            Ok(receipt) => {
                self.state = FieldState::Viewing;
                self.last_error = None;
                Ok(receipt)
            }
            Err(err) => {
                let shown = err.user_message();
                let path = self.path.to_string();
                warn!(
                    "saving {path} failed: {reason}",
                    path: path.as_str(),
                    reason: shown.as_str()
                );
                self.last_error = Some(shown);
                self.state = FieldState::Editing(draft);
                Err(err)
            }
        }
    }

    async fn persist(
        &self,
        draft: &Draft,
        sync: &Synchronizer,
        host: &dyn ImageHost,
    ) -> Result<Receipt, EditorError> {
        if !self.kind.is_image() {
            return Ok(sync.update(&self.path, draft.value.as_str()).await?);
        }

        let url = match draft.method {
            ImageMethod::Url => {
                let url = draft.value.trim();
                if url.is_empty() {
                    return Err(EditorError::Validation("Please enter an image URL".to_string()));
                }
                url.to_string()
            }
            ImageMethod::Upload => {
                let file = draft.file.as_ref().ok_or_else(|| {
                    EditorError::Validation("Please select an image file".to_string())
                })?;
                let payload = encode_upload(&file.bytes).map_err(|err| match err {
                    BackendError::InvalidImage(message) => EditorError::Validation(message),
                    other => EditorError::Upload(other),
                })?;
                debug!(
                    "uploading {name} ({size} bytes)",
                    name: file.name.as_str(),
                    size: file.len()
                );
                host.upload(&payload).await.map_err(EditorError::Upload)?
            }
        };
        Ok(sync.update(&self.path, url).await?)
    }
}
