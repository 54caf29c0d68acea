// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! # CMS: keeping the site document in sync
//!
//! The [`Synchronizer`] owns the content document, applies edits
//! optimistically and commits them to a [`backends::ContentStore`] with a
//! bounded retry on version conflicts. [`editor::EditableField`] drives a
//! single field through view, edit and save. [`SiteConfig`] wires the
//! collaborators together from YAML and the environment.

pub mod config;
pub mod editor;
mod error;
mod retry;
mod sync;

pub use config::{ConfigError, ContentBackend, SiteConfig, SyncSettings};
pub use editor::{EditableField, EditorError, FieldKind, FieldState, ImageMethod};
pub use error::{Result, SAVE_FAILED, SyncError, WAIT_FOR_DEPLOY};
pub use retry::{Attempted, RetryPolicy};
pub use sync::{LoadOutcome, Receipt, Snapshot, Synchronizer};
