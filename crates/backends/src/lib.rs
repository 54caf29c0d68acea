// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Remote collaborators of the site CMS.
//!
//! - [`ContentStore`]: where the content document lives. [`GitHubStore`] is
//!   the system of record, [`FileStore`] serves local runs and
//!   [`MemoryStore`] serves tests.
//! - [`ImageHost`]: turns an uploaded image into a public URL.
//! - [`IdentityProvider`] and [`Session`]: who is signed in and whether they
//!   may edit.

mod error;
mod file;
mod github;
mod http;
pub mod identity;
pub mod images;
mod memory;
mod store;

pub use error::{BackendError, Result};
pub use file::FileStore;
pub use github::{GitHubConfig, GitHubStore};
pub use identity::{
    FirebaseConfig, FirebaseIdentity, IdentityProvider, Session, StaticIdentity, User,
};
pub use images::{ImageFile, ImageHost, ImgBb, ImgBbConfig, MAX_UPLOAD_BYTES, encode_upload};
pub use memory::{MemoryStore, ScriptedFailure};
pub use store::{ContentStore, VersionToken, Versioned, content_hash, encode_document};
