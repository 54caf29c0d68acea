// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! The remote content store contract.

use crate::error::Result;
use async_trait::async_trait;
use content::ContentDocument;
use sha2::{Digest, Sha256};
use std::fmt;

/// Opaque token naming the exact remote state a write is conditioned on
/// (a git blob SHA, or a content hash for local stores).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(token: impl Into<String>) -> Self {
        VersionToken(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A document together with the version it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned {
    pub document: ContentDocument,
    pub version: Option<VersionToken>,
}

/// Key-document store holding the single site content document.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Fetch the current document, bypassing caches.
    async fn read(&self) -> Result<Versioned>;

    /// Fetch only the current version token; `None` when no document exists.
    async fn version(&self) -> Result<Option<VersionToken>>;

    /// Replace the document, conditioned on `expected` still being current.
    ///
    /// Fails with `VersionMismatch` when another writer got there first.
    /// Returns the new version when the store reports one.
    async fn write(
        &self,
        document: &ContentDocument,
        expected: Option<&VersionToken>,
        message: &str,
    ) -> Result<Option<VersionToken>>;
}

/// The on-disk/on-wire bytes of a document: two-space JSON plus newline.
pub fn encode_document(document: &ContentDocument) -> Result<Vec<u8>> {
    let mut text = document.to_pretty_json()?;
    text.push('\n');
    Ok(text.into_bytes())
}

/// SHA-256 of `bytes`, hex encoded.
#[must_use]
pub fn content_hash(bytes: &[u8]) -> VersionToken {
    VersionToken(hex::encode(Sha256::digest(bytes)))
}
