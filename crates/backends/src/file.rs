// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Local JSON file content store.
//!
//! Stands in for the hosted document database during local development.
//! The version token is the SHA-256 of the file bytes; writes go to a
//! sibling temp file and are renamed into place.

use crate::error::{BackendError, Result};
use crate::store::{ContentStore, VersionToken, Versioned, content_hash, encode_document};
use async_trait::async_trait;
use content::ContentDocument;
use diagnostics::*;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

pub struct FileStore {
    path: PathBuf,
    // Serializes check-then-write within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_bytes(&self) -> Result<Option<Vec<u8>>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ContentStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn read(&self) -> Result<Versioned> {
        let bytes = self
            .load_bytes()
            .await?
            .ok_or_else(|| BackendError::NotFound(self.path.display().to_string()))?;
        let document = ContentDocument::from_json(&bytes)?;
        Ok(Versioned {
            document,
            version: Some(content_hash(&bytes)),
        })
    }

    async fn version(&self) -> Result<Option<VersionToken>> {
        Ok(self.load_bytes().await?.map(|bytes| content_hash(&bytes)))
    }

    async fn write(
        &self,
        document: &ContentDocument,
        expected: Option<&VersionToken>,
        message: &str,
    ) -> Result<Option<VersionToken>> {
        let _guard = self.write_lock.lock().await;

        let current = self.load_bytes().await?.map(|bytes| content_hash(&bytes));
        if current.as_ref() != expected {
            let path = self.path.display().to_string();
            return Err(BackendError::VersionMismatch(format!(
                "{path} does not match {}",
                expected.map_or("(none)", VersionToken::as_str)
            )));
        }

        let bytes = encode_document(document)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, &bytes).await?;
        tokio::fs::rename(&staging, &self.path).await?;

        let version = content_hash(&bytes);
        info!(
            "file store: {message} ({version})",
            message: message,
            version: version.as_str()
        );
        Ok(Some(version))
    }
}
