// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code)]

use async_trait::async_trait;
use backends::{ImageHost, MemoryStore, Session, User};
use cms::{SyncSettings, Synchronizer};
use content::ContentDocument;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const ADMIN: &str = "admin@example.com";

/// Production timing: 3 attempts, 2s backoff, 5s settle. Use with paused
/// time.
pub fn production() -> SyncSettings {
    SyncSettings::default()
}

pub fn instant() -> SyncSettings {
    SyncSettings {
        max_attempts: 3,
        backoff_ms: 0,
        settle_ms: 0,
    }
}

pub async fn loaded(
    document: ContentDocument,
    settings: SyncSettings,
) -> anyhow::Result<(Arc<MemoryStore>, Arc<Synchronizer>)> {
    let store = Arc::new(MemoryStore::with_document(document)?);
    let sync = Arc::new(Synchronizer::new(store.clone(), settings));
    sync.load().await;
    Ok((store, sync))
}

pub fn admin_session() -> Session {
    Session::signed_in(
        User {
            uid: "admin".to_string(),
            email: ADMIN.to_string(),
            id_token: None,
        },
        Some(ADMIN.to_string()),
    )
}

pub fn visitor_session() -> Session {
    Session::signed_in(
        User {
            uid: "visitor".to_string(),
            email: "visitor@example.com".to_string(),
            id_token: None,
        },
        Some(ADMIN.to_string()),
    )
}

/// Image host that answers with a numbered URL and counts calls.
#[derive(Default)]
pub struct CountingHost {
    uploads: AtomicUsize,
}

impl CountingHost {
    pub fn uploads(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageHost for CountingHost {
    async fn upload(&self, _base64_image: &str) -> backends::Result<String> {
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("https://img.example/{n}.png"))
    }
}
