// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Lead persistence: the trait plus in-memory and JSON-file bindings.

use crate::error::{InboxError, Result};
use crate::lead::{ContactSubmission, Lead, LeadStatus};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Collection of contact submissions. The store assigns ids, timestamps
/// and the initial `new` status.
#[async_trait]
pub trait LeadStore: Send + Sync {
    async fn create(&self, submission: ContactSubmission) -> Result<Lead>;

    /// Every lead, newest first.
    async fn list(&self) -> Result<Vec<Lead>>;

    async fn set_status(&self, id: &str, status: LeadStatus) -> Result<Lead>;

    async fn delete(&self, id: &str) -> Result<()>;
}

fn new_lead(submission: ContactSubmission) -> Lead {
    Lead {
        id: uuid7::uuid7().to_string(),
        name: submission.name,
        email: submission.email,
        phone: submission.phone,
        message: submission.message,
        created_at: Utc::now(),
        status: LeadStatus::New,
    }
}

/// Newest first; UUIDv7 ids break ties between identical timestamps.
fn newest_first(leads: &mut [Lead]) {
    leads.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

fn restatus(leads: &mut [Lead], id: &str, status: LeadStatus) -> Result<Lead> {
    let lead = leads
        .iter_mut()
        .find(|lead| lead.id == id)
        .ok_or_else(|| InboxError::NotFound(id.to_string()))?;
    lead.status = status;
    Ok(lead.clone())
}

fn remove(leads: &mut Vec<Lead>, id: &str) -> Result<()> {
    let position = leads
        .iter()
        .position(|lead| lead.id == id)
        .ok_or_else(|| InboxError::NotFound(id.to_string()))?;
    leads.remove(position);
    Ok(())
}

#[derive(Default)]
pub struct MemoryLeadStore {
    leads: Mutex<Vec<Lead>>,
}

impl MemoryLeadStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn create(&self, submission: ContactSubmission) -> Result<Lead> {
        let lead = new_lead(submission);
        self.leads.lock().await.push(lead.clone());
        Ok(lead)
    }

    async fn list(&self) -> Result<Vec<Lead>> {
        let mut leads = self.leads.lock().await.clone();
        newest_first(&mut leads);
        Ok(leads)
    }

    async fn set_status(&self, id: &str, status: LeadStatus) -> Result<Lead> {
        restatus(&mut *self.leads.lock().await, id, status)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        remove(&mut *self.leads.lock().await, id)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Collection {
    #[serde(default)]
    leads: Vec<Lead>,
}

/// All leads in one JSON document, replaced atomically on every change.
pub struct FileLeadStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileLeadStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Collection> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Collection::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, collection: &Collection) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, serde_json::to_vec_pretty(collection)?).await?;
        tokio::fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl LeadStore for FileLeadStore {
    async fn create(&self, submission: ContactSubmission) -> Result<Lead> {
        let _guard = self.lock.lock().await;
        let mut collection = self.load().await?;
        let lead = new_lead(submission);
        collection.leads.push(lead.clone());
        self.save(&collection).await?;
        Ok(lead)
    }

    async fn list(&self) -> Result<Vec<Lead>> {
        let _guard = self.lock.lock().await;
        let mut leads = self.load().await?.leads;
        newest_first(&mut leads);
        Ok(leads)
    }

    async fn set_status(&self, id: &str, status: LeadStatus) -> Result<Lead> {
        let _guard = self.lock.lock().await;
        let mut collection = self.load().await?;
        let lead = restatus(&mut collection.leads, id, status)?;
        self.save(&collection).await?;
        Ok(lead)
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut collection = self.load().await?;
        remove(&mut collection.leads, id)?;
        self.save(&collection).await
    }
}
