// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{InboxError, Result};
use crate::lead::{ContactSubmission, Lead, LeadStatus};
use crate::store::LeadStore;
use backends::Session;
use diagnostics::*;
use serde::Serialize;

/// Lead counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LeadSummary {
    pub total: usize,
    pub new: usize,
    pub contacted: usize,
    pub resolved: usize,
}

impl LeadSummary {
    fn tally(leads: &[Lead]) -> Self {
        leads.iter().fold(
            LeadSummary {
                total: leads.len(),
                ..LeadSummary::default()
            },
            |mut summary, lead| {
                match lead.status {
                    LeadStatus::New => summary.new += 1,
                    LeadStatus::Contacted => summary.contacted += 1,
                    LeadStatus::Resolved => summary.resolved += 1,
                }
                summary
            },
        )
    }
}

/// Contact submissions: anyone may submit, only the admin may read or
/// manage them.
pub struct Inbox<S> {
    store: S,
}

impl<S: LeadStore> Inbox<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn authorize(session: &Session) -> Result<()> {
        if session.is_authorized() {
            Ok(())
        } else {
            Err(InboxError::Unauthorized)
        }
    }

    /// Validate and store a submission. Invalid input never reaches the
    /// store.
    pub async fn submit(&self, submission: ContactSubmission) -> Result<Lead> {
        let submission = submission.validated()?;
        let lead = self.store.create(submission).await?;
        info!("inbox: new lead {id}", id: lead.id.as_str());
        Ok(lead)
    }

    pub async fn list(&self, session: &Session) -> Result<Vec<Lead>> {
        Self::authorize(session)?;
        self.store.list().await
    }

    pub async fn set_status(
        &self,
        session: &Session,
        id: &str,
        status: LeadStatus,
    ) -> Result<Lead> {
        Self::authorize(session)?;
        let lead = self.store.set_status(id, status).await?;
        info!(
            "inbox: lead {id} is now {status}",
            id: id,
            status: status.as_str()
        );
        Ok(lead)
    }

    pub async fn delete(&self, session: &Session, id: &str) -> Result<()> {
        Self::authorize(session)?;
        self.store.delete(id).await?;
        info!("inbox: deleted lead {id}", id: id);
        Ok(())
    }

    pub async fn summary(&self, session: &Session) -> Result<LeadSummary> {
        Self::authorize(session)?;
        Ok(LeadSummary::tally(&self.store.list().await?))
    }
}
