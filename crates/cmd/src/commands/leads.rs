// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

use anyhow::Result;
use inbox::{ContactSubmission, LeadStatus};

use crate::common::{Credentials, Site};

pub async fn leads_list_command(
    site: &Site,
    credentials: &Credentials,
    status: Option<LeadStatus>,
    out: &mut impl Write,
) -> Result<()> {
    let session = site.admin_session(credentials).await?;
    let leads = site.inbox().list(&session).await?;
    for lead in leads
        .iter()
        .filter(|lead| status.is_none_or(|s| lead.status == s))
    {
        writeln!(
            out,
            "{}\t{}\t{:<9}\t{} <{}>\t{}\t{}",
            lead.id,
            lead.created_at.format("%Y-%m-%d %H:%M"),
            lead.status.as_str(),
            lead.name,
            lead.email,
            lead.phone.as_deref().unwrap_or("-"),
            lead.message.replace('\n', " ")
        )?;
    }
    Ok(())
}

pub async fn leads_summary_command(
    site: &Site,
    credentials: &Credentials,
    out: &mut impl Write,
) -> Result<()> {
    let session = site.admin_session(credentials).await?;
    let summary = site.inbox().summary(&session).await?;
    writeln!(
        out,
        "{} leads: {} new, {} contacted, {} resolved",
        summary.total, summary.new, summary.contacted, summary.resolved
    )?;
    Ok(())
}

pub async fn leads_status_command(
    site: &Site,
    credentials: &Credentials,
    id: &str,
    status: LeadStatus,
    out: &mut impl Write,
) -> Result<()> {
    let session = site.admin_session(credentials).await?;
    let lead = site.inbox().set_status(&session, id, status).await?;
    writeln!(out, "{} is now {}", lead.id, lead.status)?;
    Ok(())
}

pub async fn leads_delete_command(
    site: &Site,
    credentials: &Credentials,
    id: &str,
    out: &mut impl Write,
) -> Result<()> {
    let session = site.admin_session(credentials).await?;
    site.inbox().delete(&session, id).await?;
    writeln!(out, "Deleted {id}")?;
    Ok(())
}

/// Record a contact-form submission. Needs no sign-in.
pub async fn leads_submit_command(
    site: &Site,
    submission: ContactSubmission,
    out: &mut impl Write,
) -> Result<()> {
    let lead = site.inbox().submit(submission).await?;
    writeln!(out, "Thanks! Your message was received ({})", lead.id)?;
    Ok(())
}
