// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;

use anyhow::{Context, Result};
use cms::LoadOutcome;
use content::FieldPath;

use crate::common::{Credentials, Site, report_commit};

/// Print the working document as JSON.
pub async fn show_command(site: &Site, out: &mut impl Write) -> Result<()> {
    let (sync, outcome) = site.synchronizer().await?;
    if let LoadOutcome::Fallback { reason } = &outcome {
        diagnostics::warn!("showing built-in content: {reason}", reason: reason.as_str());
    }
    let json = sync
        .snapshot()
        .document
        .to_pretty_json()
        .context("Failed to serialize content")?;
    writeln!(out, "{json}")?;
    Ok(())
}

/// One `path<TAB>value` line per editable string.
pub async fn fields_command(site: &Site, out: &mut impl Write) -> Result<()> {
    let (sync, _) = site.synchronizer().await?;
    let snapshot = sync.snapshot();
    for path in FieldPath::all(&snapshot.document) {
        writeln!(out, "{path}\t{}", snapshot.read(&path))?;
    }
    Ok(())
}

pub async fn get_command(site: &Site, field: &str, out: &mut impl Write) -> Result<()> {
    let path = FieldPath::parse_dotted(field)?;
    let (sync, _) = site.synchronizer().await?;
    writeln!(out, "{}", sync.snapshot().read(&path))?;
    Ok(())
}

pub async fn set_command(
    site: &Site,
    credentials: &Credentials,
    field: &str,
    value: &str,
    out: &mut impl Write,
) -> Result<()> {
    let path = FieldPath::parse_dotted(field)?;
    let sync = site.editor(credentials).await?;
    report_commit(sync.update(&path, value).await, out)
}
