// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Subcommand;
use content::{GalleryDraft, GalleryPatch, ServiceDraft, ServicePatch};

use crate::commands::image::{CheckedImage, ImageSource};
use crate::common::{Credentials, Site, report_commit};

/// Caption given to gallery images added without one.
pub const DEFAULT_CAPTION: &str = "Project Photo";

#[derive(Debug, Clone, Subcommand)]
pub enum ServiceAction {
    /// Append a service; it gets the next free id
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Remove the service with this id
    Remove { id: u64 },
    /// Change the title and/or description of a service
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum GalleryAction {
    /// Append an image by URL or by uploading a local file
    Add {
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        url: Option<String>,
        /// Local image to upload to the image host
        #[arg(long)]
        file: Option<PathBuf>,
        /// Defaults to "Project Photo"
        #[arg(long)]
        caption: Option<String>,
    },
    /// Remove the image with this id
    Remove { id: u64 },
    /// Change the URL and/or caption of an image
    Update {
        id: u64,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        caption: Option<String>,
    },
}

pub async fn service_command(
    site: &Site,
    credentials: &Credentials,
    action: ServiceAction,
    out: &mut impl Write,
) -> Result<()> {
    if let ServiceAction::Update {
        title: None,
        description: None,
        ..
    } = action
    {
        bail!("Nothing to update: pass --title and/or --description");
    }
    let sync = site.editor(credentials).await?;
    let result = match action {
        ServiceAction::Add { title, description } => {
            sync.add_service(ServiceDraft { title, description }).await
        }
        ServiceAction::Remove { id } => sync.delete_service(id).await,
        ServiceAction::Update {
            id,
            title,
            description,
        } => sync.update_service(id, ServicePatch { title, description }).await,
    };
    report_commit(result, out)
}

pub async fn gallery_command(
    site: &Site,
    credentials: &Credentials,
    action: GalleryAction,
    out: &mut impl Write,
) -> Result<()> {
    match action {
        GalleryAction::Add { url, file, caption } => {
            let source = match (url, file) {
                (Some(url), _) => ImageSource::Url(url),
                (None, Some(file)) => ImageSource::File(file),
                (None, None) => bail!("Pass --url or --file"),
            };
            // Local checks run before any network call.
            let image = CheckedImage::check(source).await?;
            let caption = caption
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .unwrap_or_else(|| DEFAULT_CAPTION.to_string());

            let sync = site.editor(credentials).await?;
            let url = image.into_url(site.images()).await?;
            report_commit(sync.add_gallery_image(GalleryDraft { url, caption }).await, out)
        }
        GalleryAction::Update {
            url: None,
            caption: None,
            ..
        } => bail!("Nothing to update: pass --url and/or --caption"),
        GalleryAction::Remove { id } => {
            let sync = site.editor(credentials).await?;
            report_commit(sync.delete_gallery_image(id).await, out)
        }
        GalleryAction::Update { id, url, caption } => {
            let sync = site.editor(credentials).await?;
            report_commit(
                sync.update_gallery_image(id, GalleryPatch { url, caption })
                    .await,
                out,
            )
        }
    }
}
