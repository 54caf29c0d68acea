// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use backends::{BackendError, ImageFile, ImageHost, encode_upload};
use cms::{EditableField, FieldKind, ImageMethod};
use content::FieldPath;
use content::address::{AboutField, GalleryField, GalleryImageField, HeroField};

use crate::common::{Credentials, Site, report_commit};

/// Where a new image comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Url(String),
    File(PathBuf),
}

/// An image source that passed the local checks: a non-empty URL, or a
/// file already encoded for the image host.
pub(crate) enum CheckedImage {
    Url(String),
    Encoded(String),
}

impl CheckedImage {
    /// Validate without touching the network.
    pub(crate) async fn check(source: ImageSource) -> Result<Self> {
        match source {
            ImageSource::Url(url) => {
                let url = url.trim();
                if url.is_empty() {
                    bail!("Please enter an image URL");
                }
                Ok(CheckedImage::Url(url.to_string()))
            }
            ImageSource::File(path) => {
                let file = ImageFile::from_path(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let payload = encode_upload(&file.bytes).map_err(|err| match err {
                    BackendError::InvalidImage(message) => anyhow!(message),
                    other => anyhow::Error::new(other),
                })?;
                Ok(CheckedImage::Encoded(payload))
            }
        }
    }

    /// The URL to store, uploading first when needed.
    pub(crate) async fn into_url(self, host: &dyn ImageHost) -> Result<String> {
        match self {
            CheckedImage::Url(url) => Ok(url),
            CheckedImage::Encoded(payload) => host
                .upload(&payload)
                .await
                .context("Failed to upload image. Please try again."),
        }
    }
}

/// Which kind of image `path` holds, if it holds one at all.
fn image_kind(path: &FieldPath) -> Option<FieldKind> {
    match path {
        FieldPath::Hero(HeroField::BackgroundImage) => Some(FieldKind::BackgroundImage),
        FieldPath::About(AboutField::Image)
        | FieldPath::Gallery(GalleryField::Image(_, GalleryImageField::Url)) => {
            Some(FieldKind::Image)
        }
        _ => None,
    }
}

/// Replace an image field, uploading a local file to the image host first
/// when one is given.
pub async fn image_command(
    site: &Site,
    credentials: &Credentials,
    field: &str,
    source: ImageSource,
    out: &mut impl Write,
) -> Result<()> {
    let path = FieldPath::parse_dotted(field)?;
    let kind = image_kind(&path).ok_or_else(|| anyhow!("{path} is not an image field"))?;

    let sync = site.editor(credentials).await?;
    let mut editable = EditableField::new(path, kind);
    if !editable.open(&sync.snapshot()) {
        return Err(anyhow!("{path} cannot be edited right now"));
    }
    match source {
        ImageSource::Url(url) => {
            editable.select_method(ImageMethod::Url);
            editable.set_draft(url);
        }
        ImageSource::File(file) => {
            let image = ImageFile::from_path(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            editable.attach_file(image);
        }
    }

    match editable.save(&sync, site.images()).await {
        Ok(receipt) => report_commit(Ok(receipt), out),
        Err(err) => {
            let shown = err.user_message();
            Err(anyhow::Error::new(err).context(shown))
        }
    }
}
