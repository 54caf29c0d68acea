// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Image hosting: local validation and the ImgBB upload client.

use crate::error::{BackendError, Result};
use crate::http;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use diagnostics::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest file the image host accepts (32 MiB).
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// An image picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    pub async fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Ok(Self { name, bytes })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Validate `bytes` for upload and return them base64 encoded.
///
/// Runs before any network call: empty and oversized files never leave the
/// process.
pub fn encode_upload(bytes: &[u8]) -> Result<String> {
    if bytes.is_empty() {
        return Err(BackendError::InvalidImage("Please select an image file".to_string()));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(BackendError::InvalidImage(
            "Image size must be less than 32MB".to_string(),
        ));
    }
    Ok(STANDARD.encode(bytes))
}

/// Third-party image host returning a public URL for an uploaded image.
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, base64_image: &str) -> Result<String>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImgBbConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for ImgBbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://api.imgbb.com/1/upload".to_string(),
            timeout_secs: 120,
        }
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    data: Option<UploadData>,
}

#[derive(Deserialize)]
struct UploadData {
    url: String,
}

pub struct ImgBb {
    config: ImgBbConfig,
    http: reqwest::Client,
}

impl ImgBb {
    pub fn new(config: ImgBbConfig) -> Result<Self> {
        let http = http::client(config.timeout_secs)?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl ImageHost for ImgBb {
    async fn upload(&self, base64_image: &str) -> Result<String> {
        let key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| BackendError::missing("image host", &["api_key"]))?;

        debug!("imgbb: uploading {size} base64 bytes", size: base64_image.len());
        let response = self
            .http
            .post(&self.config.endpoint)
            .query(&[("key", key)])
            .form(&[("image", base64_image)])
            .send()
            .await?;
        let response = http::expect_success(response).await?;
        let body: UploadResponse = http::json_body(response).await?;
        match body {
            UploadResponse {
                success: true,
                data: Some(data),
            } => {
                info!("imgbb: uploaded {url}", url: data.url.as_str());
                Ok(data.url)
            }
            _ => Err(BackendError::Rejected {
                service: "ImgBB",
                message: "Failed to upload image to ImgBB".to_string(),
            }),
        }
    }
}
