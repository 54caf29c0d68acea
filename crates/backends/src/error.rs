// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Error types for the remote collaborators

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Missing {service} configuration: {missing}. Please check environment variables.")]
    Config {
        service: &'static str,
        missing: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    /// Another writer changed the document since its version was read.
    #[error("Version mismatch: {0}")]
    VersionMismatch(String),

    #[error("HTTP {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },

    #[error("{service} rejected the request: {message}")]
    Rejected {
        service: &'static str,
        message: String,
    },

    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),
}

impl BackendError {
    #[must_use]
    pub fn is_version_mismatch(&self) -> bool {
        matches!(self, BackendError::VersionMismatch(_))
    }

    #[must_use]
    pub fn is_config(&self) -> bool {
        matches!(self, BackendError::Config { .. })
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound(_))
    }

    pub(crate) fn missing(service: &'static str, names: &[&str]) -> Self {
        BackendError::Config {
            service,
            missing: names.join(", "),
        }
    }
}

/// Result type for collaborator calls
pub type Result<T> = std::result::Result<T, BackendError>;
