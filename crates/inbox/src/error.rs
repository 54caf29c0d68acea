// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InboxError {
    /// The submission failed validation; nothing was stored.
    #[error("{0}")]
    Invalid(String),

    #[error("Only the site admin can manage leads")]
    Unauthorized,

    #[error("No lead with id {0}")]
    NotFound(String),

    #[error("Unknown lead status '{0}'")]
    UnknownStatus(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InboxError>;
