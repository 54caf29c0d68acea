// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use backends::BackendError;
use content::PathError;
use thiserror::Error;

/// Shown when a commit is refused or gives up on a version conflict.
pub const WAIT_FOR_DEPLOY: &str =
    "Please wait until the previous change has finished deploying before making another edit.";

/// Shown for any other failed save.
pub const SAVE_FAILED: &str = "Failed to save changes. Please try again.";

#[derive(Error, Debug)]
pub enum SyncError {
    /// A commit is already in flight; nothing was applied or sent.
    #[error("A previous change is still being saved")]
    Busy,

    /// The store kept reporting a newer version than the one read.
    #[error("Version conflict after {attempts} attempts: {source}")]
    Conflict {
        attempts: usize,
        #[source]
        source: BackendError,
    },

    #[error(transparent)]
    Config(BackendError),

    #[error("Failed to save after {attempts} attempts: {source}")]
    Remote {
        attempts: usize,
        #[source]
        source: BackendError,
    },

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("There are no pending changes")]
    NothingPending,
}

impl SyncError {
    /// Text for the editor.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SyncError::Busy | SyncError::Conflict { .. } => WAIT_FOR_DEPLOY.to_string(),
            SyncError::Remote { .. } => SAVE_FAILED.to_string(),
            SyncError::Config(err) => err.to_string(),
            SyncError::Path(err) => err.to_string(),
            SyncError::NothingPending => "There are no pending changes to publish.".to_string(),
        }
    }

    pub(crate) fn from_backend(source: BackendError, attempts: usize) -> Self {
        if source.is_version_mismatch() {
            SyncError::Conflict { attempts, source }
        } else if source.is_config() {
            SyncError::Config(source)
        } else {
            SyncError::Remote { attempts, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_follow_the_taxonomy() {
        let conflict =
            SyncError::from_backend(BackendError::VersionMismatch("sha".to_string()), 3);
        assert!(matches!(conflict, SyncError::Conflict { attempts: 3, .. }));
        assert_eq!(conflict.user_message(), WAIT_FOR_DEPLOY);
        assert_eq!(SyncError::Busy.user_message(), WAIT_FOR_DEPLOY);

        let remote = SyncError::from_backend(BackendError::Unavailable("down".to_string()), 1);
        assert_eq!(remote.user_message(), SAVE_FAILED);

        let config = SyncError::from_backend(
            BackendError::Config {
                service: "GitHub",
                missing: "token".to_string(),
            },
            1,
        );
        assert_eq!(
            config.user_message(),
            "Missing GitHub configuration: token. Please check environment variables."
        );
    }
}
