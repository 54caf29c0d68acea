// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use backends::{FirebaseIdentity, IdentityProvider, ImageHost, ImgBb, Session};
use cms::{LoadOutcome, Receipt, SiteConfig, SyncError, Synchronizer};
use diagnostics::*;
use inbox::{FileLeadStore, Inbox};

/// Admin sign-in details gathered from flags and the environment.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    /// Falls back to the configured admin email.
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Configuration plus the remote collaborators every command draws on.
pub struct Site {
    pub config: SiteConfig,
    identity: Arc<dyn IdentityProvider>,
    images: Arc<dyn ImageHost>,
}

impl Site {
    /// Load configuration from `path` (or defaults plus environment) and
    /// bind the HTTP collaborators.
    pub fn open(path: Option<PathBuf>) -> Result<Self> {
        let config = SiteConfig::load(path.as_deref()).context("Failed to load site configuration")?;
        let identity = FirebaseIdentity::new(config.identity.clone())
            .context("Failed to set up the identity client")?;
        let images = ImgBb::new(config.images.clone()).context("Failed to set up the image host")?;
        Ok(Self::with_collaborators(config, Arc::new(identity), Arc::new(images)))
    }

    pub fn with_collaborators(
        config: SiteConfig,
        identity: Arc<dyn IdentityProvider>,
        images: Arc<dyn ImageHost>,
    ) -> Self {
        Self {
            config,
            identity,
            images,
        }
    }

    pub fn images(&self) -> &dyn ImageHost {
        self.images.as_ref()
    }

    /// A synchronizer over the configured store, already loaded.
    pub async fn synchronizer(&self) -> Result<(Synchronizer, LoadOutcome)> {
        let store = self
            .config
            .content_store()
            .context("Failed to open the content store")?;
        let sync = Synchronizer::new(store, self.config.sync);
        let outcome = sync.load().await;
        Ok((sync, outcome))
    }

    /// Sign in and confirm the account is the site admin.
    pub async fn admin_session(&self, credentials: &Credentials) -> Result<Session> {
        let email = credentials
            .email
            .clone()
            .or_else(|| self.config.admin_email.clone())
            .ok_or_else(|| anyhow!("No admin email: pass --email or set SITE_ADMIN_EMAIL"))?;
        let password = credentials
            .password
            .as_deref()
            .ok_or_else(|| anyhow!("No password: pass --password or set SITE_ADMIN_PASSWORD"))?;

        let mut session = Session::new(self.config.admin_email.clone());
        session
            .login(self.identity.as_ref(), &email, password)
            .await
            .with_context(|| format!("Failed to sign in as {email}"))?;
        if !session.is_authorized() {
            bail!("{email} is not the site admin");
        }
        Ok(session)
    }

    /// A loaded synchronizer in edit mode, for commands that change content.
    ///
    /// Refuses to edit on top of the built-in document: a commit would
    /// overwrite the whole remote file with it.
    pub async fn editor(&self, credentials: &Credentials) -> Result<Synchronizer> {
        let session = self.admin_session(credentials).await?;
        let (sync, outcome) = self.synchronizer().await?;
        if let LoadOutcome::Fallback { reason } = outcome {
            bail!("Content store {} is unreadable: {reason}", sync.store_name());
        }
        if !sync.toggle_edit_mode(&session).await {
            bail!("Edit mode could not be enabled");
        }
        Ok(sync)
    }

    pub fn inbox(&self) -> Inbox<FileLeadStore> {
        Inbox::new(FileLeadStore::new(&self.config.leads.path))
    }
}

/// Report a commit, or turn its failure into the message an editor sees.
pub fn report_commit(
    result: std::result::Result<Receipt, SyncError>,
    out: &mut impl Write,
) -> Result<()> {
    match result {
        Ok(receipt) => {
            let version = receipt
                .version
                .as_ref()
                .map_or_else(|| "unknown".to_string(), ToString::to_string);
            writeln!(
                out,
                "{} (version {version}, {} attempt{})",
                receipt.message,
                receipt.attempts,
                if receipt.attempts == 1 { "" } else { "s" }
            )?;
            Ok(())
        }
        Err(err) => {
            let shown = err.user_message();
            let reason = err.to_string();
            debug!("commit failed: {reason}", reason: reason.as_str());
            Err(anyhow::Error::new(err).context(shown))
        }
    }
}
