// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Sign-in and the admin session.

use crate::error::{BackendError, Result};
use crate::http;
use async_trait::async_trait;
use diagnostics::*;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub uid: String,
    pub email: String,
    #[serde(skip)]
    pub id_token: Option<String>,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<User>;
    async fn sign_out(&self, user: &User) -> Result<()>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FirebaseConfig {
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://identitytoolkit.googleapis.com/v1".to_string(),
            timeout_secs: http::default_timeout_secs(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignInResponse {
    local_id: String,
    email: String,
    #[serde(default)]
    id_token: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Email/password sign-in against the Identity Toolkit REST API.
pub struct FirebaseIdentity {
    config: FirebaseConfig,
    http: reqwest::Client,
}

impl FirebaseIdentity {
    pub fn new(config: FirebaseConfig) -> Result<Self> {
        let http = http::client(config.timeout_secs)?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        let key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| BackendError::missing("identity", &["api_key"]))?;
        let url = format!(
            "{}/accounts:signInWithPassword",
            self.config.endpoint.trim_end_matches('/')
        );

        let response = self
            .http
            .post(&url)
            .query(&[("key", key)])
            .json(&SignInRequest {
                email,
                password,
                return_secure_token: true,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            warn!(
                "identity: sign-in refused for {email}: {reason}",
                email: email,
                reason: message.as_str()
            );
            return Err(BackendError::Rejected {
                service: "identity",
                message,
            });
        }

        let body: SignInResponse = http::json_body(response).await?;
        info!("identity: signed in {email}", email: body.email.as_str());
        Ok(User {
            uid: body.local_id,
            email: body.email,
            id_token: body.id_token,
        })
    }

    async fn sign_out(&self, user: &User) -> Result<()> {
        // ID tokens are bearer tokens; forgetting them is all sign-out takes.
        debug!("identity: signed out {email}", email: user.email.as_str());
        Ok(())
    }
}

/// In-process accounts keyed by email, for local runs and tests.
#[derive(Debug, Default, Clone)]
pub struct StaticIdentity {
    accounts: HashMap<String, String>,
}

impl StaticIdentity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_account(mut self, email: &str, password: &str) -> Self {
        self.accounts.insert(email.to_string(), password_digest(password));
        self
    }
}

/// Hex SHA-256 of a password.
#[must_use]
pub fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn sign_in(&self, email: &str, password: &str) -> Result<User> {
        match self.accounts.get(email) {
            Some(digest) if *digest == password_digest(password) => Ok(User {
                uid: password_digest(email)[..16].to_string(),
                email: email.to_string(),
                id_token: None,
            }),
            _ => Err(BackendError::Rejected {
                service: "identity",
                message: "INVALID_LOGIN_CREDENTIALS".to_string(),
            }),
        }
    }

    async fn sign_out(&self, _user: &User) -> Result<()> {
        Ok(())
    }
}

/// The signed-in user, if any, and the one email allowed to edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
    admin_email: Option<String>,
}

impl Session {
    #[must_use]
    pub fn new(admin_email: Option<String>) -> Self {
        Self {
            user: None,
            admin_email: admin_email.filter(|e| !e.trim().is_empty()),
        }
    }

    /// A session already signed in as `user`.
    #[must_use]
    pub fn signed_in(user: User, admin_email: Option<String>) -> Self {
        Self {
            user: Some(user),
            ..Self::new(admin_email)
        }
    }

    #[must_use]
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Exact match of the signed-in email against the admin email.
    #[must_use]
    pub fn is_authorized(&self) -> bool {
        match (&self.user, &self.admin_email) {
            (Some(user), Some(admin)) => user.email == *admin,
            _ => false,
        }
    }

    pub async fn login(
        &mut self,
        provider: &dyn IdentityProvider,
        email: &str,
        password: &str,
    ) -> Result<&User> {
        let user = provider.sign_in(email, password).await?;
        if self.admin_email.as_deref() != Some(user.email.as_str()) {
            warn!("session: {email} is not the site admin", email: user.email.as_str());
        }
        Ok(self.user.insert(user))
    }

    pub async fn logout(&mut self, provider: &dyn IdentityProvider) -> Result<()> {
        if let Some(user) = self.user.take() {
            provider.sign_out(&user).await?;
        }
        Ok(())
    }
}
