// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Site configuration, parsed from YAML with environment overrides.

use backends::{
    BackendError, ContentStore, FileStore, FirebaseConfig, GitHubConfig, GitHubStore,
    ImgBbConfig,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Top-level site configuration.
///
/// ```yaml
/// admin_email: "owner@simmonscivil.example"
///
/// content:
///   backend: github        # or "file"
///   path: "public/content.json"
///
/// github:
///   owner: "simmons-civil"
///   repo: "site"
///   branch: "main"
///   path: "public/content.json"
///
/// sync:
///   max_attempts: 3
///   backoff_ms: 2000
///   settle_ms: 5000
///
/// leads:
///   path: "leads.json"
/// ```
///
/// Secrets (`github.token`, `images.api_key`, `identity.api_key`) are read
/// from the environment, see [`SiteConfig::apply_env`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    pub admin_email: Option<String>,
    pub content: ContentConfig,
    pub github: GitHubConfig,
    pub images: ImgBbConfig,
    pub identity: FirebaseConfig,
    pub sync: SyncSettings,
    pub leads: LeadsConfig,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContentBackend {
    #[default]
    Github,
    File,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContentConfig {
    pub backend: ContentBackend,
    /// Document location for the `file` backend.
    pub path: PathBuf,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            backend: ContentBackend::Github,
            path: PathBuf::from("public/content.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LeadsConfig {
    pub path: PathBuf,
}

impl Default for LeadsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("leads.json"),
        }
    }
}

/// Commit timing: attempt budget, delay between attempts, and the pause
/// after a successful write before reloading.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SyncSettings {
    pub max_attempts: usize,
    pub backoff_ms: u64,
    pub settle_ms: u64,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 2000,
            settle_ms: 5000,
        }
    }
}

impl SyncSettings {
    #[must_use]
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }

    #[must_use]
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl SiteConfig {
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse(yaml, "<inline>")
    }

    fn parse(yaml: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: SiteConfig =
            serde_yaml_ng::from_str(yaml).map_err(|source| ConfigError::Parse {
                path: origin.to_string(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Read `path` if given (defaults otherwise), then apply the process
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.display().to_string(),
                    source,
                })?;
                Self::parse(&text, &path.display().to_string())?
            }
            None => SiteConfig::default(),
        };
        let config = config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Overlay `SITE_*` variables looked up through `lookup`. Empty values
    /// are ignored.
    #[must_use]
    pub fn apply_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("SITE_ADMIN_EMAIL") {
            self.admin_email = Some(v);
        }
        if let Some(v) = get("SITE_GITHUB_TOKEN") {
            self.github.token = Some(v);
        }
        if let Some(v) = get("SITE_GITHUB_OWNER") {
            self.github.owner = Some(v);
        }
        if let Some(v) = get("SITE_GITHUB_REPO") {
            self.github.repo = Some(v);
        }
        if let Some(v) = get("SITE_GITHUB_BRANCH") {
            self.github.branch = v;
        }
        if let Some(v) = get("SITE_GITHUB_PATH") {
            self.github.path = v;
        }
        if let Some(v) = get("SITE_IMGBB_API_KEY") {
            self.images.api_key = Some(v);
        }
        if let Some(v) = get("SITE_IDENTITY_API_KEY") {
            self.identity.api_key = Some(v);
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sync.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "sync.max_attempts must be greater than 0".to_string(),
            ));
        }
        if self.content.backend == ContentBackend::File && self.content.path.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid(
                "content.path is required for the file backend".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the configured content store. Missing GitHub credentials are
    /// not an error here; they surface on the first store call.
    pub fn content_store(&self) -> Result<Arc<dyn ContentStore>, ConfigError> {
        Ok(match self.content.backend {
            ContentBackend::Github => Arc::new(GitHubStore::new(self.github.clone())?),
            ContentBackend::File => Arc::new(FileStore::new(&self.content.path)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn empty_yaml_gives_defaults() {
        let config = SiteConfig::from_yaml("{}").expect("parse");
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.sync.backoff(), Duration::from_secs(2));
        assert_eq!(config.sync.settle(), Duration::from_secs(5));
        assert_eq!(config.github.branch, "main");
    }

    #[test]
    fn parses_sections() {
        let yaml = r#"
admin_email: "owner@example.com"
content:
  backend: file
  path: "/srv/site/content.json"
github:
  owner: "simmons"
  repo: "site"
sync:
  max_attempts: 5
  backoff_ms: 10
leads:
  path: "/srv/site/leads.json"
"#;
        let config = SiteConfig::from_yaml(yaml).expect("parse");
        assert_eq!(config.admin_email.as_deref(), Some("owner@example.com"));
        assert_eq!(config.content.backend, ContentBackend::File);
        assert_eq!(config.github.owner.as_deref(), Some("simmons"));
        assert_eq!(config.github.path, "public/content.json");
        assert_eq!(config.sync.max_attempts, 5);
        assert_eq!(config.sync.settle_ms, 5000);
        assert_eq!(config.leads.path, PathBuf::from("/srv/site/leads.json"));
    }

    #[test]
    fn zero_attempts_is_invalid() {
        let err = SiteConfig::from_yaml("sync:\n  max_attempts: 0\n").expect_err("invalid");
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn environment_overrides_yaml() {
        let env: HashMap<&str, &str> = [
            ("SITE_GITHUB_TOKEN", "ghp_secret"),
            ("SITE_GITHUB_REPO", "override"),
            ("SITE_GITHUB_BRANCH", ""),
            ("SITE_ADMIN_EMAIL", "admin@example.com"),
            ("SITE_IMGBB_API_KEY", "img"),
        ]
        .into_iter()
        .collect();
        let config = SiteConfig::from_yaml("github:\n  repo: site\n  branch: prod\n")
            .expect("parse")
            .apply_env(|key| env.get(key).map(ToString::to_string));

        assert_eq!(config.github.token.as_deref(), Some("ghp_secret"));
        assert_eq!(config.github.repo.as_deref(), Some("override"));
        assert_eq!(config.github.branch, "prod");
        assert_eq!(config.admin_email.as_deref(), Some("admin@example.com"));
        assert_eq!(config.images.api_key.as_deref(), Some("img"));
        assert_eq!(config.identity.api_key, None);
    }

    #[test]
    fn secrets_are_not_serialized() {
        let config = SiteConfig::default().apply_env(|key| {
            (key == "SITE_GITHUB_TOKEN").then(|| "ghp_secret".to_string())
        });
        let yaml = serde_yaml_ng::to_string(&config).expect("serialize");
        assert!(!yaml.contains("ghp_secret"));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = SiteConfig::load(Some(&dir.path().join("site.yaml"))).expect_err("missing");
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
