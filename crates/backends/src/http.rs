// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use crate::error::{BackendError, Result};
use std::time::Duration;

pub(crate) const USER_AGENT: &str = concat!("site-cms/", env!("CARGO_PKG_VERSION"));
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub(crate) fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

pub(crate) fn client(timeout_secs: u64) -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?)
}

/// Turn a non-success response into `BackendError::Status`, keeping the
/// body text for the error message.
pub(crate) async fn expect_success(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let url = response.url().to_string();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(BackendError::Status { status, url, body })
}

/// Read the whole body and parse it as JSON.
pub(crate) async fn json_body<T>(response: reqwest::Response) -> Result<T>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}
