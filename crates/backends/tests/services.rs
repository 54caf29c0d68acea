// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Image host and identity bindings against the mock server.

use anyhow::Result;
use backends::{
    BackendError, FirebaseConfig, FirebaseIdentity, IdentityProvider, ImageHost, ImgBb,
    ImgBbConfig, Session, encode_upload,
};

use mock_server::{IDENTITY_KEY, IMGBB_KEY, MockSite};

fn imgbb(mock: &MockSite, key: &str) -> Result<ImgBb> {
    Ok(ImgBb::new(ImgBbConfig {
        api_key: Some(key.to_string()),
        endpoint: format!("{}/1/upload", mock.base_url()),
        ..ImgBbConfig::default()
    })?)
}

fn identity(mock: &MockSite) -> Result<FirebaseIdentity> {
    Ok(FirebaseIdentity::new(FirebaseConfig {
        api_key: Some(IDENTITY_KEY.to_string()),
        endpoint: format!("{}/v1", mock.base_url()),
        ..FirebaseConfig::default()
    })?)
}

#[tokio::test]
async fn upload_returns_hosted_url() -> Result<()> {
    let mut mock = MockSite::start().await?;
    let host = imgbb(&mock, IMGBB_KEY)?;

    let payload = encode_upload(b"\x89PNG fake image bytes")?;
    let url = host.upload(&payload).await?;
    assert_eq!(url, "https://i.ibb.co/mock/1.png");
    assert_eq!(mock.uploads().await, 1);

    mock.stop().await;
    Ok(())
}

#[tokio::test]
async fn upload_with_bad_key_fails() -> Result<()> {
    let mut mock = MockSite::start().await?;
    let host = imgbb(&mock, "nope")?;

    let err = host.upload("cG5n").await.expect_err("bad key");
    assert!(matches!(err, BackendError::Status { status: 400, .. }));

    mock.stop().await;
    Ok(())
}

#[tokio::test]
async fn unsuccessful_upload_is_rejected() -> Result<()> {
    let mut mock = MockSite::start().await?;
    let host = imgbb(&mock, IMGBB_KEY)?;

    let err = host.upload("not base64!").await.expect_err("success=false");
    assert_eq!(
        err.to_string(),
        "ImgBB rejected the request: Failed to upload image to ImgBB"
    );

    mock.stop().await;
    Ok(())
}

#[tokio::test]
async fn oversized_upload_never_reaches_the_host() -> Result<()> {
    let mut mock = MockSite::start().await?;

    let bytes = vec![0u8; 33 * 1024 * 1024];
    let err = encode_upload(&bytes).expect_err("too large");
    assert!(matches!(err, BackendError::InvalidImage(_)));
    assert_eq!(mock.uploads().await, 0);

    mock.stop().await;
    Ok(())
}

#[tokio::test]
async fn admin_signs_in_through_identity_toolkit() -> Result<()> {
    let mut mock = MockSite::start().await?;
    mock.add_account("admin@example.com", "s3cret").await;
    let provider = identity(&mock)?;

    let mut session = Session::new(Some("admin@example.com".to_string()));
    let user = session.login(&provider, "admin@example.com", "s3cret").await?;
    assert_eq!(user.uid, "uid-admin@example.com");
    assert_eq!(user.id_token.as_deref(), Some("id-token"));
    assert!(session.is_authorized());

    session.logout(&provider).await?;
    assert!(!session.is_authorized());

    mock.stop().await;
    Ok(())
}

#[tokio::test]
async fn wrong_password_carries_provider_message() -> Result<()> {
    let mut mock = MockSite::start().await?;
    mock.add_account("admin@example.com", "s3cret").await;
    let provider = identity(&mock)?;

    let err = provider
        .sign_in("admin@example.com", "guess")
        .await
        .expect_err("wrong password");
    match err {
        BackendError::Rejected { service, message } => {
            assert_eq!(service, "identity");
            assert_eq!(message, "INVALID_LOGIN_CREDENTIALS");
        }
        other => panic!("unexpected error: {other}"),
    }

    mock.stop().await;
    Ok(())
}

#[tokio::test]
async fn signed_in_non_admin_is_not_authorized() -> Result<()> {
    let mut mock = MockSite::start().await?;
    mock.add_account("visitor@example.com", "pw").await;
    let provider = identity(&mock)?;

    let mut session = Session::new(Some("admin@example.com".to_string()));
    session.login(&provider, "visitor@example.com", "pw").await?;
    assert!(session.user().is_some());
    assert!(!session.is_authorized());

    mock.stop().await;
    Ok(())
}
