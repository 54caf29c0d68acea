// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use backends::{ContentStore, GitHubConfig, GitHubStore, MemoryStore, ScriptedFailure};
use cms::{LoadOutcome, SAVE_FAILED, SyncError, Synchronizer, WAIT_FOR_DEPLOY};
use content::{
    ContentDocument, FieldPath, GalleryDraft, GalleryImage, ServiceDraft, ServiceItem,
    ServicePatch,
};
use std::sync::Arc;
use std::time::Duration;

mod support;
use support::{admin_session, instant, loaded, production, visitor_session};

fn ids<T>(items: &[T], id: impl Fn(&T) -> u64) -> Vec<u64> {
    items.iter().map(id).collect()
}

#[tokio::test]
async fn every_field_round_trips_through_the_store() -> Result<()> {
    let original = ContentDocument::fallback();
    let (store, sync) = loaded(original.clone(), instant()).await?;

    for (n, path) in FieldPath::all(&original).into_iter().enumerate() {
        let value = format!("value {n} for {path}");
        let before = ContentDocument::clone(&*sync.committed().await);
        let mut expected = before.clone();
        content::assign(&mut expected, &path, value.as_str())?;

        let receipt = sync.update(&path, value.as_str()).await?;
        assert_eq!(receipt.message, format!("Update {path} via admin panel"));
        assert_eq!(receipt.attempts, 1);

        assert!(matches!(sync.load().await, LoadOutcome::Remote { .. }));
        let reloaded = sync.committed().await;
        assert_eq!(content::read(&reloaded, &path), value);
        assert_eq!(*reloaded, expected);
    }
    assert_eq!(store.document().await.as_ref(), Some(&*sync.committed().await));
    Ok(())
}

#[tokio::test]
async fn update_dotted_names_the_field_in_the_commit() -> Result<()> {
    let (store, sync) = loaded(ContentDocument::fallback(), instant()).await?;

    sync.update_dotted("services", "items.0.title", "Site Grading").await?;
    sync.update_dotted("hero", "backgroundImage", "https://img.example/bg.jpg").await?;

    let doc = sync.committed().await;
    assert_eq!(doc.services.items[0].title, "Site Grading");
    assert_eq!(doc.hero.background_image, "https://img.example/bg.jpg");
    assert_eq!(
        store.messages().await,
        vec![
            "Update services.items.0.title via admin panel".to_string(),
            "Update hero.backgroundImage via admin panel".to_string(),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn added_service_gets_max_id_plus_one() -> Result<()> {
    let (store, sync) = loaded(ContentDocument::fallback(), instant()).await?;

    sync.delete_service(3).await?;
    let doc = sync.committed().await;
    assert_eq!(ids(&doc.services.items, |s| s.id), vec![1, 2, 4, 5, 6]);

    sync.add_service(ServiceDraft {
        title: "Demolition".to_string(),
        description: "Structure removal".to_string(),
    })
    .await?;
    let doc = sync.committed().await;
    assert_eq!(ids(&doc.services.items, |s| s.id), vec![1, 2, 4, 5, 6, 7]);
    assert_eq!(
        store.messages().await,
        vec![
            "Delete service: Concrete Work via admin panel".to_string(),
            "Add service: Demolition via admin panel".to_string(),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn add_is_refused_when_ids_are_exhausted() -> Result<()> {
    let mut doc = ContentDocument::fallback();
    doc.gallery.images[2].id = u64::MAX;
    let (store, sync) = loaded(doc.clone(), instant()).await?;

    let err = sync
        .add_gallery_image(GalleryDraft {
            url: "https://img.example/new.png".to_string(),
            caption: "New".to_string(),
        })
        .await
        .expect_err("no id left");
    assert!(matches!(err, SyncError::Path(_)));
    assert_eq!(store.write_count(), 0);
    assert!(!sync.has_pending());
    assert_eq!(*sync.committed().await, doc);
    Ok(())
}

#[tokio::test]
async fn gallery_delete_then_add() -> Result<()> {
    let mut doc = ContentDocument::default();
    doc.gallery.images = vec![
        GalleryImage {
            id: 1,
            url: "https://img.example/1.jpg".to_string(),
            caption: "First".to_string(),
        },
        GalleryImage {
            id: 2,
            url: "https://img.example/2.jpg".to_string(),
            caption: "Second".to_string(),
        },
    ];
    let (_store, sync) = loaded(doc, instant()).await?;

    sync.delete_gallery_image(1).await?;
    sync.add_gallery_image(GalleryDraft {
        url: "x".to_string(),
        caption: "y".to_string(),
    })
    .await?;

    let doc = sync.committed().await;
    let images = &doc.gallery.images;
    assert_eq!(images.len(), 2);
    assert_eq!(images[0].id, 2);
    assert_eq!(images[0].caption, "Second");
    assert_eq!(
        images[1],
        GalleryImage {
            id: 3,
            url: "x".to_string(),
            caption: "y".to_string(),
        }
    );
    Ok(())
}

#[tokio::test]
async fn update_item_without_match_still_commits() -> Result<()> {
    let (store, sync) = loaded(ContentDocument::fallback(), instant()).await?;

    let receipt = sync
        .update_item::<ServiceItem>(
            99,
            ServicePatch {
                description: Some("ignored".to_string()),
                ..ServicePatch::default()
            },
        )
        .await?;
    assert_eq!(receipt.message, "Update service: 99 via admin panel");
    assert_eq!(store.write_count(), 1);
    assert_eq!(sync.committed().await.services, ContentDocument::fallback().services);

    sync.update_service(
        2,
        ServicePatch {
            title: Some("Asphalt Paving".to_string()),
            description: None,
        },
    )
    .await?;
    let doc = sync.committed().await;
    assert_eq!(doc.services.items[1].title, "Asphalt Paving");
    assert_eq!(
        doc.services.items[1].description,
        "High-quality asphalt and concrete paving solutions"
    );
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn two_mismatches_then_success_takes_three_writes() -> Result<()> {
    let (store, sync) = loaded(ContentDocument::fallback(), production()).await?;
    store.fail_next_writes(2, ScriptedFailure::VersionMismatch).await;

    let start = tokio::time::Instant::now();
    let receipt = sync.update_dotted("hero", "title", "Built Right").await?;

    assert_eq!(receipt.attempts, 3);
    assert_eq!(store.write_count(), 3);
    // Every attempt re-reads the version first.
    assert_eq!(store.version_count(), 3);
    // Two backoffs and the settle delay.
    assert!(start.elapsed() >= Duration::from_millis(2 * 2000 + 5000));
    assert_eq!(sync.committed().await.hero.title, "Built Right");
    assert!(!sync.has_pending());
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn three_mismatches_is_a_conflict() -> Result<()> {
    let (store, sync) = loaded(ContentDocument::fallback(), production()).await?;
    store.fail_next_writes(3, ScriptedFailure::VersionMismatch).await;

    let err = sync
        .update_dotted("hero", "title", "Built Right")
        .await
        .expect_err("conflict");
    assert!(matches!(err, SyncError::Conflict { attempts: 3, .. }));
    assert_eq!(err.user_message(), WAIT_FOR_DEPLOY);
    assert_eq!(store.write_count(), 3);

    // The edit stays visible as pending; the store is untouched.
    let snapshot = sync.snapshot();
    assert!(snapshot.pending);
    assert!(!snapshot.saving);
    assert_eq!(snapshot.document.hero.title, "Built Right");
    assert_eq!(
        store.document().await.map(|d| d.hero.title),
        Some(ContentDocument::fallback().hero.title)
    );

    let receipt = sync.publish_pending().await?;
    assert_eq!(receipt.message, "Publish pending changes via admin panel");
    assert!(!sync.has_pending());
    assert_eq!(store.document().await.map(|d| d.hero.title), Some("Built Right".to_string()));
    Ok(())
}

#[tokio::test]
async fn other_failures_are_not_retried() -> Result<()> {
    let (store, sync) = loaded(ContentDocument::fallback(), instant()).await?;
    store.fail_next_writes(1, ScriptedFailure::Unavailable).await;

    let err = sync
        .update_dotted("contact", "phone", "555-0100")
        .await
        .expect_err("outage");
    assert!(matches!(err, SyncError::Remote { attempts: 1, .. }));
    assert_eq!(err.user_message(), SAVE_FAILED);
    assert_eq!(store.write_count(), 1);
    assert!(sync.has_pending());

    assert!(sync.discard_pending().await?);
    assert!(!sync.has_pending());
    assert_eq!(
        sync.snapshot().document.contact.phone,
        ContentDocument::fallback().contact.phone
    );
    assert!(!sync.discard_pending().await?);
    assert!(matches!(
        sync.publish_pending().await,
        Err(SyncError::NothingPending)
    ));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn commit_while_saving_is_refused_without_store_calls() -> Result<()> {
    let (store, sync) = loaded(ContentDocument::fallback(), production()).await?;
    let mut snapshots = sync.subscribe();

    let first = {
        let sync = sync.clone();
        tokio::spawn(async move { sync.update_dotted("hero", "title", "First").await })
    };
    snapshots.wait_for(|s| s.saving).await?;

    let counts = (store.read_count(), store.version_count(), store.write_count());
    let err = sync
        .commit(ContentDocument::default(), "second")
        .await
        .expect_err("busy");
    assert!(matches!(err, SyncError::Busy));
    assert_eq!(err.user_message(), WAIT_FOR_DEPLOY);

    let err = sync
        .update_dotted("hero", "subtitle", "Second")
        .await
        .expect_err("busy");
    assert!(matches!(err, SyncError::Busy));
    assert!(matches!(sync.discard_pending().await, Err(SyncError::Busy)));
    assert_eq!(
        (store.read_count(), store.version_count(), store.write_count()),
        counts
    );

    let receipt = first.await??;
    assert_eq!(receipt.attempts, 1);
    let doc = sync.committed().await;
    assert_eq!(doc.hero.title, "First");
    assert_eq!(doc.hero.subtitle, ContentDocument::fallback().hero.subtitle);
    assert!(!sync.snapshot().saving);
    Ok(())
}

#[tokio::test]
async fn load_falls_back_when_store_is_empty() -> Result<()> {
    let sync = Synchronizer::new(Arc::new(MemoryStore::new()), instant());
    assert!(sync.snapshot().loading);

    let outcome = sync.load().await;
    assert!(matches!(outcome, LoadOutcome::Fallback { .. }));
    let snapshot = sync.snapshot();
    assert!(!snapshot.loading);
    assert_eq!(*snapshot.document, ContentDocument::fallback());
    assert_eq!(sync.version().await, None);
    Ok(())
}

#[tokio::test]
async fn missing_github_settings_surface_on_commit() -> Result<()> {
    let store: Arc<dyn ContentStore> = Arc::new(GitHubStore::new(GitHubConfig::default())?);
    let sync = Synchronizer::new(store, instant());

    assert!(matches!(sync.load().await, LoadOutcome::Fallback { .. }));
    let err = sync
        .update_dotted("navbar", "phone", "555-0100")
        .await
        .expect_err("unconfigured");
    assert!(matches!(err, SyncError::Config(_)));
    assert_eq!(
        err.user_message(),
        "Missing GitHub configuration: token, owner, repo. Please check environment variables."
    );
    Ok(())
}

#[tokio::test]
async fn edit_mode_requires_the_admin() -> Result<()> {
    let (_store, sync) = loaded(ContentDocument::fallback(), instant()).await?;

    assert!(!sync.toggle_edit_mode(&visitor_session()).await);
    assert!(!sync.snapshot().edit_mode);

    assert!(sync.toggle_edit_mode(&admin_session()).await);
    assert!(sync.snapshot().edit_mode);
    assert!(sync.toggle_edit_mode(&visitor_session()).await);
    assert!(!sync.toggle_edit_mode(&admin_session()).await);
    Ok(())
}

#[tokio::test]
async fn subscribers_see_pending_then_committed() -> Result<()> {
    let (_store, sync) = loaded(ContentDocument::fallback(), instant()).await?;
    let mut snapshots = sync.subscribe();
    snapshots.borrow_and_update();

    sync.update_dotted("about", "title", "Who We Are").await?;

    assert!(snapshots.has_changed()?);
    let latest = snapshots.borrow_and_update().clone();
    assert!(!latest.pending);
    assert!(!latest.saving);
    assert_eq!(latest.read_dotted("about", "title"), "Who We Are");
    assert_eq!(latest.read_dotted("about", "nonsense"), "");
    Ok(())
}
