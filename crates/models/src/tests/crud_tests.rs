use serde_json::json;

use super::setup_test_db;
use crate::{asset, change, comment, file, version};

#[tokio::test]
async fn asset_ensure_creates_then_refreshes() {
    let (db, _dir) = setup_test_db().await;

    let created = asset::ensure(&db, "model_Hero", "Hero", "model", "a hero", "character")
        .await
        .expect("create");
    assert_eq!(created.status, "published");
    assert_eq!(created.head_version, 0);

    let refreshed = asset::ensure(&db, "model_Hero", "Hero Mk2", "model", "ignored", "ignored")
        .await
        .expect("refresh");
    assert_eq!(refreshed.name, "Hero Mk2");
    // description/tags are not overwritten on re-publish
    assert_eq!(refreshed.description, "a hero");
    assert_eq!(refreshed.tags, "character");
}

#[tokio::test]
async fn ensure_rejects_empty_id() {
    let (db, _dir) = setup_test_db().await;
    let err = asset::ensure(&db, "  ", "x", "model", "", "").await.unwrap_err();
    assert!(err.to_string().contains("asset id required"));
}

#[tokio::test]
async fn version_numbers_are_monotonic() {
    let (db, _dir) = setup_test_db().await;
    asset::ensure(&db, "rig_Hero", "Hero", "rig", "", "").await.unwrap();

    let v1 = asset::assign_next_version(&db, "rig_Hero").await.unwrap();
    let v2 = asset::assign_next_version(&db, "rig_Hero").await.unwrap();
    assert_eq!((v1, v2), (1, 2));

    version::create(&db, "rig_Hero", v1, json!({})).await.unwrap();
    version::create(&db, "rig_Hero", v2, json!({"joints": 42})).await.unwrap();

    let latest = version::latest(&db, "rig_Hero").await.unwrap().unwrap();
    assert_eq!(latest.version, 2);
    assert_eq!(latest.metadata, json!({"joints": 42}));
}

#[tokio::test]
async fn deleted_version_numbers_are_never_reassigned() {
    let (db, _dir) = setup_test_db().await;
    asset::ensure(&db, "model_Prop", "Prop", "model", "", "").await.unwrap();

    for _ in 0..3 {
        let n = asset::assign_next_version(&db, "model_Prop").await.unwrap();
        version::create(&db, "model_Prop", n, json!({})).await.unwrap();
    }

    // Drop the newest version; the counter must not wind back.
    assert_eq!(version::delete(&db, "model_Prop", 3).await.unwrap(), 1);
    let next = asset::assign_next_version(&db, "model_Prop").await.unwrap();
    assert_eq!(next, 4);
}

#[tokio::test]
async fn version_delete_leaves_siblings_intact() {
    let (db, _dir) = setup_test_db().await;
    asset::ensure(&db, "camera_Shot01", "Shot01", "camera", "", "").await.unwrap();
    for _ in 0..2 {
        let n = asset::assign_next_version(&db, "camera_Shot01").await.unwrap();
        version::create(&db, "camera_Shot01", n, json!({})).await.unwrap();
        file::add(&db, "camera_Shot01", n, &format!("shot_v{n}.abc"), &format!("assets/camera_Shot01/v{n}/shot_v{n}.abc"), "abc", 128)
            .await
            .unwrap();
    }

    version::delete(&db, "camera_Shot01", 1).await.unwrap();
    file::delete_for_version(&db, "camera_Shot01", 1).await.unwrap();

    let versions = version::for_asset(&db, "camera_Shot01").await.unwrap();
    assert_eq!(versions.len(), 1);
    assert_eq!(versions[0].version, 2);

    let files = file::for_asset(&db, "camera_Shot01").await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].version, 2);
}

#[tokio::test]
async fn asset_hard_delete_removes_all_rows() {
    let (db, _dir) = setup_test_db().await;
    asset::ensure(&db, "scene_Set", "Set", "scene", "", "").await.unwrap();
    let n = asset::assign_next_version(&db, "scene_Set").await.unwrap();
    version::create(&db, "scene_Set", n, json!({})).await.unwrap();
    file::add(&db, "scene_Set", n, "set.ma", "assets/scene_Set/v1/set.ma", "ma", 64).await.unwrap();
    comment::add(&db, "scene_Set", "rev", "looks good").await.unwrap();

    file::delete_for_asset(&db, "scene_Set").await.unwrap();
    version::delete_for_asset(&db, "scene_Set").await.unwrap();
    comment::delete_for_asset(&db, "scene_Set").await.unwrap();
    asset::hard_delete(&db, "scene_Set").await.unwrap();

    assert!(asset::get(&db, "scene_Set").await.unwrap().is_none());
    assert!(version::for_asset(&db, "scene_Set").await.unwrap().is_empty());
    assert!(file::for_asset(&db, "scene_Set").await.unwrap().is_empty());
}

#[tokio::test]
async fn list_filters_by_family_and_status() {
    let (db, _dir) = setup_test_db().await;
    asset::ensure(&db, "model_A", "A", "model", "", "").await.unwrap();
    asset::ensure(&db, "model_B", "B", "model", "", "").await.unwrap();
    asset::ensure(&db, "rig_C", "C", "rig", "", "").await.unwrap();
    asset::update(
        &db,
        "model_B",
        asset::UpdateFields { status: Some("review".into()), ..Default::default() },
    )
    .await
    .unwrap();

    let models = asset::list(
        &db,
        &asset::ListFilter { family: Some("model".into()), status: None },
        50,
        0,
    )
    .await
    .unwrap();
    assert_eq!(models.len(), 2);

    let in_review = asset::list(
        &db,
        &asset::ListFilter { family: None, status: Some("review".into()) },
        50,
        0,
    )
    .await
    .unwrap();
    assert_eq!(in_review.len(), 1);
    assert_eq!(in_review[0].id, "model_B");
}

#[tokio::test]
async fn change_feed_is_ordered_and_filterable() {
    let (db, _dir) = setup_test_db().await;
    change::record(&db, "asset_upsert", "model_A", json!({"family": "model"})).await.unwrap();
    let marker = change::record(&db, "version_created", "model_A", json!({"version": 1}))
        .await
        .unwrap();
    change::record(&db, "file_added", "model_A", json!({"filename": "a.fbx"})).await.unwrap();

    let all = change::list_since(&db, None, 100).await.unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].kind, "asset_upsert");

    let after = change::list_since(&db, Some(marker.created_at), 100).await.unwrap();
    assert!(after.iter().all(|c| c.created_at > marker.created_at));
}
