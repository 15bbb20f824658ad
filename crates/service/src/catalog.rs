//! Catalog operations: publish, query, mutate and delete versioned assets.
//!
//! Version numbers are assigned here, from the asset's head counter; callers
//! never pick them. Every mutation appends to the change feed.

use std::path::PathBuf;

use chrono::{DateTime, FixedOffset};
use sea_orm::DatabaseConnection;
use serde_json::json;
use tracing::{info, warn};

use common::families::Family;
use common::types::{
    AssetDetail, AssetList, AssetSummary, ChangeItem, ChangeList, FileInfo, PublishReceipt,
    PublishRequest, UpdateAssetRequest, UploadReceipt, VersionInfo,
};
use models::{asset, change, comment, file, version};

use crate::errors::ServiceError;
use crate::package::{self, PackageEntry};
use crate::pagination::Pagination;
use crate::storage::{self, StorageRoot};

/// Upper bound for one change-feed page.
pub const CHANGES_LIMIT: u64 = 100;

fn summary(model: asset::Model) -> AssetSummary {
    AssetSummary {
        id: model.id,
        name: model.name,
        family: model.family,
        description: model.description,
        tags: model.tags,
        status: model.status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

fn extension_of(filename: &str) -> String {
    PathBuf::from(filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_lowercase()
}

/// Upsert asset metadata and open a fresh server-assigned version.
pub async fn publish(
    db: &DatabaseConnection,
    req: &PublishRequest,
) -> Result<PublishReceipt, ServiceError> {
    let asset_id = req.asset_id.trim();
    if asset_id.is_empty() {
        return Err(ServiceError::Validation("asset_id required".into()));
    }
    let family_name = req.family.as_deref().unwrap_or_default();
    let family = Family::parse(family_name)
        .ok_or_else(|| ServiceError::Validation(format!("unknown family: {family_name:?}")))?;

    let name = req.name.clone().unwrap_or_else(|| asset_id.to_string());
    let description = req.description.clone().unwrap_or_default();
    let tags = req.tags.join(",");

    // a JSON `null` metadata body is treated as "no metadata"
    let metadata =
        if req.metadata.is_null() { json!({}) } else { req.metadata.clone() };

    asset::ensure(db, asset_id, &name, family.as_str(), &description, &tags).await?;
    let number = asset::assign_next_version(db, asset_id).await?;
    version::create(db, asset_id, number, metadata).await?;

    change::record(db, "asset_upsert", asset_id, json!({"name": name, "family": family.as_str()}))
        .await?;
    change::record(db, "version_created", asset_id, json!({"version": number})).await?;

    info!(asset_id, version = number, family = family.as_str(), "published new version");
    Ok(PublishReceipt { asset_id: asset_id.to_string(), version: number })
}

/// Store an uploaded file against the asset's latest version.
pub async fn attach_file(
    db: &DatabaseConnection,
    store: &StorageRoot,
    asset_id: &str,
    filename: &str,
    bytes: &[u8],
) -> Result<UploadReceipt, ServiceError> {
    let found = asset::get(db, asset_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("asset"))?;
    if found.head_version < 1 {
        return Err(ServiceError::Validation("asset has no published version".into()));
    }
    let number = found.head_version;

    let name = storage::clean_filename(filename)?;
    let (rel_path, size) = store.save_upload(asset_id, number, &name, bytes).await?;
    file::add(db, asset_id, number, &name, &rel_path, &extension_of(&name), size).await?;
    change::record(db, "file_added", asset_id, json!({"version": number, "filename": name}))
        .await?;

    Ok(UploadReceipt { ok: true, asset_id: asset_id.to_string(), version: number, rel_path })
}

pub async fn list_assets(
    db: &DatabaseConnection,
    family: Option<String>,
    status: Option<String>,
    page: Pagination,
) -> Result<AssetList, ServiceError> {
    let (limit, offset) = page.normalize();
    let filter = asset::ListFilter { family, status };
    let items: Vec<AssetSummary> = asset::list(db, &filter, limit, offset)
        .await?
        .into_iter()
        .map(summary)
        .collect();
    let count = items.len();
    Ok(AssetList { items, count })
}

pub async fn asset_detail(db: &DatabaseConnection, id: &str) -> Result<AssetDetail, ServiceError> {
    let found = asset::get(db, id).await?.ok_or_else(|| ServiceError::not_found("asset"))?;
    let versions = version::for_asset(db, id)
        .await?
        .into_iter()
        .map(|v| VersionInfo {
            version: v.version,
            metadata: v.metadata,
            created_at: v.created_at,
            updated_at: v.updated_at,
        })
        .collect();
    let files = file::for_asset(db, id)
        .await?
        .into_iter()
        .map(|f| FileInfo {
            version: f.version,
            filename: f.filename,
            rel_path: f.rel_path,
            format: f.format,
            size_bytes: f.size_bytes,
        })
        .collect();
    Ok(AssetDetail { asset: summary(found), versions, files })
}

/// Apply the allowed metadata edits; anything else in the request is ignored.
pub async fn update_asset(
    db: &DatabaseConnection,
    id: &str,
    req: &UpdateAssetRequest,
) -> Result<(), ServiceError> {
    let fields = asset::UpdateFields {
        name: req.name.clone(),
        description: req.description.clone(),
        tags: req.tags.as_ref().map(|t| t.join(",")),
        status: req.status.clone(),
    };
    if fields.is_empty() {
        return Ok(());
    }
    let changed = json!({
        "name": req.name,
        "description": req.description,
        "tags": req.tags,
        "status": req.status,
    });
    asset::update(db, id, fields).await?;
    change::record(db, "asset_update", id, changed).await?;
    Ok(())
}

pub async fn set_status(
    db: &DatabaseConnection,
    id: &str,
    status: &str,
) -> Result<(), ServiceError> {
    if status.trim().is_empty() {
        return Err(ServiceError::Validation("status required".into()));
    }
    let req = UpdateAssetRequest { status: Some(status.to_string()), ..Default::default() };
    update_asset(db, id, &req).await
}

pub async fn add_comment(
    db: &DatabaseConnection,
    id: &str,
    author: &str,
    body: &str,
) -> Result<(), ServiceError> {
    asset::get(db, id).await?.ok_or_else(|| ServiceError::not_found("asset"))?;
    comment::add(db, id, author, body).await?;
    change::record(db, "comment", id, json!({"author": author})).await?;
    Ok(())
}

pub async fn list_changes(
    db: &DatabaseConnection,
    since: Option<DateTime<FixedOffset>>,
) -> Result<ChangeList, ServiceError> {
    let items = change::list_since(db, since, CHANGES_LIMIT)
        .await?
        .into_iter()
        .map(|c| ChangeItem {
            kind: c.kind,
            asset_id: c.asset_id,
            payload: c.payload,
            created_at: c.created_at,
        })
        .collect();
    Ok(ChangeList { items })
}

/// Hard-delete one version: its directory, its file rows, its version row.
/// The asset's head counter is left alone so the number is never reissued.
pub async fn delete_version(
    db: &DatabaseConnection,
    store: &StorageRoot,
    id: &str,
    number: i32,
) -> Result<(), ServiceError> {
    version::find(db, id, number)
        .await?
        .ok_or_else(|| ServiceError::not_found("version"))?;

    if let Err(e) = store.delete_version(id, number).await {
        // storage cleanup is best-effort; row removal must not be blocked
        warn!(asset_id = id, version = number, error = %e, "version storage cleanup failed");
    }
    file::delete_for_version(db, id, number).await?;
    version::delete(db, id, number).await?;
    change::record(db, "version_deleted", id, json!({"version": number})).await?;
    info!(asset_id = id, version = number, "version deleted");
    Ok(())
}

/// Hard-delete an asset with all versions, files, comments and metadata.
pub async fn delete_asset(
    db: &DatabaseConnection,
    store: &StorageRoot,
    id: &str,
) -> Result<(), ServiceError> {
    asset::get(db, id).await?.ok_or_else(|| ServiceError::not_found("asset"))?;

    if let Err(e) = store.delete_asset(id).await {
        warn!(asset_id = id, error = %e, "asset storage cleanup failed");
    }
    file::delete_for_asset(db, id).await?;
    version::delete_for_asset(db, id).await?;
    comment::delete_for_asset(db, id).await?;
    asset::hard_delete(db, id).await?;
    change::record(db, "asset_deleted", id, json!({})).await?;
    info!(asset_id = id, "asset deleted");
    Ok(())
}

#[derive(Debug)]
pub struct Download {
    pub abs_path: PathBuf,
    pub filename: String,
}

/// Pick the stored file for (version, format). `version` defaults to the
/// latest one, `format` of `None` matches any.
pub async fn resolve_download(
    db: &DatabaseConnection,
    store: &StorageRoot,
    id: &str,
    number: Option<i32>,
    format: Option<&str>,
) -> Result<Download, ServiceError> {
    asset::get(db, id).await?.ok_or_else(|| ServiceError::not_found("asset"))?;
    let number = match number {
        Some(n) => n,
        None => {
            version::latest(db, id)
                .await?
                .ok_or_else(|| ServiceError::not_found("version"))?
                .version
        }
    };
    let wanted = format.map(|f| f.trim_start_matches('.').to_lowercase());
    let files = file::for_version(db, id, number).await?;
    let picked = files
        .into_iter()
        .find(|f| wanted.as_deref().map_or(true, |w| f.format == w))
        .ok_or_else(|| ServiceError::not_found("file for version/format"))?;
    let abs_path = store.absolute_from_rel(&picked.rel_path)?;
    Ok(Download { abs_path, filename: picked.filename })
}

#[derive(Debug)]
pub struct Package {
    pub zip_name: String,
    pub bytes: Vec<u8>,
}

/// Assemble the zip package for (asset, version); `version` defaults to the
/// latest one.
pub async fn build_package(
    db: &DatabaseConnection,
    store: &StorageRoot,
    id: &str,
    number: Option<i32>,
) -> Result<Package, ServiceError> {
    let found = asset::get(db, id).await?.ok_or_else(|| ServiceError::not_found("asset"))?;
    let picked = match number {
        Some(n) => version::find(db, id, n).await?,
        None => version::latest(db, id).await?,
    }
    .ok_or_else(|| ServiceError::not_found("version"))?;

    let metadata = json!({
        "asset": {
            "id": found.id,
            "name": found.name,
            "family": found.family,
            "description": found.description,
            "tags": found.tags,
            "status": found.status,
        },
        "version": picked.version,
    });

    let mut entries = Vec::new();
    for f in file::for_version(db, id, picked.version).await? {
        entries.push(PackageEntry {
            filename: f.filename,
            abs_path: store.absolute_from_rel(&f.rel_path)?,
        });
    }

    let zip_name = format!("{}_v{}.zip", found.id, picked.version);
    let bytes = tokio::task::spawn_blocking(move || package::build(&metadata, &entries))
        .await
        .map_err(|e| ServiceError::Package(e.to_string()))?
        .map_err(|e| ServiceError::Package(e.to_string()))?;

    Ok(Package { zip_name, bytes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::types::PublishRequest;
    use sea_orm::DatabaseConnection;
    use tempfile::TempDir;

    async fn harness() -> (DatabaseConnection, StorageRoot, TempDir) {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("catalog.sqlite3").display());
        let db = models::db::connect_and_migrate(&url).await.unwrap();
        let store = StorageRoot::new(dir.path().join("storage_root"));
        store.ensure_layout().await.unwrap();
        (db, store, dir)
    }

    fn publish_req(asset_id: &str, family: &str) -> PublishRequest {
        PublishRequest {
            asset_id: asset_id.into(),
            name: None,
            family: Some(family.into()),
            description: None,
            tags: vec![],
            metadata: serde_json::json!({}),
        }
    }

    #[tokio::test]
    async fn first_publish_is_version_one_then_two() {
        let (db, _store, _dir) = harness().await;
        let first = publish(&db, &publish_req("model_Hero", "model")).await.unwrap();
        assert_eq!(first.version, 1);
        let second = publish(&db, &publish_req("model_Hero", "model")).await.unwrap();
        assert_eq!(second.version, 2);
    }

    #[tokio::test]
    async fn publish_rejects_unknown_family_and_blank_id() {
        let (db, _store, _dir) = harness().await;
        assert!(matches!(
            publish(&db, &publish_req("x", "blob")).await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            publish(&db, &publish_req("", "model")).await,
            Err(ServiceError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn attach_file_lands_on_latest_version() {
        let (db, store, _dir) = harness().await;
        publish(&db, &publish_req("model_Hero", "model")).await.unwrap();
        publish(&db, &publish_req("model_Hero", "model")).await.unwrap();

        let receipt = attach_file(&db, &store, "model_Hero", "hero.fbx", b"mesh").await.unwrap();
        assert_eq!(receipt.version, 2);
        assert_eq!(receipt.rel_path, "assets/model_Hero/v2/hero.fbx");

        let detail = asset_detail(&db, "model_Hero").await.unwrap();
        assert_eq!(detail.files.len(), 1);
        assert_eq!(detail.files[0].format, "fbx");
    }

    #[tokio::test]
    async fn attach_file_requires_a_published_version() {
        let (db, store, _dir) = harness().await;
        let err = attach_file(&db, &store, "model_Missing", "a.fbx", b"x").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn download_resolution_honours_version_and_format() {
        let (db, store, _dir) = harness().await;
        publish(&db, &publish_req("model_Hero", "model")).await.unwrap();
        attach_file(&db, &store, "model_Hero", "hero.fbx", b"f").await.unwrap();
        attach_file(&db, &store, "model_Hero", "hero.obj", b"o").await.unwrap();

        let by_format =
            resolve_download(&db, &store, "model_Hero", None, Some("obj")).await.unwrap();
        assert_eq!(by_format.filename, "hero.obj");

        let any = resolve_download(&db, &store, "model_Hero", Some(1), None).await.unwrap();
        assert_eq!(any.filename, "hero.fbx");

        let missing = resolve_download(&db, &store, "model_Hero", Some(1), Some("abc")).await;
        assert!(missing.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn package_collects_version_files() {
        let (db, store, _dir) = harness().await;
        publish(&db, &publish_req("rig_Hero", "rig")).await.unwrap();
        attach_file(&db, &store, "rig_Hero", "hero_rig.ma", b"rig").await.unwrap();

        let package = build_package(&db, &store, "rig_Hero", None).await.unwrap();
        assert_eq!(package.zip_name, "rig_Hero_v1.zip");
        assert!(!package.bytes.is_empty());

        let missing = build_package(&db, &store, "rig_Hero", Some(9)).await;
        assert!(missing.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn delete_version_is_scoped_and_delete_asset_is_total() {
        let (db, store, _dir) = harness().await;
        publish(&db, &publish_req("scene_Set", "scene")).await.unwrap();
        attach_file(&db, &store, "scene_Set", "set_a.ma", b"a").await.unwrap();
        publish(&db, &publish_req("scene_Set", "scene")).await.unwrap();
        attach_file(&db, &store, "scene_Set", "set_b.ma", b"b").await.unwrap();

        delete_version(&db, &store, "scene_Set", 1).await.unwrap();
        let detail = asset_detail(&db, "scene_Set").await.unwrap();
        assert_eq!(detail.versions.len(), 1);
        assert_eq!(detail.versions[0].version, 2);
        assert_eq!(detail.files.len(), 1);

        // the freed number is not handed out again
        let next = publish(&db, &publish_req("scene_Set", "scene")).await.unwrap();
        assert_eq!(next.version, 3);

        delete_asset(&db, &store, "scene_Set").await.unwrap();
        assert!(asset_detail(&db, "scene_Set").await.unwrap_err().is_not_found());
        assert!(delete_asset(&db, &store, "scene_Set").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn change_feed_records_lifecycle() {
        let (db, store, _dir) = harness().await;
        publish(&db, &publish_req("model_A", "model")).await.unwrap();
        attach_file(&db, &store, "model_A", "a.obj", b"x").await.unwrap();
        delete_asset(&db, &store, "model_A").await.unwrap();

        let feed = list_changes(&db, None).await.unwrap();
        let kinds: Vec<&str> = feed.items.iter().map(|c| c.kind.as_str()).collect();
        assert_eq!(kinds, vec![
            "asset_upsert",
            "version_created",
            "file_added",
            "asset_deleted",
        ]);
    }
}
