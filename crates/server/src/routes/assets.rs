use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, FixedOffset, Utc};
use serde::Deserialize;

use common::types::{
    AssetDetail, AssetList, ChangeList, CommentRequest, Health, PublishReceipt, PublishRequest,
    Stats, StatusRequest, UpdateAssetRequest, UploadReceipt,
};
use service::catalog;
use service::pagination::Pagination;

use crate::auth::ServerState;
use crate::errors::ApiError;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn stats() -> Json<Stats> {
    Json(Stats {
        ok: true,
        time: Utc::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn home() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "Web Asset Server running",
        "browse": "/api/assets",
        "ui": "/ui",
    }))
}

pub async fn ui() -> Html<&'static str> {
    Html(include_str!("../../static/index.html"))
}

pub async fn publish_asset(
    State(state): State<ServerState>,
    Json(req): Json<PublishRequest>,
) -> Result<Json<PublishReceipt>, ApiError> {
    Ok(Json(catalog::publish(&state.db, &req).await?))
}

pub async fn upload_file(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> Result<Json<UploadReceipt>, ApiError> {
    let mut asset_id: Option<String> = None;
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("asset_id") => {
                asset_id =
                    Some(field.text().await.map_err(|e| ApiError::BadRequest(e.to_string()))?);
            }
            Some("file") => {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .ok_or_else(|| ApiError::BadRequest("file field needs a filename".into()))?;
                let bytes =
                    field.bytes().await.map_err(|e| ApiError::BadRequest(e.to_string()))?;
                upload = Some((filename, bytes.to_vec()));
            }
            // version/family fields are tolerated for old clients but the
            // server decides the target version itself
            _ => {}
        }
    }

    let asset_id = asset_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::BadRequest("asset_id required".into()))?;
    let (filename, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("file field missing".into()))?;

    Ok(Json(catalog::attach_file(&state.db, &state.storage, &asset_id, &filename, &bytes).await?))
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub family: Option<String>,
    pub status: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

pub async fn list_assets(
    State(state): State<ServerState>,
    Query(q): Query<ListQuery>,
) -> Result<Json<AssetList>, ApiError> {
    let page = Pagination {
        limit: q.limit.unwrap_or(Pagination::default().limit),
        offset: q.offset.unwrap_or(0),
    };
    Ok(Json(catalog::list_assets(&state.db, q.family, q.status, page).await?))
}

pub async fn asset_detail(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<AssetDetail>, ApiError> {
    Ok(Json(catalog::asset_detail(&state.db, &id).await?))
}

#[derive(Deserialize)]
pub struct DownloadQuery {
    pub version: Option<i32>,
    pub format: Option<String>,
}

pub async fn download_file(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(q): Query<DownloadQuery>,
) -> Result<Response, ApiError> {
    let download =
        catalog::resolve_download(&state.db, &state.storage, &id, q.version, q.format.as_deref())
            .await?;
    let bytes = tokio::fs::read(&download.abs_path)
        .await
        .map_err(|_| ApiError::NotFound("file missing from storage".into()))?;
    Ok(attachment(bytes, &download.filename, "application/octet-stream"))
}

#[derive(Deserialize)]
pub struct PackageQuery {
    pub version: Option<i32>,
}

pub async fn download_package(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Query(q): Query<PackageQuery>,
) -> Result<Response, ApiError> {
    let package = catalog::build_package(&state.db, &state.storage, &id, q.version).await?;
    Ok(attachment(package.bytes, &package.zip_name, "application/zip"))
}

fn attachment(bytes: Vec<u8>, filename: &str, content_type: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        bytes,
    )
        .into_response()
}

pub async fn update_asset(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateAssetRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    catalog::update_asset(&state.db, &id, &req).await?;
    Ok(Json(serde_json::json!({"ok": true})))
}

pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<StatusRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    catalog::set_status(&state.db, &id, &req.status).await?;
    Ok(Json(serde_json::json!({"ok": true})))
}

pub async fn add_comment(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<CommentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    catalog::add_comment(&state.db, &id, &req.author, &req.body).await?;
    Ok(Json(serde_json::json!({"ok": true})))
}

#[derive(Deserialize)]
pub struct ChangesQuery {
    pub since: Option<String>,
}

pub async fn list_changes(
    State(state): State<ServerState>,
    Query(q): Query<ChangesQuery>,
) -> Result<Json<ChangeList>, ApiError> {
    let since = match q.since.as_deref() {
        Some(raw) => Some(
            DateTime::<FixedOffset>::parse_from_rfc3339(raw)
                .map_err(|_| ApiError::BadRequest("since must be an RFC3339 timestamp".into()))?,
        ),
        None => None,
    };
    Ok(Json(catalog::list_changes(&state.db, since).await?))
}

pub async fn delete_asset(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    catalog::delete_asset(&state.db, &state.storage, &id).await?;
    Ok(Json(serde_json::json!({"ok": true})))
}

pub async fn delete_version(
    State(state): State<ServerState>,
    Path((id, version)): Path<(String, i32)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    catalog::delete_version(&state.db, &state.storage, &id, version).await?;
    Ok(Json(serde_json::json!({"ok": true})))
}
