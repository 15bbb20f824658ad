//! Wire types shared between the asset server and the publisher client.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Liveness payload for `GET /api/stats`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Stats {
    pub ok: bool,
    pub time: String,
    pub version: String,
}

/// Body of `POST /api/assets`. The server assigns version numbers itself, so
/// there is deliberately no version field.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PublishRequest {
    pub asset_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PublishReceipt {
    pub asset_id: String,
    pub version: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UploadReceipt {
    pub ok: bool,
    pub asset_id: String,
    pub version: i32,
    pub rel_path: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AssetSummary {
    pub id: String,
    pub name: String,
    pub family: String,
    pub description: String,
    pub tags: String,
    pub status: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VersionInfo {
    pub version: i32,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FileInfo {
    pub version: i32,
    pub filename: String,
    pub rel_path: String,
    pub format: String,
    pub size_bytes: i64,
}

/// Detail payload: asset fields plus versions (newest first) and files.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AssetDetail {
    #[serde(flatten)]
    pub asset: AssetSummary,
    pub versions: Vec<VersionInfo>,
    pub files: Vec<FileInfo>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AssetList {
    pub items: Vec<AssetSummary>,
    pub count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct UpdateAssetRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CommentRequest {
    #[serde(default = "default_author")]
    pub author: String,
    pub body: String,
}

fn default_author() -> String {
    "anonymous".to_string()
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatusRequest {
    pub status: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChangeItem {
    pub kind: String,
    pub asset_id: String,
    pub payload: serde_json::Value,
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChangeList {
    pub items: Vec<ChangeItem>,
}
