//! Typed HTTP client for the asset server API.

use std::path::{Path, PathBuf};

use reqwest::{Method, RequestBuilder, Response, StatusCode};

use common::types::{AssetDetail, ChangeList, PublishReceipt, PublishRequest, Stats, UploadReceipt};

use crate::errors::PublishError;

pub const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http: reqwest::Client::new(), base_url, api_key }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self.http.request(method, format!("{}{}", self.base_url, path));
        if let Some(key) = &self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }
        builder
    }

    async fn expect_ok(resp: Response) -> Result<Response, PublishError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Err(PublishError::Rejected { status, body })
    }

    pub async fn stats(&self) -> Result<Stats, PublishError> {
        let resp = self.request(Method::GET, "/api/stats").send().await?;
        Ok(Self::expect_ok(resp).await?.json().await?)
    }

    /// Asset detail, or `None` when the server has never seen the asset.
    pub async fn asset_detail(&self, asset_id: &str) -> Result<Option<AssetDetail>, PublishError> {
        let resp = self.request(Method::GET, &format!("/api/assets/{asset_id}")).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        Ok(Some(Self::expect_ok(resp).await?.json().await?))
    }

    /// Publish asset metadata; the server answers with the assigned version.
    pub async fn publish(&self, req: &PublishRequest) -> Result<PublishReceipt, PublishError> {
        let resp = self.request(Method::POST, "/api/assets").json(req).send().await?;
        Ok(Self::expect_ok(resp).await?.json().await?)
    }

    /// Multipart upload of one exported file to the asset's current version.
    pub async fn upload_file(
        &self,
        asset_id: &str,
        path: &Path,
    ) -> Result<UploadReceipt, PublishError> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(|n| n.to_string())
            .unwrap_or_else(|| "upload.bin".to_string());
        let bytes = tokio::fs::read(path).await?;

        let form = reqwest::multipart::Form::new()
            .text("asset_id", asset_id.to_string())
            .part("file", reqwest::multipart::Part::bytes(bytes).file_name(filename));

        let resp = self.request(Method::POST, "/api/upload").multipart(form).send().await?;
        Ok(Self::expect_ok(resp).await?.json().await?)
    }

    pub async fn changes(&self, since: Option<&str>) -> Result<ChangeList, PublishError> {
        let mut builder = self.request(Method::GET, "/api/changes");
        if let Some(since) = since {
            builder = builder.query(&[("since", since)]);
        }
        let resp = builder.send().await?;
        Ok(Self::expect_ok(resp).await?.json().await?)
    }

    /// Fetch the zip package for (asset, version) into `dest_dir`.
    pub async fn download_package(
        &self,
        asset_id: &str,
        version: Option<i32>,
        dest_dir: &Path,
    ) -> Result<PathBuf, PublishError> {
        let mut builder = self.request(Method::GET, &format!("/api/assets/{asset_id}/package"));
        if let Some(version) = version {
            builder = builder.query(&[("version", version)]);
        }
        let resp = Self::expect_ok(builder.send().await?).await?;
        let bytes = resp.bytes().await?;

        let name = match version {
            Some(v) => format!("{asset_id}_v{v}.zip"),
            None => format!("{asset_id}_latest.zip"),
        };
        let dest = dest_dir.join(name);
        tokio::fs::write(&dest, &bytes).await?;
        Ok(dest)
    }
}
