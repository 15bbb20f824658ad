//! The publish run: collect, validate, then integrate each instance with the
//! asset server. A plain ordered sequence; instances that fail validation are
//! reported and skipped.

use std::path::Path;

use serde_json::json;
use tracing::{info, warn};

use common::types::PublishRequest;

use crate::client::ApiClient;
use crate::collect::{collect_exports, Instance};
use crate::errors::PublishError;
use crate::validate::{validate, Violation};

#[derive(Debug)]
pub struct PublishedInstance {
    pub asset_id: String,
    pub version: i32,
    pub uploaded: Vec<String>,
}

#[derive(Debug)]
pub struct SkippedInstance {
    pub asset_id: String,
    pub violations: Vec<Violation>,
}

#[derive(Debug, Default)]
pub struct PublishReport {
    pub published: Vec<PublishedInstance>,
    pub skipped: Vec<SkippedInstance>,
}

fn publish_request(instance: &Instance) -> PublishRequest {
    let total_bytes: u64 = instance.files.iter().map(|f| f.size_bytes).sum();
    PublishRequest {
        asset_id: instance.asset_id.clone(),
        name: Some(instance.name.clone()),
        family: Some(instance.family.clone()),
        description: None,
        tags: vec![],
        metadata: json!({
            "file_count": instance.files.len(),
            "total_bytes": total_bytes,
        }),
    }
}

pub async fn run(client: &ApiClient, exports_root: &Path) -> Result<PublishReport, PublishError> {
    // availability gate, as the integrate step did against /api/stats
    client
        .stats()
        .await
        .map_err(|_| PublishError::Unavailable(client.base_url().to_string()))?;

    let instances = collect_exports(exports_root).await?;
    info!(count = instances.len(), root = %exports_root.display(), "collected publish instances");

    let mut report = PublishReport::default();
    for instance in instances {
        let violations = validate(&instance);
        if !violations.is_empty() {
            for v in &violations {
                warn!(asset_id = %instance.asset_id, rule = v.rule, "{}", v.message);
            }
            report.skipped.push(SkippedInstance { asset_id: instance.asset_id, violations });
            continue;
        }

        if let Ok(Some(detail)) = client.asset_detail(&instance.asset_id).await {
            info!(
                asset_id = %instance.asset_id,
                existing_versions = detail.versions.len(),
                "asset already known to server"
            );
        }

        let receipt = client.publish(&publish_request(&instance)).await?;
        let mut uploaded = Vec::new();
        for file in &instance.files {
            // per-file upload is best-effort; a bad file should not sink the run
            match client.upload_file(&receipt.asset_id, &file.path).await {
                Ok(r) => uploaded.push(r.rel_path),
                Err(e) => {
                    warn!(asset_id = %receipt.asset_id, file = %file.path.display(), error = %e, "upload failed")
                }
            }
        }
        info!(
            asset_id = %receipt.asset_id,
            version = receipt.version,
            files = uploaded.len(),
            "integrated instance"
        );
        report.published.push(PublishedInstance {
            asset_id: receipt.asset_id,
            version: receipt.version,
            uploaded,
        });
    }
    Ok(report)
}
