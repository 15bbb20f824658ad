//! Sync agent: poll the server change feed and mirror freshly published
//! packages into a local directory tree (`<mirror>/<asset_id>/<zip>`).

use std::path::PathBuf;
use std::time::Duration;

use tracing::{info, warn};

use crate::client::ApiClient;
use crate::errors::PublishError;

pub struct SyncAgent {
    client: ApiClient,
    mirror_root: PathBuf,
    interval: Duration,
}

impl SyncAgent {
    pub fn new(client: ApiClient, mirror_root: impl Into<PathBuf>, interval: Duration) -> Self {
        Self { client, mirror_root: mirror_root.into(), interval }
    }

    /// Poll forever. Errors are logged and retried on the next tick so a
    /// temporarily unreachable server does not kill the agent.
    pub async fn run(&self) -> Result<(), PublishError> {
        tokio::fs::create_dir_all(&self.mirror_root).await?;
        let mut cursor: Option<String> = None;
        loop {
            match self.tick(&mut cursor).await {
                Ok(0) => {}
                Ok(n) => info!(mirrored = n, "sync tick complete"),
                Err(e) => warn!(error = %e, "sync tick failed"),
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One poll step; returns how many packages were mirrored.
    pub async fn tick(&self, cursor: &mut Option<String>) -> Result<usize, PublishError> {
        let changes = self.client.changes(cursor.as_deref()).await?;
        let mut mirrored = 0;

        for change in &changes.items {
            if change.kind != "version_created" {
                continue;
            }
            let version =
                change.payload.get("version").and_then(|v| v.as_i64()).map(|v| v as i32);
            let dest = self.mirror_root.join(&change.asset_id);
            tokio::fs::create_dir_all(&dest).await?;
            match self.client.download_package(&change.asset_id, version, &dest).await {
                Ok(path) => {
                    info!(asset_id = %change.asset_id, path = %path.display(), "mirrored package");
                    mirrored += 1;
                }
                // the asset may already be deleted again; skip and move on
                Err(e) => {
                    warn!(asset_id = %change.asset_id, error = %e, "package mirror failed")
                }
            }
        }

        if let Some(last) = changes.items.last() {
            *cursor = Some(last.created_at.to_rfc3339());
        }
        Ok(mirrored)
    }
}
