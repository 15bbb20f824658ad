//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

/// Ensure the data and storage directories exist before serving requests.
pub async fn ensure_env(data_dir: &str, storage_root: &str) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {data_dir}: {e}"))?;
    tokio::fs::create_dir_all(storage_root)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {storage_root}: {e}"))?;
    Ok(())
}
