//! Collection step: turn an exports directory into publish instances.
//!
//! Expected layout, one directory level per family and per asset:
//! `<root>/<family>/<asset_name>/<files...>`

use std::path::{Path, PathBuf};

use crate::errors::PublishError;

#[derive(Debug, Clone)]
pub struct CollectedFile {
    pub path: PathBuf,
    pub size_bytes: u64,
}

/// One publishable unit: an asset name within a family plus its export files.
#[derive(Debug, Clone)]
pub struct Instance {
    pub asset_id: String,
    pub name: String,
    pub family: String,
    pub files: Vec<CollectedFile>,
}

pub async fn collect_exports(root: &Path) -> Result<Vec<Instance>, PublishError> {
    let mut instances = Vec::new();
    if !root.is_dir() {
        return Ok(instances);
    }

    let mut family_dirs = read_sorted_dirs(root).await?;
    for family_dir in family_dirs.drain(..) {
        let family = dir_name(&family_dir);
        let mut asset_dirs = read_sorted_dirs(&family_dir).await?;
        for asset_dir in asset_dirs.drain(..) {
            let name = dir_name(&asset_dir);
            let mut files = Vec::new();
            let mut entries = tokio::fs::read_dir(&asset_dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let meta = entry.metadata().await?;
                if meta.is_file() {
                    files.push(CollectedFile { path: entry.path(), size_bytes: meta.len() });
                }
            }
            files.sort_by(|a, b| a.path.cmp(&b.path));
            instances.push(Instance {
                asset_id: format!("{family}_{name}"),
                name,
                family: family.clone(),
                files,
            });
        }
    }
    Ok(instances)
}

fn dir_name(path: &Path) -> String {
    path.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_string()
}

async fn read_sorted_dirs(path: &Path) -> Result<Vec<PathBuf>, PublishError> {
    let mut dirs = Vec::new();
    let mut entries = tokio::fs::read_dir(path).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.metadata().await?.is_dir() {
            dirs.push(entry.path());
        }
    }
    dirs.sort();
    Ok(dirs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn collects_family_asset_layout() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("model/Hero")).unwrap();
        std::fs::write(root.join("model/Hero/hero.fbx"), b"mesh").unwrap();
        std::fs::write(root.join("model/Hero/hero.obj"), b"mesh").unwrap();
        std::fs::create_dir_all(root.join("rig/Hero")).unwrap();
        std::fs::write(root.join("rig/Hero/hero_rig.ma"), b"rig").unwrap();
        // stray file at family level is ignored
        std::fs::write(root.join("model/readme.txt"), b"ignored").unwrap();

        let instances = collect_exports(root).await.unwrap();
        assert_eq!(instances.len(), 2);
        assert_eq!(instances[0].asset_id, "model_Hero");
        assert_eq!(instances[0].files.len(), 2);
        assert_eq!(instances[1].asset_id, "rig_Hero");
        assert_eq!(instances[1].family, "rig");
    }

    #[tokio::test]
    async fn missing_root_collects_nothing() {
        let dir = TempDir::new().unwrap();
        let instances = collect_exports(&dir.path().join("does-not-exist")).await.unwrap();
        assert!(instances.is_empty());
    }
}
