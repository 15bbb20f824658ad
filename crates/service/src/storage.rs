//! Filesystem layout for published asset files.
//!
//! Files live under the storage root as `assets/<asset_id>/v<version>/<filename>`.
//! Database rows reference files by a forward-slash relative path so the root
//! can move between hosts.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;
use tokio::fs;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid path component: {0}")]
    InvalidPath(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug)]
pub struct StorageRoot {
    root: PathBuf,
}

/// Reduce a client-supplied filename to a bare final component.
pub fn clean_filename(filename: &str) -> Result<String, StorageError> {
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.to_string())
        .ok_or_else(|| StorageError::InvalidPath(filename.to_string()))?;
    if name.is_empty() || name == "." || name == ".." {
        return Err(StorageError::InvalidPath(filename.to_string()));
    }
    Ok(name)
}

fn check_component(value: &str) -> Result<(), StorageError> {
    if value.is_empty()
        || value == "."
        || value == ".."
        || value.contains('/')
        || value.contains('\\')
    {
        return Err(StorageError::InvalidPath(value.to_string()));
    }
    Ok(())
}

impl StorageRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_layout(&self) -> Result<(), StorageError> {
        fs::create_dir_all(self.root.join("assets")).await?;
        Ok(())
    }

    fn version_dir(&self, asset_id: &str, version: i32) -> Result<PathBuf, StorageError> {
        check_component(asset_id)?;
        Ok(self.root.join("assets").join(asset_id).join(format!("v{version}")))
    }

    /// Persist an uploaded file; returns the relative path for the database
    /// and the stored size in bytes.
    pub async fn save_upload(
        &self,
        asset_id: &str,
        version: i32,
        filename: &str,
        bytes: &[u8],
    ) -> Result<(String, i64), StorageError> {
        let name = clean_filename(filename)?;
        let dir = self.version_dir(asset_id, version)?;
        fs::create_dir_all(&dir).await?;
        let dst = dir.join(&name);
        fs::write(&dst, bytes).await?;
        let rel = format!("assets/{asset_id}/v{version}/{name}");
        Ok((rel, bytes.len() as i64))
    }

    /// Resolve a database-stored relative path below the root. Rejects
    /// anything that would escape it.
    pub fn absolute_from_rel(&self, rel: &str) -> Result<PathBuf, StorageError> {
        let rel_path = Path::new(rel);
        for component in rel_path.components() {
            match component {
                Component::Normal(_) => {}
                _ => return Err(StorageError::InvalidPath(rel.to_string())),
            }
        }
        Ok(self.root.join(rel_path))
    }

    /// Remove a single version directory. Missing directories are fine.
    pub async fn delete_version(&self, asset_id: &str, version: i32) -> Result<(), StorageError> {
        let dir = self.version_dir(asset_id, version)?;
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove every stored file of an asset. Missing directories are fine.
    pub async fn delete_asset(&self, asset_id: &str) -> Result<(), StorageError> {
        check_component(asset_id)?;
        let dir = self.root.join("assets").join(asset_id);
        match fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage() -> (StorageRoot, TempDir) {
        let dir = TempDir::new().unwrap();
        (StorageRoot::new(dir.path()), dir)
    }

    #[tokio::test]
    async fn save_upload_places_file_under_version_dir() {
        let (s, _dir) = storage();
        let (rel, size) = s.save_upload("model_Hero", 1, "hero.fbx", b"mesh").await.unwrap();
        assert_eq!(rel, "assets/model_Hero/v1/hero.fbx");
        assert_eq!(size, 4);
        assert!(s.absolute_from_rel(&rel).unwrap().is_file());
    }

    #[tokio::test]
    async fn upload_filenames_lose_directory_parts() {
        let (s, _dir) = storage();
        let (rel, _) = s.save_upload("model_Hero", 1, "../../etc/passwd", b"x").await.unwrap();
        assert_eq!(rel, "assets/model_Hero/v1/passwd");
    }

    #[tokio::test]
    async fn rejects_traversal_in_asset_id_and_rel_path() {
        let (s, _dir) = storage();
        assert!(s.save_upload("../evil", 1, "a.ma", b"x").await.is_err());
        assert!(s.absolute_from_rel("assets/../../secret").is_err());
        assert!(s.absolute_from_rel("/etc/passwd").is_err());
    }

    #[tokio::test]
    async fn delete_version_removes_only_that_directory() {
        let (s, _dir) = storage();
        s.save_upload("rig_A", 1, "a.ma", b"1").await.unwrap();
        s.save_upload("rig_A", 2, "b.ma", b"2").await.unwrap();

        s.delete_version("rig_A", 1).await.unwrap();
        assert!(!s.absolute_from_rel("assets/rig_A/v1/a.ma").unwrap().exists());
        assert!(s.absolute_from_rel("assets/rig_A/v2/b.ma").unwrap().is_file());

        // deleting again is a no-op
        s.delete_version("rig_A", 1).await.unwrap();
    }

    #[tokio::test]
    async fn delete_asset_removes_whole_tree() {
        let (s, _dir) = storage();
        s.save_upload("scene_X", 1, "x.ma", b"1").await.unwrap();
        s.delete_asset("scene_X").await.unwrap();
        assert!(!s.root().join("assets/scene_X").exists());
        s.delete_asset("scene_X").await.unwrap();
    }
}
