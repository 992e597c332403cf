//! Filesystem-backed raw store.
//!
//! Directories map to directories below a root, objects to files named
//! `{name}.{extension}`. Objects are opened with `create_new`, so an existing
//! object is never overwritten.

use std::path::{Component, Path, PathBuf};

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;

use super::{BaseRawStore, DirectoryHandle};

pub struct LocalRawStore {
    root: PathBuf,
}

impl LocalRawStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, relative: &str) -> Result<PathBuf> {
        let path = Path::new(relative);
        if path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            bail!("Raw store path must be relative without '..': {}", relative);
        }
        Ok(self.root.join(path))
    }
}

#[async_trait]
impl BaseRawStore for LocalRawStore {
    async fn create_or_get_directory(&self, path: &str) -> Result<DirectoryHandle> {
        let full = self.resolve(path)?;
        tokio::fs::create_dir_all(&full)
            .await
            .with_context(|| format!("Failed to create raw directory {}", full.display()))?;

        Ok(DirectoryHandle {
            path: path.to_string(),
        })
    }

    async fn upload_raw_data(
        &self,
        directory: &DirectoryHandle,
        payload: &str,
        name: &str,
        extension: &str,
    ) -> Result<()> {
        let full = self.resolve(&format!("{}/{}.{}", directory.path, name, extension))?;

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&full)
            .await
            .with_context(|| format!("Failed to create raw object {}", full.display()))?;

        file.write_all(payload.as_bytes())
            .await
            .with_context(|| format!("Failed to write raw object {}", full.display()))?;
        file.flush().await?;

        tracing::debug!(path = %full.display(), bytes = payload.len(), "Uploaded raw object");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_directory_and_writes_object() {
        let root = tempfile::tempdir().unwrap();
        let store = LocalRawStore::new(root.path());

        let dir = store
            .create_or_get_directory("raw/in/dataforseo/bulk_ranks/2024/3/7/run")
            .await
            .unwrap();
        store.upload_raw_data(&dir, "{}", "_settings", "json").await.unwrap();

        let written = std::fs::read_to_string(
            root.path()
                .join("raw/in/dataforseo/bulk_ranks/2024/3/7/run/_settings.json"),
        )
        .unwrap();
        assert_eq!(written, "{}");
    }

    #[tokio::test]
    async fn existing_directory_is_reused() {
        let root = tempfile::tempdir().unwrap();
        let store = LocalRawStore::new(root.path());

        let first = store.create_or_get_directory("raw/in/a").await.unwrap();
        let second = store.create_or_get_directory("raw/in/a").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn never_overwrites_an_object() {
        let root = tempfile::tempdir().unwrap();
        let store = LocalRawStore::new(root.path());
        let dir = store.create_or_get_directory("raw/in/a").await.unwrap();

        store.upload_raw_data(&dir, "first", "obj", "json").await.unwrap();
        let second = store.upload_raw_data(&dir, "second", "obj", "json").await;

        assert!(second.is_err());
        let kept = std::fs::read_to_string(root.path().join("raw/in/a/obj.json")).unwrap();
        assert_eq!(kept, "first");
    }

    #[tokio::test]
    async fn rejects_parent_components() {
        let root = tempfile::tempdir().unwrap();
        let store = LocalRawStore::new(root.path());

        assert!(store.create_or_get_directory("../escape").await.is_err());
        assert!(store.create_or_get_directory("/abs").await.is_err());
    }
}
