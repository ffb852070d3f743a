//! Directory-tree name sources.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use veld_core::{BoxedError, NameSource};

use crate::TRACING_TARGET;
use crate::error::{DirfsError, DirfsResult};

/// Name source over one container's directory tree.
///
/// Every regular file and every directory below the root contributes its
/// relative path (with `/` separators) as a name. Hidden entries, the
/// sidecar metadata directory among them, are excluded. A missing root
/// enumerates as empty: container existence is the caller's concern, not the
/// snapshot's.
#[derive(Debug, Clone)]
pub struct DirContainer {
    root: PathBuf,
}

impl DirContainer {
    /// Creates a name source rooted at the container's directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the container root.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    async fn walk(&self) -> DirfsResult<Vec<String>> {
        let mut names = Vec::new();
        let mut pending: Vec<(PathBuf, String)> = vec![(self.root.clone(), String::new())];

        while let Some((dir, rel)) = pending.pop() {
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                // The root may not exist yet and any subdirectory may vanish
                // mid-walk; both enumerate as absent rather than failing the
                // snapshot.
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => return Err(DirfsError::io(&dir, err)),
            };
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|err| DirfsError::io(&dir, err))?
            {
                let file_name = entry.file_name();
                let Some(file_name) = file_name.to_str() else {
                    tracing::warn!(
                        target: TRACING_TARGET,
                        path = %entry.path().display(),
                        "Skipping non-UTF-8 entry"
                    );
                    continue;
                };
                if file_name.starts_with('.') {
                    continue;
                }
                let name = if rel.is_empty() {
                    file_name.to_owned()
                } else {
                    format!("{rel}/{file_name}")
                };
                let file_type = match entry.file_type().await {
                    Ok(file_type) => file_type,
                    Err(err) if err.kind() == ErrorKind::NotFound => continue,
                    Err(err) => return Err(DirfsError::io(entry.path(), err)),
                };
                if file_type.is_dir() {
                    pending.push((entry.path(), name.clone()));
                    names.push(name);
                } else if file_type.is_file() {
                    names.push(name);
                }
            }
        }

        names.sort();

        tracing::debug!(
            target: TRACING_TARGET,
            root = %self.root.display(),
            names = names.len(),
            "Container walk complete"
        );

        Ok(names)
    }
}

#[async_trait]
impl NameSource for DirContainer {
    async fn enumerate(&self) -> Result<Vec<String>, BoxedError> {
        Ok(self.walk().await?)
    }
}

/// Name source over an account's containers.
///
/// Containers are the immediate subdirectories of the account root; hidden
/// entries are excluded and a missing root enumerates as empty.
#[derive(Debug, Clone)]
pub struct DirAccount {
    root: PathBuf,
}

impl DirAccount {
    /// Creates a name source rooted at the account's directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the account root.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    async fn containers(&self) -> DirfsResult<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(names),
            Err(err) => return Err(DirfsError::io(&self.root, err)),
        };
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|err| DirfsError::io(&self.root, err))?
        {
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if file_name.starts_with('.') {
                continue;
            }
            let file_type = match entry.file_type().await {
                Ok(file_type) => file_type,
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => return Err(DirfsError::io(entry.path(), err)),
            };
            if file_type.is_dir() {
                names.push(file_name.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}

#[async_trait]
impl NameSource for DirAccount {
    async fn enumerate(&self) -> Result<Vec<String>, BoxedError> {
        Ok(self.containers().await?)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    async fn touch(dir: &TempDir, rel: &str) {
        let path = dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.unwrap();
        }
        fs::write(&path, b"x").await.unwrap();
    }

    #[tokio::test]
    async fn test_walk_collects_files_and_dirs_sorted() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "c").await;
        touch(&dir, "a/b").await;
        touch(&dir, "a/d/e").await;

        let names = DirContainer::new(dir.path()).enumerate().await.unwrap();
        assert_eq!(names, ["a", "a/b", "a/d", "a/d/e", "c"]);
    }

    #[tokio::test]
    async fn test_walk_excludes_hidden_entries() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "a").await;
        touch(&dir, ".veld/meta/deadbeef.json").await;
        touch(&dir, ".hidden").await;

        let names = DirContainer::new(dir.path()).enumerate().await.unwrap();
        assert_eq!(names, ["a"]);
    }

    #[tokio::test]
    async fn test_missing_root_enumerates_empty() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone");
        let names = DirContainer::new(&missing).enumerate().await.unwrap();
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn test_account_lists_only_directories() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "stray-file").await;
        touch(&dir, "photos/x").await;
        touch(&dir, "docs/y").await;
        touch(&dir, ".trash/z").await;

        let names = DirAccount::new(dir.path()).enumerate().await.unwrap();
        assert_eq!(names, ["docs", "photos"]);
    }
}
