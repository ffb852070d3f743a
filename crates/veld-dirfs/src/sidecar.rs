//! Sidecar record store.
//!
//! Records live as JSON documents under `<root>/.veld/meta/`, one file per
//! name, keyed by the sha256 of the name. Resolution validates a stored
//! document against the physical entry it describes; synthesis rebuilds a
//! document from physical attributes and persists it for future lookups.

use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use jiff::Timestamp;
use sha2::{Digest, Sha256};
use tokio::fs;
use veld_core::{
    BoxedError, DIR_CONTENT_TYPE, FILE_CONTENT_TYPE, ObjectType, Record, RecordResolver,
    Resolution,
};

use crate::TRACING_TARGET;
use crate::error::{DirfsError, DirfsResult};

/// Directory holding sidecar documents, relative to the container root.
const META_DIR: &str = ".veld/meta";

/// Record resolver backed by JSON sidecar documents in a container
/// directory.
#[derive(Debug, Clone)]
pub struct SidecarStore {
    root: PathBuf,
}

impl SidecarStore {
    /// Creates a store rooted at the container's directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the container root.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Creates a first-class directory object and persists its record.
    pub async fn put_dir_object(&self, name: &str) -> DirfsResult<Record> {
        let target = self.target_path(name)?;
        fs::create_dir_all(&target)
            .await
            .map_err(|err| DirfsError::io(&target, err))?;
        let stat = fs::metadata(&target)
            .await
            .map_err(|err| DirfsError::io(&target, err))?;
        let record = Record::new(
            name,
            timestamp_of(&stat),
            0,
            DIR_CONTENT_TYPE,
            empty_etag(),
        )
        .with_object_type(ObjectType::DirObject);
        self.persist(&record).await?;
        Ok(record)
    }

    /// Maps a name onto its physical path under the root.
    ///
    /// A single trailing delimiter is tolerated (directory entries are
    /// sometimes addressed with one); traversal components are not.
    fn target_path(&self, name: &str) -> DirfsResult<PathBuf> {
        let trimmed = name.strip_suffix('/').unwrap_or(name);
        if trimmed.is_empty() {
            return Err(DirfsError::invalid_name(name));
        }
        let mut path = self.root.clone();
        for component in trimmed.split('/') {
            if component.is_empty() || component == "." || component == ".." {
                return Err(DirfsError::invalid_name(name));
            }
            path.push(component);
        }
        Ok(path)
    }

    fn sidecar_path(&self, name: &str) -> PathBuf {
        let trimmed = name.strip_suffix('/').unwrap_or(name);
        let digest = hex::encode(Sha256::digest(trimmed.as_bytes()));
        self.root.join(META_DIR).join(format!("{digest}.json"))
    }

    async fn persist(&self, record: &Record) -> DirfsResult<()> {
        let meta_dir = self.root.join(META_DIR);
        fs::create_dir_all(&meta_dir)
            .await
            .map_err(|err| DirfsError::io(&meta_dir, err))?;
        let path = self.sidecar_path(&record.name);
        let raw = serde_json::to_vec(record)?;
        fs::write(&path, raw)
            .await
            .map_err(|err| DirfsError::io(&path, err))?;

        tracing::debug!(
            target: TRACING_TARGET,
            name = %record.name,
            "Record persisted"
        );

        Ok(())
    }

    async fn lookup(&self, name: &str) -> DirfsResult<Resolution> {
        let target = self.target_path(name)?;
        let stat = match fs::metadata(&target).await {
            Ok(stat) => stat,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Resolution::Missing),
            Err(err) => return Err(DirfsError::io(&target, err)),
        };

        let sidecar = self.sidecar_path(name);
        let raw = match fs::read(&sidecar).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Resolution::Invalid),
            Err(err) => return Err(DirfsError::io(&sidecar, err)),
        };
        let Ok(record) = serde_json::from_slice::<Record>(&raw) else {
            return Ok(Resolution::Invalid);
        };
        if record.name != name {
            return Ok(Resolution::Invalid);
        }
        // A size mismatch on a regular file means the record predates the
        // file's current content.
        if stat.is_file() && record.size != stat.len() {
            return Ok(Resolution::Invalid);
        }
        Ok(Resolution::Found(record))
    }

    async fn rebuild(&self, name: &str) -> DirfsResult<Option<Record>> {
        let target = self.target_path(name)?;
        let stat = match fs::metadata(&target).await {
            Ok(stat) => stat,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(DirfsError::io(&target, err)),
        };

        let record = if stat.is_dir() {
            Record::new(name, timestamp_of(&stat), 0, DIR_CONTENT_TYPE, empty_etag())
                .with_object_type(ObjectType::DirPlaceholder)
        } else {
            let data = match fs::read(&target).await {
                Ok(data) => data,
                Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
                Err(err) => return Err(DirfsError::io(&target, err)),
            };
            Record::new(
                name,
                timestamp_of(&stat),
                data.len() as u64,
                FILE_CONTENT_TYPE,
                hex::encode(Sha256::digest(&data)),
            )
        };
        self.persist(&record).await?;
        Ok(Some(record))
    }
}

#[async_trait]
impl RecordResolver for SidecarStore {
    async fn resolve(&self, name: &str) -> Result<Resolution, BoxedError> {
        Ok(self.lookup(name).await?)
    }

    async fn synthesize(&self, name: &str) -> Result<Option<Record>, BoxedError> {
        Ok(self.rebuild(name).await?)
    }
}

fn timestamp_of(stat: &std::fs::Metadata) -> Timestamp {
    stat.modified()
        .ok()
        .and_then(|modified| Timestamp::try_from(modified).ok())
        .unwrap_or(Timestamp::UNIX_EPOCH)
}

fn empty_etag() -> String {
    hex::encode(Sha256::digest(b""))
}
