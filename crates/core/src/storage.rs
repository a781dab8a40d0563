//! File object storage for submitted images and prompt files.
//!
//! Objects are namespaced as `{owner_id}/{character_id}/{unix_millis}.{ext}`
//! inside a bucket, and every upload yields a stable public URL.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Extension used when an uploaded image name carries none.
pub const DEFAULT_IMAGE_EXTENSION: &str = "png";

/// Extension used when an uploaded prompt file name carries none.
pub const DEFAULT_PROMPT_EXTENSION: &str = "txt";

/// Upper bound on a single uploaded object (20 MiB).
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Storage bucket an object is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Images,
    Prompts,
}

impl Bucket {
    pub fn name(self) -> &'static str {
        match self {
            Self::Images => "images",
            Self::Prompts => "prompts",
        }
    }

    fn default_extension(self) -> &'static str {
        match self {
            Self::Images => DEFAULT_IMAGE_EXTENSION,
            Self::Prompts => DEFAULT_PROMPT_EXTENSION,
        }
    }
}

/// A file supplied by the submitter.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `file` at `path` inside `bucket` and return its public URL.
    ///
    /// Never overwrites an existing object.
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        file: &UploadFile,
    ) -> Result<String, CoreError>;
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// Lower-cased extension of `file_name`, or the bucket default.
pub fn file_extension(file_name: &str, bucket: Bucket) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.trim().to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| bucket.default_extension().to_string())
}

/// Build the object path for an upload belonging to `owner_id` / `character_id`.
pub fn object_path(
    owner_id: EntityId,
    character_id: EntityId,
    uploaded_at: Timestamp,
    file_name: &str,
    bucket: Bucket,
) -> String {
    format!(
        "{owner_id}/{character_id}/{}.{}",
        uploaded_at.timestamp_millis(),
        file_extension(file_name, bucket)
    )
}

fn check_upload_size(file: &UploadFile) -> Result<(), CoreError> {
    if file.bytes.is_empty() {
        return Err(CoreError::Upload(format!("File '{}' is empty", file.file_name)));
    }
    if file.bytes.len() > MAX_UPLOAD_BYTES {
        return Err(CoreError::Upload(format!(
            "File '{}' exceeds the {MAX_UPLOAD_BYTES} byte limit",
            file.file_name
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Local filesystem backend
// ---------------------------------------------------------------------------

/// Writes objects under `root/{bucket}/{path}` and serves them from
/// `public_base_url/{bucket}/{path}`.
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!("{}/{}/{path}", self.public_base_url, bucket.name())
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        file: &UploadFile,
    ) -> Result<String, CoreError> {
        check_upload_size(file)?;
        if path.split('/').any(|seg| seg.is_empty() || seg == "..") {
            return Err(CoreError::Upload(format!("Invalid object path '{path}'")));
        }

        let target = self.root.join(bucket.name()).join(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CoreError::Upload(format!("Cannot create directory: {e}")))?;
        }

        // create_new refuses to clobber an existing object.
        let handle = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await
            .map_err(|e| CoreError::Upload(format!("Cannot create object '{path}': {e}")))?;
        write_or_remove(&target, handle, &file.bytes)
            .await
            .map_err(|e| CoreError::Upload(format!("Cannot write object '{path}': {e}")))?;

        tracing::debug!(bucket = bucket.name(), %path, bytes = file.bytes.len(), "Object stored");
        Ok(self.public_url(bucket, path))
    }
}

/// Write `bytes` through `writer`, deleting `target` if the write fails so
/// a retry is not blocked by a truncated object.
async fn write_or_remove<W>(target: &Path, mut writer: W, bytes: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut written = writer.write_all(bytes).await;
    if written.is_ok() {
        written = writer.flush().await;
    }
    if written.is_err() {
        drop(writer);
        if let Err(e) = tokio::fs::remove_file(target).await {
            tracing::warn!(path = %target.display(), error = %e, "Failed to remove partial object");
        }
    }
    written
}

// ---------------------------------------------------------------------------
// In-memory backend
// ---------------------------------------------------------------------------

/// Keeps uploaded objects in memory. Used in mock mode and tests.
pub struct InMemoryObjectStorage {
    public_base_url: String,
    objects: RwLock<HashMap<(Bucket, String), Vec<u8>>>,
}

impl InMemoryObjectStorage {
    pub fn new(public_base_url: impl Into<String>) -> Self {
        Self {
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    pub async fn object_count(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn get(&self, bucket: Bucket, path: &str) -> Option<Vec<u8>> {
        self.objects
            .read()
            .await
            .get(&(bucket, path.to_string()))
            .cloned()
    }
}

impl Default for InMemoryObjectStorage {
    fn default() -> Self {
        Self::new("memory://objects")
    }
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        file: &UploadFile,
    ) -> Result<String, CoreError> {
        check_upload_size(file)?;
        let mut objects = self.objects.write().await;
        let key = (bucket, path.to_string());
        if objects.contains_key(&key) {
            return Err(CoreError::Upload(format!(
                "Object '{path}' already exists in bucket '{}'",
                bucket.name()
            )));
        }
        objects.insert(key, file.bytes.clone());
        Ok(format!("{}/{}/{path}", self.public_base_url, bucket.name()))
    }
}
