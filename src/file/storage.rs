//! Path-safe blob storage for Fileshelf.
//!
//! Blobs live in a sharded directory tree under a single root:
//! ```text
//! {root}/
//! ├── 3f/
//! │   └── 9a/
//! │       └── 3f9a12cd-5678-40ab-8def-123456789012-report.pdf
//! └── ...
//! ```
//! Every path handed to [`BlobStore::load`] or [`BlobStore::delete`] is
//! normalized and must stay below the root.

use std::io;
use std::path::{Component, Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{Result, ShelfError};

/// Name used when the caller supplies a blank one.
const FALLBACK_NAME: &str = "file";

/// Longest path component most filesystems accept, in bytes.
const NAME_MAX: usize = 255;

/// Bytes of the readable suffix left after `{uuid}-`.
const MAX_SUFFIX_BYTES: usize = NAME_MAX - 37;

/// Extensions longer than this are not worth preserving on truncation.
const MAX_KEPT_EXTENSION_BYTES: usize = 16;

/// Stores byte blobs under a root directory.
#[derive(Debug, Clone)]
pub struct BlobStore {
    /// Absolute, canonical root directory.
    root: PathBuf,
}

impl BlobStore {
    /// Open the store, creating the root directory (with parents) if missing.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        std::fs::create_dir_all(root)?;
        let root = root.canonicalize()?;
        debug!("Blob store rooted at {:?}", root);

        Ok(Self { root })
    }

    /// The absolute root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `content` to a fresh path and return that path relative to the root.
    ///
    /// The path is `{aa}/{bb}/{uuid}-{name}` where `aa` and `bb` are the first
    /// two pairs of hex digits of a new v4 UUID. Long names are shortened so
    /// the last component fits in `NAME_MAX` bytes.
    pub async fn store(&self, content: &[u8], suggested_name: &str) -> Result<String> {
        let name = fit_name(Self::sanitize_name(suggested_name)?);
        let uuid = Uuid::new_v4().to_string();
        let storage_path = format!("{}/{}/{}-{}", &uuid[..2], &uuid[2..4], uuid, name);

        let target = self.resolve(&storage_path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        // create_new: a path is never written twice
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await?;
        file.write_all(content).await?;
        file.flush().await?;

        debug!(storage_path = %storage_path, bytes = content.len(), "Stored blob");
        Ok(storage_path)
    }

    /// Read a blob.
    pub async fn load(&self, storage_path: &str) -> Result<Vec<u8>> {
        let path = self.resolve(storage_path)?;

        match fs::read(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ShelfError::NotFound(format!("blob {storage_path}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Delete a blob.
    ///
    /// Returns `false` if there was nothing to delete.
    pub async fn delete(&self, storage_path: &str) -> Result<bool> {
        let path = self.resolve(storage_path)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(storage_path = %storage_path, "Blob already absent");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether a blob exists.
    pub async fn exists(&self, storage_path: &str) -> Result<bool> {
        let path = self.resolve(storage_path)?;
        Ok(fs::try_exists(&path).await?)
    }

    /// Resolve a relative storage path to an absolute path under the root.
    ///
    /// The path is normalized lexically; absolute paths, `..` segments that
    /// climb above the root and NUL bytes are rejected with `InvalidPath`.
    pub fn resolve(&self, storage_path: &str) -> Result<PathBuf> {
        let invalid = || {
            warn!(storage_path = %storage_path, "Rejected storage path");
            ShelfError::InvalidPath(storage_path.to_string())
        };

        if storage_path.contains('\0') {
            return Err(invalid());
        }

        let mut normalized = PathBuf::new();
        for component in Path::new(storage_path).components() {
            match component {
                Component::Normal(part) => normalized.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !normalized.pop() {
                        return Err(invalid());
                    }
                }
                Component::RootDir | Component::Prefix(_) => return Err(invalid()),
            }
        }

        if normalized.as_os_str().is_empty() {
            return Err(invalid());
        }

        let resolved = self.root.join(normalized);
        if !resolved.starts_with(&self.root) {
            return Err(invalid());
        }

        Ok(resolved)
    }

    /// Check the suggested name is a single path segment.
    fn sanitize_name(suggested_name: &str) -> Result<&str> {
        let name = suggested_name.trim();
        if name.is_empty() {
            return Ok(FALLBACK_NAME);
        }
        if name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
            warn!(name = %suggested_name, "Rejected blob name");
            return Err(ShelfError::InvalidPath(suggested_name.to_string()));
        }
        Ok(name)
    }
}

/// Shorten `name` to at most `MAX_SUFFIX_BYTES`, cutting the stem on a char
/// boundary and keeping a short extension.
fn fit_name(name: &str) -> String {
    if name.len() <= MAX_SUFFIX_BYTES {
        return name.to_string();
    }

    let (stem, extension) = match name.rfind('.') {
        Some(dot) if dot > 0 && name.len() - dot <= MAX_KEPT_EXTENSION_BYTES => {
            name.split_at(dot)
        }
        _ => (name, ""),
    };

    let mut end = MAX_SUFFIX_BYTES - extension.len();
    while !stem.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}{}", &stem[..end], extension)
}
