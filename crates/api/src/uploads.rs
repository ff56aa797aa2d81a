//! Local storage for uploaded product images.
//!
//! Files land in a flat directory (`UPLOAD_DIR`, default `uploads/`) that is
//! also served at `/uploads`. Names are `<unix-millis>-<8 hex>-<original>`,
//! with the original name reduced to a safe basename. Files are opened with
//! create-new semantics, so a name clash fails instead of overwriting.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use uuid::Uuid;

/// Fallback basename when the client sent no usable filename.
const DEFAULT_BASENAME: &str = "image";

/// Longest basename kept from the client's filename.
const MAX_BASENAME_LEN: usize = 100;

/// How many fresh names to try before giving up on a clash.
const MAX_NAME_ATTEMPTS: usize = 3;

/// Errors that can occur while storing an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Filesystem error.
    #[error("upload I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes uploaded images into a directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    /// Create a store rooted at `dir`. Does not touch the filesystem.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory files are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Io` if the directory cannot be created.
    pub async fn ensure_dir(&self) -> Result<(), UploadError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Write `bytes` under a freshly generated name and return that name.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Io` if the file cannot be created or written.
    pub async fn save(
        &self,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, UploadError> {
        let basename = sanitize_filename(original_name);

        let mut attempt = 0;
        loop {
            attempt += 1;
            let file_name = generate_file_name(&basename);
            let path = self.dir.join(&file_name);

            let file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == ErrorKind::AlreadyExists && attempt < MAX_NAME_ATTEMPTS => {
                    tracing::debug!(file_name = %file_name, "upload name clash, retrying");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            write_or_discard(file, &path, bytes).await?;

            tracing::debug!(file_name = %file_name, size = bytes.len(), "stored upload");
            return Ok(file_name);
        }
    }

    /// Delete a previously stored file, ignoring files that are already gone.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::Io` for any failure other than "not found".
    pub async fn remove(&self, file_name: &str) -> Result<(), UploadError> {
        match tokio::fs::remove_file(self.dir.join(file_name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write `bytes` to a freshly created file. The file is removed again if the
/// write fails.
async fn write_or_discard<W>(mut file: W, path: &Path, bytes: &[u8]) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        file.write_all(bytes).await?;
        file.flush().await
    }
    .await;

    if written.is_err() {
        drop(file);
        match tokio::fs::remove_file(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to remove partial upload"
                );
            }
        }
    }

    written
}

fn generate_file_name(basename: &str) -> String {
    let token = Uuid::new_v4().simple().to_string();
    let token = token.get(..8).unwrap_or(&token);
    format!("{}-{token}-{basename}", Utc::now().timestamp_millis())
}

/// Reduce a client-supplied filename to a safe basename.
///
/// Directory components are dropped and every character outside
/// `[A-Za-z0-9._-]` becomes `_`. Names that end up empty or made only of
/// dots fall back to `image`.
fn sanitize_filename(original: Option<&str>) -> String {
    let Some(original) = original else {
        return DEFAULT_BASENAME.to_string();
    };

    let basename = original
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .take(MAX_BASENAME_LEN)
        .collect();

    if cleaned.chars().all(|c| c == '.') {
        DEFAULT_BASENAME.to_string()
    } else {
        cleaned
    }
}
