//! # Upload Storage
//!
//! Writes item images under the uploads directory and reads them back by
//! stored name. Names come from [`bazaar_core::upload`]; this module only
//! does the file I/O.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bazaar_core::upload::{generate_upload_filename, is_safe_stored_name, random_token};
use chrono::Utc;
use tracing::{debug, info};

use crate::error::{WebError, WebResult};

/// A file received in a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Filename as sent by the client.
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// The uploads directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        UploadStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the directory if it doesn't exist.
    pub async fn ensure_dir(&self) -> WebResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Stores an upload under a freshly generated name and returns that name.
    pub async fn save(&self, file: &UploadedFile) -> WebResult<String> {
        let stored = generate_upload_filename(&file.filename, Utc::now(), &random_token());
        let path = self.dir.join(&stored);

        tokio::fs::write(&path, &file.bytes).await?;

        info!(original = %file.filename, stored = %stored, bytes = file.bytes.len(), "Upload stored");
        Ok(stored)
    }

    /// Reads a stored upload.
    ///
    /// ## Errors
    /// `WebError::NotFound` for names that are not a single plain path
    /// component and for files that don't exist.
    pub async fn read(&self, name: &str) -> WebResult<Vec<u8>> {
        if !is_safe_stored_name(name) {
            debug!(name, "Rejected upload name");
            return Err(WebError::NotFound);
        }

        match tokio::fs::read(self.dir.join(name)).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(WebError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}
