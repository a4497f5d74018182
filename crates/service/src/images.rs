//! Image inputs for products and services and the local store for uploads.

use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::ServiceError;

/// URL prefix under which stored uploads are served.
pub const PUBLIC_PREFIX: &str = "/uploads";

/// A file part received with a create/update request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Where an image field's new value comes from.
#[derive(Debug, Clone, Default)]
pub enum ImageSource {
    #[default]
    NoImage,
    Uploaded(UploadedFile),
    Url(String),
}

impl ImageSource {
    /// An uploaded file wins over a URL; empty parts count as absent.
    pub fn resolve(file: Option<UploadedFile>, url: Option<String>) -> Self {
        if let Some(f) = file.filter(|f| !f.bytes.is_empty() && !f.file_name.trim().is_empty()) {
            return ImageSource::Uploaded(f);
        }
        match url.map(|u| u.trim().to_string()) {
            Some(u) if !u.is_empty() => ImageSource::Url(u),
            _ => ImageSource::NoImage,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, ImageSource::NoImage)
    }
}

/// Writes uploads under a root directory with collision-free names.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Materialise an image source into the value stored on the row.
    /// `NoImage` yields `None`, so callers can keep the previous value.
    pub async fn store(&self, source: ImageSource) -> Result<Option<String>, ServiceError> {
        match source {
            ImageSource::NoImage => Ok(None),
            ImageSource::Url(u) => Ok(Some(u)),
            ImageSource::Uploaded(f) => self.save(&f).await.map(Some),
        }
    }

    pub async fn save(&self, file: &UploadedFile) -> Result<String, ServiceError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        let stored_name = format!("{}_{}", Uuid::new_v4().simple(), sanitize_file_name(&file.file_name));
        let path = self.root.join(&stored_name);
        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|e| ServiceError::Storage(e.to_string()))?;
        info!(file = %stored_name, bytes = file.bytes.len(), "upload_stored");
        Ok(format!("{PUBLIC_PREFIX}/{stored_name}"))
    }

    /// Best-effort removal of a file written by [`UploadStore::save`].
    pub async fn discard(&self, stored: &str) {
        let Some(name) = stored.strip_prefix(PUBLIC_PREFIX).map(|s| s.trim_start_matches('/')) else {
            return;
        };
        if name.is_empty() || name.contains('/') {
            return;
        }
        if let Err(e) = tokio::fs::remove_file(self.root.join(name)).await {
            warn!(file = %name, error = %e, "failed to discard upload");
        }
    }
}

/// Keep ASCII alphanumerics, dots, dashes and underscores; drop any directory part.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() { "upload".to_string() } else { cleaned }
}
