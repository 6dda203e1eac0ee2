//! Profile-picture upload storage
//!
//! Files land in a local upload directory with timestamped names. Only
//! image types on the allow-list are accepted, checked against both the
//! filename extension and the declared content type.

use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use alumconnect_core::UploadConfig;

use crate::error::AppError;

const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif"];
const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif"];

fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Check an incoming file against the image allow-list.
pub fn validate_image(file_name: &str, content_type: &str) -> Result<String, AppError> {
    let ext = extension_of(file_name).ok_or_else(|| {
        AppError::BadRequest("Only image files (jpeg, jpg, png, gif) are allowed".to_string())
    })?;

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str())
        || !ALLOWED_CONTENT_TYPES.contains(&content_type)
    {
        return Err(AppError::BadRequest(
            "Only image files (jpeg, jpg, png, gif) are allowed".to_string(),
        ));
    }

    Ok(ext)
}

/// Write image bytes to the upload directory under a timestamped name.
/// Returns the stored path relative to the serving root.
pub async fn save_image(
    config: &UploadConfig,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> Result<String, AppError> {
    let ext = validate_image(file_name, content_type)?;

    if data.len() > config.max_bytes {
        return Err(AppError::BadRequest(format!(
            "File too large, maximum is {} bytes",
            config.max_bytes
        )));
    }
    if data.is_empty() {
        return Err(AppError::BadRequest("Empty file".to_string()));
    }

    tokio::fs::create_dir_all(&config.dir)
        .await
        .map_err(|e| AppError::Internal(format!("Could not create upload directory: {}", e)))?;

    let stored_name = format!("{}-profilePicture.{}", Utc::now().timestamp_millis(), ext);
    let path = config.dir.join(&stored_name);

    tokio::fs::write(&path, data)
        .await
        .map_err(|e| AppError::Internal(format!("Could not store upload: {}", e)))?;

    info!("Stored upload {}", path.display());
    Ok(path.to_string_lossy().into_owned())
}

/// Remove a previously stored upload. A missing file is fine; any other
/// failure is logged but never surfaced to the client, the document update
/// has already happened.
pub async fn remove_upload(path: &str) {
    let path = PathBuf::from(path);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => info!("Removed upload {}", path.display()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Could not remove upload {}: {}", path.display(), e),
    }
}
