use crate::db_storage::NewDocument;
use crate::demo;
use crate::errors::AppError;
use crate::handlers::AppState;
use crate::models::Document;
use crate::user_context::UserContext;
use crate::validation::{is_allowed_upload_type, sanitize_file_name};
use axum::{
    extract::{multipart::Field, Multipart, State},
    Json,
};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Successive timestamps tried when a stored name is already taken.
const MAX_NAME_ATTEMPTS: i64 = 16;

/// POST /api/files
///
/// Stores the first file part of a multipart upload.
///
/// Flow:
/// 1. Check the MIME type against the allowlist and sanitize the file name.
/// 2. Make sure the caller has a company (placeholder if needed).
/// 3. Stream the part to a new `{upload_dir}/{unix_millis}-{name}`, enforcing the size limit.
/// 4. Record the document and a `file_uploaded` notification.
///
/// A partially written file is removed on any failure after step 3 starts.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    user: UserContext,
    mut multipart: Multipart,
) -> Result<Json<Document>, AppError> {
    let mut field = loop {
        match multipart.next_field().await? {
            Some(field) if field.file_name().is_some() => break field,
            Some(field) => {
                tracing::debug!("Skipping non-file multipart field {:?}", field.name());
            }
            None => return Err(AppError::BadRequest("No file uploaded".to_string())),
        }
    };

    let file_name = sanitize_file_name(field.file_name().unwrap_or_default())?;
    let mime_type = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    tracing::info!(
        "POST /files - user: {}, file: {}, type: {}",
        user.user_id,
        file_name,
        mime_type
    );

    if !is_allowed_upload_type(&mime_type) {
        tracing::warn!("Rejected upload {} with type {}", file_name, mime_type);
        return Err(AppError::BadRequest("Invalid file type".to_string()));
    }

    let storage = state.storage();
    let company = storage.company_for_user(&user).await?;

    let upload_dir = &state.config.upload_dir;
    tokio::fs::create_dir_all(upload_dir).await?;
    let (path, file) =
        create_upload_file(upload_dir, Utc::now().timestamp_millis(), &file_name).await?;

    let size = match stream_to_disk(&mut field, file, state.config.max_upload_bytes).await {
        Ok(0) => {
            discard(&path).await;
            return Err(AppError::BadRequest("File is empty".to_string()));
        }
        Ok(size) => size,
        Err(e) => {
            discard(&path).await;
            return Err(e);
        }
    };

    let new_doc = NewDocument {
        name: file_name,
        mime_type,
        size: i64::try_from(size)
            .map_err(|_| AppError::PayloadTooLarge("File too large".to_string()))?,
        path: path.to_string_lossy().into_owned(),
    };

    match storage.record_document(&user, company.id, &new_doc).await {
        Ok(document) => {
            tracing::info!(
                "Stored document {} ({} bytes) at {}",
                document.id,
                document.size,
                document.path
            );
            Ok(Json(document))
        }
        Err(e) => {
            discard(&path).await;
            Err(e)
        }
    }
}

/// GET /api/files
///
/// Newest first.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    user: UserContext,
) -> Result<Json<Vec<Document>>, AppError> {
    let documents = state.storage().list_documents(&user.user_id).await?;

    if documents.is_empty() && state.config.demo_fallbacks {
        return Ok(Json(demo::sample_documents(Utc::now())));
    }

    Ok(Json(documents))
}

/// Creates `{dir}/{millis}-{name}` exclusively, moving to the next millisecond
/// when another upload already holds the name. Existing files are never truncated.
async fn create_upload_file(
    dir: &Path,
    millis: i64,
    name: &str,
) -> Result<(PathBuf, File), AppError> {
    for attempt in 0..MAX_NAME_ATTEMPTS {
        let path = dir.join(format!("{}-{}", millis + attempt, name));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                tracing::debug!("Upload path {} taken, retrying", path.display());
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::InternalError(format!(
        "No free upload path for {} after {} attempts",
        name, MAX_NAME_ATTEMPTS
    )))
}

/// Copies the field body into `file`, failing once more than `max_bytes` arrive.
async fn stream_to_disk(
    field: &mut Field<'_>,
    mut file: File,
    max_bytes: u64,
) -> Result<u64, AppError> {
    let mut written: u64 = 0;

    while let Some(chunk) = field.chunk().await? {
        written += chunk.len() as u64;
        if written > max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File too large (max {} bytes)",
                max_bytes
            )));
        }
        file.write_all(&chunk).await?;
    }

    file.flush().await?;
    Ok(written)
}

async fn discard(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Failed to remove partial upload {}: {}", path.display(), e);
        }
    }
}
