use std::path::PathBuf;

use axum::body::{Body, Bytes};
use axum::extract::{Multipart, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio_util::io::ReaderStream;
use webfm_core::{
    copy_file, delete_file, make_directory, read_text_file, rename_path, set_permissions,
    upload_destination, write_text_file, CoreError,
};

use super::{blocking, resolve_path};
use crate::dto::{ChmodRequest, MessageResponse, PathRequest, SourceDestRequest, TextFileBody};
use crate::error::AppError;
use crate::session::SessionId;
use crate::state::AppState;

/// Multipart upload: an optional `dest` text field and one or more `files`
/// parts. Without `dest`, files land in the session's current folder.
pub async fn upload(
    session: SessionId,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MessageResponse>, AppError> {
    let mut dest: Option<String> = None;
    let mut files: Vec<(String, Bytes)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("malformed upload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "dest" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("malformed upload: {e}")))?;
                dest = Some(text);
            }
            "files" => {
                let Some(file_name) = field.file_name().map(str::to_owned) else {
                    continue;
                };
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("malformed upload: {e}")))?;
                files.push((file_name, data));
            }
            _ => {}
        }
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("no files in upload".to_string()));
    }

    let dest_dir = match dest.filter(|d| !d.trim().is_empty()) {
        Some(d) => resolve_path(&state, &session, &d),
        None => state.sessions.location(session.as_str()).resolve().as_path().to_path_buf(),
    };

    let count = files.len();
    for (file_name, data) in files {
        let target =
            upload_destination(&dest_dir, &file_name).map_err(|e| AppError::op("upload failed", e))?;
        tokio::fs::write(&target, &data)
            .await
            .map_err(|e| AppError::op("upload failed", CoreError::from_io(&target, e)))?;
        tracing::info!("uploaded {} ({} bytes)", target.display(), data.len());
    }

    Ok(Json(MessageResponse::ok(format!("{count} file(s) uploaded."))))
}

pub async fn download(
    session: SessionId,
    State(state): State<AppState>,
    Query(query): Query<PathRequest>,
) -> Result<Response, AppError> {
    let path = resolve_path(&state, &session, &query.path);

    let metadata = tokio::fs::metadata(&path)
        .await
        .map_err(|e| AppError::op("download failed", CoreError::from_io(&path, e)))?;
    if metadata.is_dir() {
        return Err(AppError::op("download failed", CoreError::NotAFile(path)));
    }

    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|e| AppError::op("download failed", CoreError::from_io(&path, e)))?;

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().replace('"', "_"))
        .unwrap_or_else(|| "download".to_string());

    let body = Body::from_stream(ReaderStream::new(file));

    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CONTENT_LENGTH, metadata.len().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response())
}

pub async fn mkdir(
    session: SessionId,
    State(state): State<AppState>,
    Json(req): Json<PathRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let path = resolve_path(&state, &session, &req.path);
    blocking(move || {
        make_directory(&path).map_err(|e| AppError::op("failed to create folder", e))
    })
    .await?;
    Ok(Json(MessageResponse::ok("Folder created.")))
}

pub async fn copy(
    session: SessionId,
    State(state): State<AppState>,
    Json(req): Json<SourceDestRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let source = resolve_path(&state, &session, &req.source);
    let dest = resolve_path(&state, &session, &req.dest);
    let written = blocking(move || {
        copy_file(&source, &dest).map_err(|e| AppError::op("failed to copy file", e))
    })
    .await?;
    Ok(Json(MessageResponse::ok(format!(
        "Copied to {}.",
        written.display()
    ))))
}

pub async fn rename(
    session: SessionId,
    State(state): State<AppState>,
    Json(req): Json<SourceDestRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let source = resolve_path(&state, &session, &req.source);
    let dest = resolve_path(&state, &session, &req.dest);
    blocking(move || rename_path(&source, &dest).map_err(|e| AppError::op("failed to rename", e)))
        .await?;
    Ok(Json(MessageResponse::ok("Renamed.")))
}

pub async fn delete(
    session: SessionId,
    State(state): State<AppState>,
    Json(req): Json<PathRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let path = resolve_path(&state, &session, &req.path);
    blocking(move || delete_file(&path).map_err(|e| AppError::op("failed to delete file", e)))
        .await?;
    Ok(Json(MessageResponse::ok("File deleted.")))
}

pub async fn chmod(
    session: SessionId,
    State(state): State<AppState>,
    Json(req): Json<ChmodRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let path = resolve_path(&state, &session, &req.path);
    let mode = req.mode;
    blocking(move || {
        set_permissions(&path, &mode).map_err(|e| AppError::op("failed to change permissions", e))
    })
    .await?;
    Ok(Json(MessageResponse::ok("Permissions changed.")))
}

pub async fn read_text(
    session: SessionId,
    State(state): State<AppState>,
    Query(query): Query<PathRequest>,
) -> Result<Response, AppError> {
    let path: PathBuf = resolve_path(&state, &session, &query.path);
    let content = blocking(move || {
        read_text_file(&path).map_err(|e| AppError::op("failed to read file", e))
    })
    .await?;
    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        content,
    )
        .into_response())
}

pub async fn write_text(
    session: SessionId,
    State(state): State<AppState>,
    Json(req): Json<TextFileBody>,
) -> Result<Json<MessageResponse>, AppError> {
    let path = resolve_path(&state, &session, &req.path);
    let content = req.content;
    blocking(move || {
        write_text_file(&path, &content).map_err(|e| AppError::op("failed to save file", e))
    })
    .await?;
    Ok(Json(MessageResponse::ok("File saved.")))
}
