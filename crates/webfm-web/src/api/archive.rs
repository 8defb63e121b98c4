use axum::extract::State;
use axum::Json;

use super::{blocking, resolve_path};
use crate::dto::{InflateRequest, MessageResponse, PathRequest, TarballRequest};
use crate::error::AppError;
use crate::session::SessionId;
use crate::state::AppState;

pub async fn tarball(
    session: SessionId,
    State(state): State<AppState>,
    Json(req): Json<TarballRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let folder = resolve_path(&state, &session, &req.folder);
    let archive_path = resolve_path(&state, &session, &req.archive);
    let archiver = state.archiver.clone();

    let message = format!("Created {}.", archive_path.display());
    blocking(move || {
        archiver
            .compress(&folder, &archive_path)
            .map_err(|e| AppError::op("failed to create archive", e))
    })
    .await?;
    Ok(Json(MessageResponse::ok(message)))
}

pub async fn inflate(
    session: SessionId,
    State(state): State<AppState>,
    Json(req): Json<InflateRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let archive_path = resolve_path(&state, &session, &req.archive);
    let target = req
        .target
        .filter(|t| !t.trim().is_empty())
        .map(|t| resolve_path(&state, &session, &t));
    let archiver = state.archiver.clone();

    let unpacked_into = blocking(move || {
        archiver
            .extract(&archive_path, target.as_deref())
            .map_err(|e| AppError::op("failed to extract archive", e))
    })
    .await?;
    Ok(Json(MessageResponse::ok(format!(
        "Extracted into {}.",
        unpacked_into.display()
    ))))
}

pub async fn remove_dir(
    session: SessionId,
    State(state): State<AppState>,
    Json(req): Json<PathRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let folder = resolve_path(&state, &session, &req.path);
    let archiver = state.archiver.clone();

    blocking(move || {
        archiver
            .remove_tree(&folder)
            .map_err(|e| AppError::op("failed to remove folder", e))
    })
    .await?;
    Ok(Json(MessageResponse::ok("Folder removed.")))
}
