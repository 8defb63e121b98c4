use axum::extract::State;
use axum::Json;
use webfm_core::{copy_batch, search, CopyPolicy, SearchMode};

use super::{blocking, resolve_path};
use crate::dto::{BatchCopyRequest, BatchCopyResponse, SearchRequest, SearchResponse};
use crate::error::AppError;
use crate::session::SessionId;
use crate::state::AppState;

/// Collects candidate paths for a batch copy.
pub async fn find(
    session: SessionId,
    State(state): State<AppState>,
    Json(req): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let mode: SearchMode = req
        .mode
        .parse()
        .map_err(|e| AppError::op("search failed", e))?;

    let folder = match req.folder.as_deref().filter(|f| !f.trim().is_empty()) {
        Some(folder) => resolve_path(&state, &session, folder),
        None => state
            .sessions
            .location(session.as_str())
            .resolve()
            .as_path()
            .to_path_buf(),
    };

    let text = req.text;
    let result = blocking(move || {
        search(&folder, &text, mode).map_err(|e| AppError::op("search failed", e))
    })
    .await?;

    Ok(Json(SearchResponse {
        text: result.to_text(),
        paths: result
            .into_paths()
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect(),
    }))
}

pub async fn batch_copy(
    session: SessionId,
    State(state): State<AppState>,
    Json(req): Json<BatchCopyRequest>,
) -> Result<Json<BatchCopyResponse>, AppError> {
    let policy: CopyPolicy = req
        .policy
        .parse()
        .map_err(|e| AppError::op("batch copy failed", e))?;
    let paths: Vec<_> = req
        .paths
        .into_paths()
        .iter()
        .map(|p| resolve_path(&state, &session, &p.to_string_lossy()))
        .collect();
    let destination = resolve_path(&state, &session, &req.destination);

    let result = blocking(move || {
        copy_batch(&paths, &destination, policy).map_err(|e| AppError::op("batch copy failed", e))
    })
    .await?;

    Ok(Json(BatchCopyResponse {
        success: true,
        copied: result.copied,
        message: format!("{} file(s) copied.", result.copied),
    }))
}
