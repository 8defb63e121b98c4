mod archive;
mod batch;
mod browse;
mod exec;
mod files;
mod places;

use std::path::{Path, PathBuf};

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::error::AppError;
use crate::session::SessionId;
use crate::state::AppState;

pub fn router(max_body_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/location", get(browse::show).post(browse::set_location))
        .route("/move", post(browse::move_to))
        .route("/places", get(places::show).put(places::update))
        .route("/upload", post(files::upload))
        .route("/download", get(files::download))
        .route("/mkdir", post(files::mkdir))
        .route("/copy", post(files::copy))
        .route("/rename", post(files::rename))
        .route("/delete", post(files::delete))
        .route("/chmod", post(files::chmod))
        .route("/textfile", get(files::read_text).put(files::write_text))
        .route("/removedir", post(archive::remove_dir))
        .route("/tarball", post(archive::tarball))
        .route("/inflate", post(archive::inflate))
        .route("/search", post(batch::find))
        .route("/batch_copy", post(batch::batch_copy))
        .route("/exec", post(exec::run))
        .layer(DefaultBodyLimit::max(max_body_bytes))
}

/// Absolute paths are taken as-is; relative ones are joined onto the
/// session's current folder.
pub(crate) fn resolve_path(state: &AppState, session: &SessionId, raw: &str) -> PathBuf {
    let raw = raw.trim();
    if Path::new(raw).is_absolute() {
        return PathBuf::from(raw);
    }
    state
        .sessions
        .location(session.as_str())
        .as_path()
        .join(raw)
}

/// Runs filesystem work off the async runtime.
pub(crate) async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::Internal(format!("blocking task failed: {e}")))?
}
