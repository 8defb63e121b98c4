use axum::extract::State;
use axum::Json;
use webfm_core::Places;

use super::blocking;
use crate::dto::{MessageResponse, PlacesBody};
use crate::error::AppError;
use crate::state::AppState;

/// The raw, editable text of the places file.
pub async fn show(State(state): State<AppState>) -> Result<Json<PlacesBody>, AppError> {
    let file = state.config.core.places.file.clone();
    let places = blocking(move || {
        Places::load(&file).map_err(|e| AppError::op("failed to read places", e))
    })
    .await?;
    Ok(Json(PlacesBody {
        content: places.to_text(),
    }))
}

pub async fn update(
    State(state): State<AppState>,
    Json(body): Json<PlacesBody>,
) -> Result<Json<MessageResponse>, AppError> {
    let file = state.config.core.places.file.clone();
    let places = Places::from_text(&body.content);
    let count = places.len();
    blocking(move || places.save(&file).map_err(|e| AppError::op("failed to save places", e)))
        .await?;
    Ok(Json(MessageResponse::ok(format!("{count} place(s) saved."))))
}
