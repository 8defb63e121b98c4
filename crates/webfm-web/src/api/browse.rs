use axum::extract::State;
use axum::Json;
use webfm_core::{list_directory, Location, Places};

use crate::dto::{DirectoryEntryDto, LocationResponse, MoveRequest, SetLocationRequest};
use crate::error::AppError;
use crate::session::SessionId;
use crate::state::AppState;

pub async fn show(
    session: SessionId,
    State(state): State<AppState>,
) -> Result<Json<LocationResponse>, AppError> {
    let location = state.sessions.location(session.as_str());
    render(&state, &session, location).await
}

pub async fn set_location(
    session: SessionId,
    State(state): State<AppState>,
    Json(req): Json<SetLocationRequest>,
) -> Result<Json<LocationResponse>, AppError> {
    render(&state, &session, Location::new(req.path)).await
}

pub async fn move_to(
    session: SessionId,
    State(state): State<AppState>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<LocationResponse>, AppError> {
    let current = state.sessions.location(session.as_str()).resolve();
    render(&state, &session, current.enter(&req.name)).await
}

/// Resolves `location`, stores it for the session and lists it.
async fn render(
    state: &AppState,
    session: &SessionId,
    location: Location,
) -> Result<Json<LocationResponse>, AppError> {
    let places_file = state.config.core.places.file.clone();

    let (location, entries, places) = super::blocking(move || {
        let location = location.resolve();
        let entries: Vec<DirectoryEntryDto> = list_directory(location.as_path())
            .iter()
            .map(DirectoryEntryDto::from)
            .collect();
        let places = Places::load(&places_file).unwrap_or_else(|e| {
            tracing::warn!("could not read places: {e}");
            Places::new()
        });
        Ok((location, entries, places))
    })
    .await?;

    state.sessions.set_location(session.as_str(), location.clone());

    Ok(Json(LocationResponse {
        place: location.as_str().to_string(),
        places: places.iter().map(str::to_owned).collect(),
        entries,
    }))
}
