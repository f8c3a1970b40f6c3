use axum::{extract::State, response::Html, routing::get, Router};
use std::sync::Arc;

use crate::error::AppError;
use crate::middleware::CurrentSession;
use crate::models::TrainInfo;
use crate::{views, AppState};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/dashboard", get(dashboard))
}

// GET /dashboard - open to everyone, like the timetable board
async fn dashboard(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
) -> Result<Html<String>, AppError> {
    let trains = TrainInfo::all(&state.db).await?;
    let flashes = super::take_flashes(&state, &session).await;
    Ok(Html(views::dashboard_page(&trains, &flashes)?))
}
