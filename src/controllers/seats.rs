use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::debug;

use crate::error::AppError;
use crate::middleware::CurrentSession;
use crate::models::Fares;
use crate::views::{self, SeatPageView};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/train/{train_id}/seats", get(seat_page))
}

// GET /train/{train_id}/seats
async fn seat_page(
    State(state): State<Arc<AppState>>,
    Path(train_id): Path<String>,
    session: CurrentSession,
) -> Result<Response, AppError> {
    let (Some(token), Some(mut data)) = (session.token, session.data) else {
        return Ok(Redirect::to("/").into_response());
    };
    let Some(me) = data.user_id.clone() else {
        return Ok(Redirect::to("/").into_response());
    };

    // /confirm and /book work on the train whose map was opened last
    data.train_id = Some(train_id.clone());
    let flashes = data.take_flashes();
    state.cache.save_session(&token, &data).await?;

    let seats = state.cache.seat_statuses(&train_id).await?;
    debug!("Rendering {} seats of train {} for {}", seats.len(), train_id, me);

    let html = views::seat_page(&SeatPageView {
        train_id: &train_id,
        seats: &seats,
        me: &me,
        fares: Fares::from(&state.config.pricing),
        flashes: &flashes,
    })?;
    Ok(Html(html).into_response())
}
