pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod seats;

use axum::Router;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::middleware::CurrentSession;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(auth::routes())
        .merge(dashboard::routes())
        .merge(seats::routes())
        .merge(bookings::routes())
}

/* ---------- flash helpers ---------- */

/// Queues a message for the next page. Dropped when there is no session.
async fn flash(state: &AppState, session: &CurrentSession, message: &str) {
    let (Some(token), Some(data)) = (&session.token, &session.data) else {
        debug!("no session, dropping flash: {}", message);
        return;
    };
    let mut data = data.clone();
    data.flash(message);
    if let Err(e) = state.cache.save_session(token, &data).await {
        warn!("failed to store flash message: {:?}", e);
    }
}

/// Pending messages for the page being rendered, cleared from the session.
async fn take_flashes(state: &AppState, session: &CurrentSession) -> Vec<String> {
    let (Some(token), Some(data)) = (&session.token, &session.data) else {
        return Vec::new();
    };
    if data.flashes.is_empty() {
        return Vec::new();
    }
    let mut data = data.clone();
    let flashes = data.take_flashes();
    if let Err(e) = state.cache.save_session(token, &data).await {
        warn!("failed to clear flash messages: {:?}", e);
    }
    flashes
}
