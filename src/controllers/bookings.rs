use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    routing::post,
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::error::AppError;
use crate::middleware::CurrentSession;
use crate::models::{SeatStatus, TrainInfo};
use crate::{views, AppState};

pub const NO_SESSION: &str = "세션 정보가 없습니다.";
pub const NO_SEAT_SELECTED: &str = "좌석을 선택하세요.";
pub const ALREADY_RESERVED: &str = "이미 예약된 좌석입니다.";
pub const UNKNOWN_SEAT: &str = "존재하지 않는 좌석입니다.";
pub const TRAIN_NOT_FOUND: &str = "선택된 열차 정보를 찾을 수 없습니다.";
pub const INCOMPLETE_BOOKING: &str = "예매 정보가 부족합니다.";
pub const BOOKING_FAILED: &str = "예매 처리 중 오류가 발생했습니다.";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/confirm", post(confirm_seat))
        .route("/book", post(finalize_booking))
}

/* ---------- helpers ---------- */

fn seat_page_url(train_id: &str) -> String {
    format!("/train/{}/seats", train_id)
}

pub fn booked_message(seat_id: &str) -> String {
    format!("{} 좌석 예매가 완료되었습니다.", seat_id)
}

/// Body posted by the seat page and the confirmation page.
#[derive(Debug, Deserialize)]
pub struct SeatForm {
    #[serde(default)]
    pub seat_id: String,
}

/* ---------- CONFIRM ---------- */

// POST /confirm - the seat picker lands here right after a click
async fn confirm_seat(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    Form(form): Form<SeatForm>,
) -> Result<Response, AppError> {
    let (Some(_user), Some(train_id)) = (session.user_id(), session.train_id()) else {
        super::flash(&state, &session, NO_SESSION).await;
        return Ok(Redirect::to("/dashboard").into_response());
    };
    let train_id = train_id.to_string();

    if form.seat_id.is_empty() {
        super::flash(&state, &session, NO_SEAT_SELECTED).await;
        return Ok(Redirect::to(&seat_page_url(&train_id)).into_response());
    }

    match SeatStatus::find(&train_id, &form.seat_id, &state.db).await? {
        Some(seat) if seat.reserved_by.is_some() => {
            super::flash(&state, &session, ALREADY_RESERVED).await;
            return Ok(Redirect::to(&seat_page_url(&train_id)).into_response());
        }
        Some(_) => {}
        None => {
            super::flash(&state, &session, UNKNOWN_SEAT).await;
            return Ok(Redirect::to(&seat_page_url(&train_id)).into_response());
        }
    }

    let Some(train) = TrainInfo::find(&train_id, &state.db).await? else {
        super::flash(&state, &session, TRAIN_NOT_FOUND).await;
        return Ok(Redirect::to("/dashboard").into_response());
    };

    Ok(Html(views::confirm_page(&form.seat_id, &train)?).into_response())
}

/* ---------- BOOK ---------- */

// POST /book
async fn finalize_booking(
    State(state): State<Arc<AppState>>,
    session: CurrentSession,
    Form(form): Form<SeatForm>,
) -> Result<Response, AppError> {
    let (Some(user_id), Some(train_id)) = (session.user_id(), session.train_id()) else {
        super::flash(&state, &session, INCOMPLETE_BOOKING).await;
        return Ok(Redirect::to("/dashboard").into_response());
    };
    if form.seat_id.is_empty() {
        super::flash(&state, &session, INCOMPLETE_BOOKING).await;
        return Ok(Redirect::to("/dashboard").into_response());
    }

    let message = match SeatStatus::reserve(train_id, &form.seat_id, user_id, &state.db).await {
        Ok(true) => {
            state.cache.invalidate_seats(train_id).await;
            tracing::info!("{} booked seat {} on {}", user_id, form.seat_id, train_id);
            booked_message(&form.seat_id)
        }
        Ok(false) => ALREADY_RESERVED.to_string(),
        Err(e) => {
            tracing::error!("finalize_booking sql error: {:?}", e);
            BOOKING_FAILED.to_string()
        }
    };

    super::flash(&state, &session, &message).await;
    Ok(Redirect::to("/dashboard").into_response())
}
