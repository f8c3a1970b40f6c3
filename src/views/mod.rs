//! Server-rendered pages.
//!
//! Pages are handlebars templates under `views/templates/`, compiled once and
//! HTML-escaped on render. The seat page follows the DOM contract the seat
//! picker binds to: seats as `.seat` elements with `data-seat`, free ones
//! also `.available`, and the `#confirm-form` holding `#seat-input` and
//! `#selected-seat`.

use std::sync::LazyLock;

use handlebars::{Handlebars, RenderError};
use serde_json::{json, Value};

use crate::models::{seat::seat_rows, Fares, SeatStatus, TrainInfo};
use crate::picker::{
    FORM_ID, SEAT_CLASS, SEAT_DATA_ATTR, SEAT_FIELD, SEAT_INPUT_ID, STATUS_ID,
};

const TEMPLATES: [(&str, &str); 6] = [
    ("layout", include_str!("templates/layout.hbs")),
    ("login", include_str!("templates/login.hbs")),
    ("register", include_str!("templates/register.hbs")),
    ("dashboard", include_str!("templates/dashboard.hbs")),
    ("seats", include_str!("templates/seats.hbs")),
    ("confirm", include_str!("templates/confirm.hbs")),
];

static PAGES: LazyLock<Handlebars<'static>> = LazyLock::new(|| {
    let mut registry = Handlebars::new();
    for (name, source) in TEMPLATES {
        // A broken template surfaces as a render error on its page.
        if let Err(e) = registry.register_template_string(name, source) {
            tracing::error!("template {} failed to compile: {}", name, e);
        }
    }
    registry
});

fn layout(
    title: &str,
    show_header: bool,
    flashes: &[String],
    body: String,
) -> Result<String, RenderError> {
    PAGES.render(
        "layout",
        &json!({
            "title": title,
            "show_header": show_header,
            "flashes": flashes,
            "body": body,
        }),
    )
}

fn page(
    template: &str,
    data: &Value,
    title: &str,
    show_header: bool,
    flashes: &[String],
) -> Result<String, RenderError> {
    let body = PAGES.render(template, data)?;
    layout(title, show_header, flashes, body)
}

pub fn login_page(error: Option<&str>) -> Result<String, RenderError> {
    page("login", &json!({ "error": error }), "로그인", false, &[])
}

pub fn register_page(error: Option<&str>, success: Option<&str>) -> Result<String, RenderError> {
    page(
        "register",
        &json!({ "error": error, "success": success }),
        "회원가입",
        false,
        &[],
    )
}

pub fn dashboard_page(trains: &[TrainInfo], flashes: &[String]) -> Result<String, RenderError> {
    let rows: Vec<Value> = trains
        .iter()
        .map(|train| {
            let kind = train.kind();
            json!({
                "kind": kind.label(),
                "train_no": train.train_no,
                "dep_station": train.dep_station,
                "arr_station": train.arr_station,
                "departure_time": train.departure_time.as_deref().unwrap_or("-"),
                "arrival_time": train.arrival_time.as_deref().unwrap_or("-"),
                "total_seats": train.total_seats,
                "stops": kind.stops().join(" → "),
            })
        })
        .collect();
    page("dashboard", &json!({ "trains": rows }), "열차 목록", true, flashes)
}

pub struct SeatPageView<'a> {
    pub train_id: &'a str,
    pub seats: &'a [SeatStatus],
    pub me: &'a str,
    pub fares: Fares,
    pub flashes: &'a [String],
}

pub fn seat_page(view: &SeatPageView<'_>) -> Result<String, RenderError> {
    let rows: Vec<Value> = seat_rows(view.seats)
        .into_iter()
        .map(|(row, seats)| {
            let seats: Vec<Value> = seats
                .into_iter()
                .map(|seat| {
                    json!({
                        "id": seat.seat_id,
                        "class": format!("{} {}", SEAT_CLASS, seat.state_for(view.me).css_class()),
                    })
                })
                .collect();
            json!({ "row": row, "seats": seats })
        })
        .collect();

    let data = json!({
        "train_id": view.train_id,
        "fares": view.fares,
        "rows": rows,
        "seat_attr": SEAT_DATA_ATTR,
        "form_id": FORM_ID,
        "input_id": SEAT_INPUT_ID,
        "field": SEAT_FIELD,
        "status_id": STATUS_ID,
    });
    page("seats", &data, "좌석 선택", true, view.flashes)
}

pub fn confirm_page(seat_id: &str, train: &TrainInfo) -> Result<String, RenderError> {
    let data = json!({
        "train": train,
        "departure": train.departure_time.as_deref().unwrap_or("-"),
        "arrival": train.arrival_time.as_deref().unwrap_or("-"),
        "seat_id": seat_id,
        "field": SEAT_FIELD,
    });
    page("confirm", &data, "예매 확인", true, &[])
}
