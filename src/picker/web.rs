//! Browser binding for the seat picker (wasm32 only).
//!
//! The module's start function waits for `DOMContentLoaded`, binds a
//! [`SeatPicker`] to the page and installs `window.confirmBooking` for the
//! confirmation page's `onsubmit="return confirmBooking()"`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, HtmlElement, HtmlFormElement, HtmlInputElement, Window};

use super::dom::{ClickHandler, Dialogs, SeatDom, SubmitEvent, SubmitHandler};
use super::{
    confirm_booking, PickerError, SeatPicker, AVAILABLE_CLASS, FORM_ID, SEAT_CLASS, SEAT_INPUT_ID,
    STATUS_ID,
};

#[derive(Clone)]
pub struct WebPage {
    window: Window,
    document: Document,
    form: HtmlFormElement,
    seat_input: HtmlInputElement,
    status: Element,
}

fn element_by_id<T: JsCast>(document: &Document, id: &'static str) -> Result<T, PickerError> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
        .ok_or(PickerError::MissingElement(id))
}

impl WebPage {
    pub fn locate(window: Window) -> Result<Self, PickerError> {
        let document = window
            .document()
            .ok_or(PickerError::MissingElement("document"))?;
        let form = element_by_id::<HtmlFormElement>(&document, FORM_ID)?;
        let seat_input = element_by_id::<HtmlInputElement>(&document, SEAT_INPUT_ID)?;
        let status = element_by_id::<Element>(&document, STATUS_ID)?;
        Ok(Self {
            window,
            document,
            form,
            seat_input,
            status,
        })
    }
}

impl Dialogs for Window {
    fn alert(&self, message: &str) {
        if let Err(e) = self.alert_with_message(message) {
            tracing::warn!("alert failed: {:?}", e);
        }
    }

    fn confirm(&self, message: &str) -> bool {
        self.confirm_with_message(message).unwrap_or(false)
    }
}

// `Window` has inherent `alert()`/`confirm()`, hence the qualified calls.
impl Dialogs for WebPage {
    fn alert(&self, message: &str) {
        Dialogs::alert(&self.window, message);
    }

    fn confirm(&self, message: &str) -> bool {
        Dialogs::confirm(&self.window, message)
    }
}

impl SeatDom for WebPage {
    type Seat = HtmlElement;

    fn available_seats(&self) -> Vec<HtmlElement> {
        let query = format!(".{SEAT_CLASS}.{AVAILABLE_CLASS}");
        let Ok(nodes) = self.document.query_selector_all(&query) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect()
    }

    fn seat_id(&self, seat: &HtmlElement) -> Option<String> {
        seat.dataset().get("seat")
    }

    fn on_seat_click(&self, seat: &HtmlElement, mut handler: ClickHandler) {
        let callback =
            Closure::wrap(Box::new(move |_event: Event| handler()) as Box<dyn FnMut(Event)>);
        if let Err(e) =
            seat.add_event_listener_with_callback("click", callback.as_ref().unchecked_ref())
        {
            tracing::warn!("failed to bind seat click: {:?}", e);
        }
        // Listeners live as long as the page.
        callback.forget();
    }

    fn on_form_submit(&self, mut handler: SubmitHandler) {
        let callback = Closure::wrap(Box::new(move |event: Event| {
            let mut submit = SubmitEvent::new();
            handler(&mut submit);
            if submit.default_prevented() {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(Event)>);
        if let Err(e) = self
            .form
            .add_event_listener_with_callback("submit", callback.as_ref().unchecked_ref())
        {
            tracing::warn!("failed to bind submit guard: {:?}", e);
        }
        callback.forget();
    }

    fn seat_input_value(&self) -> String {
        self.seat_input.value()
    }

    fn set_seat_input_value(&self, value: &str) {
        self.seat_input.set_value(value);
    }

    fn status_text(&self) -> String {
        self.status.text_content().unwrap_or_default()
    }

    fn set_status_text(&self, text: &str) {
        self.status.set_text_content(Some(text));
    }

    fn submit_form(&self) {
        if let Err(e) = self.form.submit() {
            tracing::error!("booking form submission failed: {:?}", e);
        }
    }
}

fn bind_page(window: &Window) {
    match WebPage::locate(window.clone()) {
        Ok(page) => {
            SeatPicker::attach(&page);
        }
        // Pages without a seat map still get confirmBooking.
        Err(e) => tracing::debug!("no seat picker on this page: {}", e),
    }
}

/// `window.confirmBooking()`.
#[wasm_bindgen(js_name = confirmBooking)]
pub fn confirm_booking_js() -> bool {
    web_sys::window().is_some_and(|window| confirm_booking(&window))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document"))?;

    let confirm = Closure::wrap(Box::new(confirm_booking_js) as Box<dyn Fn() -> bool>);
    js_sys::Reflect::set(&window, &"confirmBooking".into(), confirm.as_ref())?;
    confirm.forget();

    if document.ready_state() == "loading" {
        let ready_window = window.clone();
        let on_ready = Closure::wrap(Box::new(move |_event: Event| bind_page(&ready_window))
            as Box<dyn FnMut(Event)>);
        document.add_event_listener_with_callback(
            "DOMContentLoaded",
            on_ready.as_ref().unchecked_ref(),
        )?;
        on_ready.forget();
    } else {
        bind_page(&window);
    }
    Ok(())
}
