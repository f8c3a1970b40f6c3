//! In-memory seat page built from server-rendered HTML.
//!
//! Mirrors the browser rules the picker relies on: listeners run in
//! registration order, a programmatic `submit()` skips submit listeners and a
//! user-initiated submit runs them first and may be cancelled.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use scraper::{Html, Selector};
use tracing::debug;

use super::dom::{ClickHandler, Dialogs, SeatDom, SubmitEvent, SubmitHandler};
use super::{
    PickerError, AVAILABLE_CLASS, FORM_ID, SEAT_CLASS, SEAT_DATA_ATTR, SEAT_INPUT_ID, STATUS_ID,
};

type SharedClick = Rc<RefCell<ClickHandler>>;
type SharedSubmit = Rc<RefCell<SubmitHandler>>;

/// What caused a form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    /// `form.submit()` from script.
    Programmatic,
    /// Submit button or Enter key.
    User,
}

/// A request the page sent to the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSubmission {
    pub method: String,
    pub action: String,
    pub fields: Vec<(String, String)>,
    pub trigger: SubmitTrigger,
}

impl FormSubmission {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// `application/x-www-form-urlencoded` body.
    pub fn encoded_body(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(&self.fields)
    }
}

/// Index of a seat element on a [`MemoryPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemorySeat(usize);

struct SeatNode {
    id: Option<String>,
    available: bool,
    listeners: Vec<SharedClick>,
}

struct FormField {
    id: Option<String>,
    name: String,
    value: String,
}

struct PageState {
    seats: Vec<SeatNode>,
    action: String,
    method: String,
    fields: Vec<FormField>,
    seat_input: usize,
    status_text: String,
    submit_listeners: Vec<SharedSubmit>,
    submissions: Vec<FormSubmission>,
    alerts: Vec<String>,
    prompts: Vec<String>,
    confirm_answers: VecDeque<bool>,
}

#[derive(Clone)]
pub struct MemoryPage {
    state: Rc<RefCell<PageState>>,
}

fn selector(css: &str) -> Result<Selector, PickerError> {
    Selector::parse(css).map_err(|_| PickerError::Selector(css.to_string()))
}

impl MemoryPage {
    /// Locates the seats, `#confirm-form`, its `#seat-input` field and
    /// `#selected-seat`. The seat input only counts when it is a named
    /// input inside the form, since otherwise it would never be submitted.
    pub fn from_html(source: &str) -> Result<Self, PickerError> {
        let html = Html::parse_document(source);

        let seats = html
            .select(&selector(&format!(".{SEAT_CLASS}"))?)
            .map(|el| SeatNode {
                id: el.value().attr(SEAT_DATA_ATTR).map(str::to_string),
                available: el.value().classes().any(|class| class == AVAILABLE_CLASS),
                listeners: Vec::new(),
            })
            .collect();

        let form = html
            .select(&selector(&format!("#{FORM_ID}"))?)
            .next()
            .ok_or(PickerError::MissingElement(FORM_ID))?;
        let status = html
            .select(&selector(&format!("#{STATUS_ID}"))?)
            .next()
            .ok_or(PickerError::MissingElement(STATUS_ID))?;

        let fields: Vec<FormField> = form
            .select(&selector("input[name]")?)
            .map(|el| FormField {
                id: el.value().id().map(str::to_string),
                name: el.value().attr("name").unwrap_or_default().to_string(),
                value: el.value().attr("value").unwrap_or_default().to_string(),
            })
            .collect();
        let seat_input = fields
            .iter()
            .position(|field| field.id.as_deref() == Some(SEAT_INPUT_ID))
            .ok_or(PickerError::MissingElement(SEAT_INPUT_ID))?;

        let state = PageState {
            seats,
            action: form.value().attr("action").unwrap_or_default().to_string(),
            method: form
                .value()
                .attr("method")
                .unwrap_or("get")
                .to_ascii_lowercase(),
            fields,
            seat_input,
            status_text: status.text().collect::<String>().trim().to_string(),
            submit_listeners: Vec::new(),
            submissions: Vec::new(),
            alerts: Vec::new(),
            prompts: Vec::new(),
            confirm_answers: VecDeque::new(),
        };
        Ok(Self {
            state: Rc::new(RefCell::new(state)),
        })
    }

    /// Simulates a user click on the first seat element with this id.
    /// Returns how many listeners ran.
    pub fn click(&self, seat_id: &str) -> usize {
        let position = self
            .state
            .borrow()
            .seats
            .iter()
            .position(|seat| seat.id.as_deref() == Some(seat_id));
        position.map_or(0, |index| self.click_at(index))
    }

    /// Simulates a user click on the seat element at `index` in page order,
    /// whether or not it carries an id.
    pub fn click_at(&self, index: usize) -> usize {
        let listeners = self
            .state
            .borrow()
            .seats
            .get(index)
            .map(|seat| seat.listeners.clone())
            .unwrap_or_default();
        for listener in &listeners {
            (*listener.borrow_mut())();
        }
        listeners.len()
    }

    /// Simulates pressing the form's submit button. Returns whether the
    /// request was sent.
    pub fn press_submit(&self) -> bool {
        let listeners = self.state.borrow().submit_listeners.clone();
        let mut event = SubmitEvent::new();
        for listener in &listeners {
            (*listener.borrow_mut())(&mut event);
        }
        if event.default_prevented() {
            debug!("submission cancelled by a submit listener");
            return false;
        }
        self.record_submission(SubmitTrigger::User);
        true
    }

    /// Queues answers for upcoming confirm prompts. Without a queued answer
    /// the prompt counts as dismissed.
    pub fn answer_confirms(&self, answers: impl IntoIterator<Item = bool>) {
        self.state.borrow_mut().confirm_answers.extend(answers);
    }

    pub fn submissions(&self) -> Vec<FormSubmission> {
        self.state.borrow().submissions.clone()
    }

    pub fn alerts(&self) -> Vec<String> {
        self.state.borrow().alerts.clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.state.borrow().prompts.clone()
    }

    /// Ids of every seat element, available or not, in page order.
    pub fn seat_ids(&self) -> Vec<String> {
        self.state
            .borrow()
            .seats
            .iter()
            .filter_map(|seat| seat.id.clone())
            .collect()
    }

    pub fn form_action(&self) -> String {
        self.state.borrow().action.clone()
    }

    pub fn form_method(&self) -> String {
        self.state.borrow().method.clone()
    }

    fn record_submission(&self, trigger: SubmitTrigger) {
        let mut state = self.state.borrow_mut();
        let submission = FormSubmission {
            method: state.method.clone(),
            action: state.action.clone(),
            fields: state
                .fields
                .iter()
                .map(|field| (field.name.clone(), field.value.clone()))
                .collect(),
            trigger,
        };
        debug!(action = %submission.action, ?trigger, "form submitted");
        state.submissions.push(submission);
    }
}

impl Dialogs for MemoryPage {
    fn alert(&self, message: &str) {
        self.state.borrow_mut().alerts.push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        let mut state = self.state.borrow_mut();
        state.prompts.push(message.to_string());
        state.confirm_answers.pop_front().unwrap_or(false)
    }
}

impl SeatDom for MemoryPage {
    type Seat = MemorySeat;

    fn available_seats(&self) -> Vec<MemorySeat> {
        self.state
            .borrow()
            .seats
            .iter()
            .enumerate()
            .filter(|(_, seat)| seat.available)
            .map(|(index, _)| MemorySeat(index))
            .collect()
    }

    fn seat_id(&self, seat: &MemorySeat) -> Option<String> {
        self.state
            .borrow()
            .seats
            .get(seat.0)
            .and_then(|node| node.id.clone())
    }

    fn on_seat_click(&self, seat: &MemorySeat, handler: ClickHandler) {
        if let Some(node) = self.state.borrow_mut().seats.get_mut(seat.0) {
            node.listeners.push(Rc::new(RefCell::new(handler)));
        }
    }

    fn on_form_submit(&self, handler: SubmitHandler) {
        self.state
            .borrow_mut()
            .submit_listeners
            .push(Rc::new(RefCell::new(handler)));
    }

    fn seat_input_value(&self) -> String {
        let state = self.state.borrow();
        state.fields[state.seat_input].value.clone()
    }

    fn set_seat_input_value(&self, value: &str) {
        let mut state = self.state.borrow_mut();
        let index = state.seat_input;
        state.fields[index].value = value.to_string();
    }

    fn status_text(&self) -> String {
        self.state.borrow().status_text.clone()
    }

    fn set_status_text(&self, text: &str) {
        self.state.borrow_mut().status_text = text.to_string();
    }

    fn submit_form(&self) {
        self.record_submission(SubmitTrigger::Programmatic);
    }
}
