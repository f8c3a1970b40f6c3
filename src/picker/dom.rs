//! The page surface the seat picker binds to.
//!
//! Implemented by the in-memory page behind the `test-support` feature and
//! by the `web-sys` page in the wasm build.

/// Boxed click listener. Runs on the UI thread only.
pub type ClickHandler = Box<dyn FnMut()>;

/// Boxed submit listener.
pub type SubmitHandler = Box<dyn FnMut(&mut SubmitEvent)>;

/// Browser-native blocking dialogs.
pub trait Dialogs {
    fn alert(&self, message: &str);

    /// Yes/no prompt. `true` when the user accepts.
    fn confirm(&self, message: &str) -> bool;
}

/// A submit event as seen by submit listeners.
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the submission.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Handle to a located seat page: the available seats, the booking form,
/// its hidden seat input and the status text node.
///
/// Handles are cheap to clone and every clone refers to the same page, so
/// listeners can capture one.
pub trait SeatDom: Dialogs + Clone + 'static {
    type Seat: Clone + 'static;

    /// Seats marked available at the time of the call.
    fn available_seats(&self) -> Vec<Self::Seat>;

    /// The `data-seat` value of a seat element.
    fn seat_id(&self, seat: &Self::Seat) -> Option<String>;

    fn on_seat_click(&self, seat: &Self::Seat, handler: ClickHandler);

    /// Registers a listener for user-initiated form submissions.
    fn on_form_submit(&self, handler: SubmitHandler);

    fn seat_input_value(&self) -> String;

    fn set_seat_input_value(&self, value: &str);

    fn status_text(&self) -> String;

    fn set_status_text(&self, text: &str);

    /// Programmatic submission. Like `HTMLFormElement.submit()`, submit
    /// listeners do not run.
    fn submit_form(&self);
}
