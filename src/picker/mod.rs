//! Seat selection on the seat map page.
//!
//! Clicking an available seat writes its id into the hidden `seat_id` input
//! and the status line, then posts the booking form straight to `/confirm`.
//! A submit guard blocks user-initiated submissions while no seat has been
//! picked.

pub mod dom;
#[cfg(feature = "test-support")]
pub mod memory;
#[cfg(target_arch = "wasm32")]
pub mod web;

use std::cell::RefCell;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, warn};

pub use dom::{Dialogs, SeatDom, SubmitEvent};
#[cfg(feature = "test-support")]
pub use memory::{FormSubmission, MemoryPage, SubmitTrigger};

/// Class list marking a seat element; available seats also carry `available`.
pub const SEAT_CLASS: &str = "seat";
pub const AVAILABLE_CLASS: &str = "available";
pub const SEAT_DATA_ATTR: &str = "data-seat";
pub const SEAT_INPUT_ID: &str = "seat-input";
pub const FORM_ID: &str = "confirm-form";
pub const STATUS_ID: &str = "selected-seat";
/// Form field carrying the seat id to the server.
pub const SEAT_FIELD: &str = "seat_id";

pub const STATUS_PREFIX: &str = "선택한 좌석: ";
pub const NO_SEAT_ALERT: &str = "좌석을 선택하세요.";
pub const CONFIRM_PROMPT: &str = "정말 예매하시겠습니까?";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PickerError {
    #[error("element #{0} not found on the page")]
    MissingElement(&'static str),
    #[error("invalid selector {0}")]
    Selector(String),
}

/// Status line shown after a click.
pub fn status_message(seat_id: &str) -> String {
    format!("{STATUS_PREFIX}{seat_id}")
}

/// Asks the user to confirm a booking. Other controls use the answer as
/// their go/no-go, e.g. `onsubmit="return confirmBooking()"`.
pub fn confirm_booking<D: Dialogs + ?Sized>(dialogs: &D) -> bool {
    dialogs.confirm(CONFIRM_PROMPT)
}

/// How the submit guard learns about clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GuardPolicy {
    /// The click handler records the seat before submitting, so a later
    /// user-initiated submit passes the guard.
    #[default]
    RecordClicks,
    /// Clicks never touch the selection: every user-initiated submit is
    /// blocked. The click path still submits because programmatic
    /// submission skips the guard.
    Literal,
}

/// The seat chosen on this page, shared between a picker and its listeners.
#[derive(Debug, Clone, Default)]
pub struct Selection(Rc<RefCell<Option<String>>>);

impl Selection {
    pub fn get(&self) -> Option<String> {
        self.0.borrow().clone()
    }

    pub fn set(&self, seat_id: &str) {
        *self.0.borrow_mut() = Some(seat_id.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_none()
    }
}

/// A picker bound to one page.
#[derive(Debug)]
pub struct SeatPicker {
    selection: Selection,
    bound_seats: Vec<String>,
    policy: GuardPolicy,
}

impl SeatPicker {
    /// Binds with [`GuardPolicy::RecordClicks`].
    pub fn attach<D: SeatDom>(dom: &D) -> Self {
        Self::attach_with(dom, GuardPolicy::default())
    }

    /// Wires a click listener on every seat currently marked available and
    /// the submit guard on the form. Seats made available later are not
    /// picked up.
    pub fn attach_with<D: SeatDom>(dom: &D, policy: GuardPolicy) -> Self {
        let selection = Selection::default();
        let mut bound_seats = Vec::new();

        for seat in dom.available_seats() {
            let Some(seat_id) = dom.seat_id(&seat) else {
                warn!("available seat without {SEAT_DATA_ATTR}, skipping");
                continue;
            };
            let page = dom.clone();
            let selection = selection.clone();
            let id = seat_id.clone();
            dom.on_seat_click(
                &seat,
                Box::new(move || {
                    if policy == GuardPolicy::RecordClicks {
                        selection.set(&id);
                    }
                    page.set_seat_input_value(&id);
                    page.set_status_text(&status_message(&id));
                    debug!(seat = %id, "seat picked, submitting booking form");
                    page.submit_form();
                }),
            );
            bound_seats.push(seat_id);
        }

        let page = dom.clone();
        let guard_selection = selection.clone();
        dom.on_form_submit(Box::new(move |event| {
            if guard_selection.is_empty() {
                event.prevent_default();
                page.alert(NO_SEAT_ALERT);
            }
        }));

        debug!(seats = bound_seats.len(), ?policy, "seat picker attached");
        Self {
            selection,
            bound_seats,
            policy,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Ids of the seats that received a click listener, in page order.
    pub fn bound_seats(&self) -> &[String] {
        &self.bound_seats
    }

    pub fn policy(&self) -> GuardPolicy {
        self.policy
    }
}

#[cfg(all(test, feature = "test-support"))]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <div class="seat available" data-seat="A1">A1</div>
        <div class="seat booked" data-seat="A2">A2</div>
        <form id="confirm-form" method="post" action="/confirm">
            <input type="hidden" id="seat-input" name="seat_id" value="">
            <p id="selected-seat"></p>
            <button type="submit">확인</button>
        </form>
    "#;

    #[test]
    fn status_message_embeds_seat_id() {
        assert_eq!(status_message("3C"), "선택한 좌석: 3C");
    }

    #[test]
    fn binds_only_available_seats() {
        let page = MemoryPage::from_html(PAGE).unwrap();
        let picker = SeatPicker::attach(&page);
        assert_eq!(picker.bound_seats(), ["A1".to_string()]);
    }

    #[test]
    fn record_clicks_sets_selection_before_submit() {
        let page = MemoryPage::from_html(PAGE).unwrap();
        let picker = SeatPicker::attach(&page);
        assert!(picker.selection().is_empty());

        page.click("A1");
        assert_eq!(picker.selection().get().as_deref(), Some("A1"));
    }

    // Literal mode: the click handler never updates the selection the guard
    // reads, so the guard refuses every user-initiated submit.
    #[test]
    fn literal_policy_leaves_selection_unset_after_click() {
        let page = MemoryPage::from_html(PAGE).unwrap();
        let picker = SeatPicker::attach_with(&page, GuardPolicy::Literal);

        page.click("A1");
        assert!(picker.selection().is_empty());
        assert_eq!(page.submissions().len(), 1);

        // A user-initiated submit after the click is still blocked.
        assert!(!page.press_submit());
        assert_eq!(page.alerts(), vec![NO_SEAT_ALERT.to_string()]);
    }

    #[test]
    fn record_clicks_lets_user_submit_after_click() {
        let page = MemoryPage::from_html(PAGE).unwrap();
        SeatPicker::attach(&page);

        page.click("A1");
        assert!(page.press_submit());
        assert!(page.alerts().is_empty());
        assert_eq!(page.submissions().len(), 2);
    }

    #[test]
    fn pickers_on_separate_pages_do_not_share_selection() {
        let first = MemoryPage::from_html(PAGE).unwrap();
        let second = MemoryPage::from_html(PAGE).unwrap();
        let a = SeatPicker::attach(&first);
        let b = SeatPicker::attach(&second);

        first.click("A1");
        assert!(!a.selection().is_empty());
        assert!(b.selection().is_empty());

        assert!(!second.press_submit());
        assert_eq!(second.alerts().len(), 1);
    }

    // Any dialog provider will do; no seat page is needed.
    struct Answer(bool);

    impl Dialogs for Answer {
        fn alert(&self, _message: &str) {}

        fn confirm(&self, message: &str) -> bool {
            assert_eq!(message, CONFIRM_PROMPT);
            self.0
        }
    }

    #[test]
    fn confirm_booking_needs_only_dialogs() {
        assert!(confirm_booking(&Answer(true)));
        assert!(!confirm_booking(&Answer(false)));
    }

    #[test]
    fn confirm_booking_returns_user_choice() {
        let page = MemoryPage::from_html(PAGE).unwrap();
        page.answer_confirms([true, false]);

        assert!(confirm_booking(&page));
        assert!(!confirm_booking(&page));
        assert_eq!(
            page.prompts(),
            vec![CONFIRM_PROMPT.to_string(), CONFIRM_PROMPT.to_string()]
        );
        assert!(page.alerts().is_empty());
        assert!(page.submissions().is_empty());
    }
}
