use proptest::prelude::*;
use proptest::sample::Index;

use seat_booking::config::PricingConfig;
use seat_booking::models::{Fares, SeatStatus};
use seat_booking::picker::{
    confirm_booking, GuardPolicy, MemoryPage, SeatDom, SeatPicker, SubmitTrigger, CONFIRM_PROMPT,
    NO_SEAT_ALERT,
};
use seat_booking::views::{seat_page, SeatPageView};

const TWO_SEAT_PAGE: &str = r#"
<!DOCTYPE html>
<html><body>
  <div class="seat available" data-seat="A1">A1</div>
  <div class="seat booked" data-seat="A2">A2</div>
  <form id="confirm-form" method="post" action="/confirm">
    <input type="hidden" id="seat-input" name="seat_id" value="">
    <p id="selected-seat"></p>
    <button type="submit">예매 확인</button>
  </form>
</body></html>
"#;

fn rendered_page(seats: &[SeatStatus]) -> MemoryPage {
    let html = seat_page(&SeatPageView {
        train_id: "KTX301",
        seats,
        me: "kim",
        fares: Fares::from(&PricingConfig::default()),
        flashes: &[],
    })
    .unwrap();
    MemoryPage::from_html(&html).unwrap()
}

#[test]
fn clicking_available_seat_posts_it_to_confirm() {
    let page = MemoryPage::from_html(TWO_SEAT_PAGE).unwrap();
    SeatPicker::attach(&page);

    assert_eq!(page.click("A1"), 1);

    assert_eq!(page.seat_input_value(), "A1");
    assert_eq!(page.status_text(), "선택한 좌석: A1");
    let submissions = page.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].method, "post");
    assert_eq!(submissions[0].action, "/confirm");
    assert_eq!(submissions[0].trigger, SubmitTrigger::Programmatic);
    assert_eq!(submissions[0].encoded_body().unwrap(), "seat_id=A1");
    assert!(page.alerts().is_empty());
}

#[test]
fn booked_seat_is_not_wired() {
    let page = MemoryPage::from_html(TWO_SEAT_PAGE).unwrap();
    SeatPicker::attach(&page);

    assert_eq!(page.click("A2"), 0);
    assert_eq!(page.seat_input_value(), "");
    assert_eq!(page.status_text(), "");
    assert!(page.submissions().is_empty());
}

#[test]
fn available_seat_without_an_id_is_skipped() {
    let page = MemoryPage::from_html(
        r#"
        <div class="seat available">?</div>
        <form id="confirm-form" method="post" action="/confirm">
          <input type="hidden" id="seat-input" name="seat_id" value="">
          <p id="selected-seat"></p>
        </form>
        "#,
    )
    .unwrap();
    let picker = SeatPicker::attach(&page);

    assert!(picker.bound_seats().is_empty());
    assert_eq!(page.click_at(0), 0);
    assert!(page.submissions().is_empty());
    assert_eq!(page.seat_input_value(), "");
    assert_eq!(page.status_text(), "");
}

#[test]
fn submitting_without_a_seat_is_blocked_with_one_alert() {
    let page = MemoryPage::from_html(TWO_SEAT_PAGE).unwrap();
    SeatPicker::attach(&page);

    assert!(!page.press_submit());

    assert_eq!(page.alerts(), vec![NO_SEAT_ALERT.to_string()]);
    assert_eq!(page.seat_input_value(), "");
    assert!(page.submissions().is_empty());
}

#[test]
fn user_can_retry_after_the_alert() {
    let page = MemoryPage::from_html(TWO_SEAT_PAGE).unwrap();
    SeatPicker::attach(&page);

    assert!(!page.press_submit());
    page.click("A1");

    let submissions = page.submissions();
    assert_eq!(submissions.len(), 1);
    assert_eq!(submissions[0].field("seat_id"), Some("A1"));
}

// Discrepancy: under GuardPolicy::Literal clicks are never recorded for the
// submit guard, so any submit button press is refused. The default policy
// records the click.
#[test]
fn guard_discrepancy_between_policies_after_a_click() {
    let literal = MemoryPage::from_html(TWO_SEAT_PAGE).unwrap();
    SeatPicker::attach_with(&literal, GuardPolicy::Literal);
    literal.click("A1");
    assert!(!literal.press_submit());
    assert_eq!(literal.alerts(), vec![NO_SEAT_ALERT.to_string()]);

    let recording = MemoryPage::from_html(TWO_SEAT_PAGE).unwrap();
    SeatPicker::attach(&recording);
    recording.click("A1");
    assert!(recording.press_submit());
    assert!(recording.alerts().is_empty());

    // Both still send the click's own programmatic submission.
    assert_eq!(literal.submissions()[0].field("seat_id"), Some("A1"));
    assert_eq!(recording.submissions()[0].field("seat_id"), Some("A1"));
}

#[test]
fn confirm_booking_has_no_other_side_effects() {
    let page = MemoryPage::from_html(TWO_SEAT_PAGE).unwrap();
    SeatPicker::attach(&page);
    page.answer_confirms([true, false]);

    assert!(confirm_booking(&page));
    assert!(!confirm_booking(&page));

    assert_eq!(page.prompts(), vec![CONFIRM_PROMPT.to_string(); 2]);
    assert!(page.alerts().is_empty());
    assert!(page.submissions().is_empty());
    assert_eq!(page.seat_input_value(), "");
}

#[test]
fn server_rendered_seat_map_satisfies_the_picker() {
    let seats = vec![
        SeatStatus {
            seat_id: "1A".to_string(),
            reserved_by: None,
        },
        SeatStatus {
            seat_id: "1B".to_string(),
            reserved_by: Some("lee".to_string()),
        },
        SeatStatus {
            seat_id: "1C".to_string(),
            reserved_by: Some("kim".to_string()),
        },
    ];
    let page = rendered_page(&seats);
    let picker = SeatPicker::attach(&page);

    assert_eq!(page.seat_ids(), vec!["1A", "1B", "1C"]);
    assert_eq!(picker.bound_seats(), ["1A".to_string()]);
    assert_eq!(page.form_action(), "/confirm");
    assert_eq!(page.form_method(), "post");
}

fn seat_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set("[1-9][0-9]?[A-E]", 1..12).prop_map(|ids| ids.into_iter().collect())
}

proptest! {
    #[test]
    fn any_available_seat_click_fills_input_and_status(ids in seat_ids(), pick in any::<Index>()) {
        let seats: Vec<SeatStatus> = ids
            .iter()
            .map(|id| SeatStatus { seat_id: id.clone(), reserved_by: None })
            .collect();
        let page = rendered_page(&seats);
        SeatPicker::attach(&page);
        let id = pick.get(&ids);

        prop_assert_eq!(page.click(id), 1);
        prop_assert_eq!(page.seat_input_value(), id.clone());
        prop_assert_eq!(page.status_text(), format!("선택한 좌석: {}", id));

        let submissions = page.submissions();
        prop_assert_eq!(submissions.len(), 1);
        prop_assert_eq!(submissions[0].field("seat_id"), Some(id.as_str()));
    }

    #[test]
    fn booked_seats_never_trigger_the_picker(ids in seat_ids(), pick in any::<Index>()) {
        let seats: Vec<SeatStatus> = ids
            .iter()
            .map(|id| SeatStatus { seat_id: id.clone(), reserved_by: Some("lee".to_string()) })
            .collect();
        let page = rendered_page(&seats);
        let picker = SeatPicker::attach(&page);

        prop_assert!(picker.bound_seats().is_empty());
        prop_assert_eq!(page.click(pick.get::<String>(&ids)), 0);
        prop_assert!(page.submissions().is_empty());
        prop_assert_eq!(page.seat_input_value(), "");
    }
}
