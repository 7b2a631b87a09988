//! Integration tests for the reservation screen
//!
//! These tests drive the screen through its public entry points with the
//! recording transport, navigator and widget host, following each event
//! through the store to the resulting state and outbound requests.

#![allow(clippy::unwrap_used)] // Test code

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use move_reserve::{FormField, MoveReserveEnvironment, MoveReserveScreen, Phase, ReservationStatus};
use serde_json::{Value, json};
use shelter_core::environment::{IdentityTranslator, LocaleFormatter, MapConfig};
use shelter_core::screen::{ScreenError, ScreenModule};
use shelter_core::transport::TransportError;
use shelter_runtime::ModuleRegistry;
use shelter_testing::{RecordingNavigator, RecordingTransport, RecordingWidgets, test_clock};
use std::sync::Arc;
use std::time::Duration;

const ENDPOINT: &str = "move_reserve";

struct Harness {
    screen: MoveReserveScreen<RecordingTransport>,
    transport: RecordingTransport,
    navigator: RecordingNavigator,
    widgets: RecordingWidgets,
}

fn default_config() -> MapConfig {
    MapConfig::new()
        .with_flag("WarnBannedOwner", true)
        .with_flag("WarnNoHomeCheck", true)
        .with_flag("DonationOnMoveReserve", true)
        .with("AFDefaultReservationStatus", "1")
}

fn statuses() -> Vec<ReservationStatus> {
    vec![
        ReservationStatus { id: 1, name: "Reserved".to_string() },
        ReservationStatus { id: 2, name: "Awaiting homecheck".to_string() },
    ]
}

async fn bound_screen(config: MapConfig, transport: RecordingTransport) -> Harness {
    let navigator = RecordingNavigator::new();
    let widgets = RecordingWidgets::new();
    let env = MoveReserveEnvironment::new(
        Arc::new(transport.clone()),
        Arc::new(config),
        Arc::new(LocaleFormatter::default()),
        Arc::new(IdentityTranslator),
        Arc::new(navigator.clone()),
        Arc::new(widgets.clone()),
        Arc::new(test_clock()),
    );

    let mut screen = MoveReserveScreen::new(env, statuses());
    screen.bind().await.unwrap();

    Harness {
        screen,
        transport,
        navigator,
        widgets,
    }
}

fn templates_ok(transport: RecordingTransport) -> RecordingTransport {
    transport.respond(ENDPOINT, Some("templates"), Ok("<ul><li>Reservation letter</li></ul>".to_string()))
}

fn rex() -> Value {
    json!({
        "ID": 12,
        "ARCHIVED": 0,
        "ACTIVEMOVEMENTTYPE": 0,
        "HASACTIVERESERVE": 0,
        "FEE": null,
        "SHELTERCODE": "D2025012",
        "ANIMALNAME": "Rex",
    })
}

fn jane() -> Value {
    json!({
        "ID": 34,
        "ISGIFTAID": 1,
        "ISBANNED": 0,
        "INVESTIGATION": 0,
        "INCIDENT": 0,
        "IDCHECK": 1,
        "OWNERNAME": "Jane Smith",
    })
}

#[tokio::test]
async fn bind_applies_configuration_defaults() {
    let config = default_config()
        .with_flag("DonationOnMoveReserve", false)
        .with("AFDefaultReservationStatus", "2");
    let harness = bound_screen(config, RecordingTransport::new()).await;

    let state = harness.screen.snapshot().await.unwrap();
    assert_eq!(state.form.payment_amount, "0");
    assert!(!state.payment_visible);
    assert!(!state.movement_number_visible);
    assert_eq!(state.form.reservation_date, "01/01/2025");
    assert_eq!(state.form.reservation_status, "2");
    assert!(state.submit_enabled);
    assert_eq!(state.phase, Phase::Idle);

    let markup = harness.screen.render_current().await.unwrap();
    assert!(markup.contains("<div id=\"payment\" style=\"display: none\">"));
    assert!(markup.contains("<option value=\"2\" selected=\"selected\">Awaiting homecheck</option>"));
}

#[tokio::test]
async fn payment_stays_hidden_after_selections() {
    let config = default_config().with_flag("DonationOnMoveReserve", false);
    let harness = bound_screen(config, templates_ok(RecordingTransport::new())).await;

    harness.screen.animal_changed(&rex()).await.unwrap().wait().await;
    harness.screen.person_changed(&jane()).await.unwrap().wait().await;

    let state = harness.screen.snapshot().await.unwrap();
    assert_eq!(state.form.payment_amount, "0");
    assert!(!state.payment_visible);
}

#[tokio::test]
async fn animal_off_shelter_blocks_submission() {
    let harness = bound_screen(default_config(), templates_ok(RecordingTransport::new())).await;
    let mut record = rex();
    record["ARCHIVED"] = json!("1");
    record["ACTIVEMOVEMENTTYPE"] = json!(1);
    record["HASACTIVERESERVE"] = json!("1");
    record["FEE"] = json!(5000);

    harness.screen.animal_changed(&record).await.unwrap().wait().await;
    harness.screen.person_changed(&jane()).await.unwrap().wait().await;
    harness.screen.submit().await.unwrap().wait().await;

    let state = harness.screen.snapshot().await.unwrap();
    assert!(!state.submit_enabled);
    assert!(state.panels.not_on_shelter);
    assert!(!state.panels.multiple_reserve);
    assert_eq!(state.panels.fee_info, None);
    assert_eq!(state.phase, Phase::Idle);
    assert!(harness.transport.requests().is_empty());
}

#[tokio::test]
async fn fostered_animal_can_be_reserved() {
    let harness = bound_screen(default_config(), templates_ok(RecordingTransport::new())).await;
    let mut record = rex();
    record["ARCHIVED"] = json!(1);
    record["ACTIVEMOVEMENTTYPE"] = json!(2);

    harness.screen.animal_changed(&record).await.unwrap().wait().await;

    let state = harness.screen.snapshot().await.unwrap();
    assert!(state.submit_enabled);
    assert!(!state.panels.not_on_shelter);
    assert_eq!(state.template_list, "<ul><li>Reservation letter</li></ul>");

    let requests = harness.transport.requests_with_mode(Some("templates"));
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body.encode().unwrap(), "mode=templates&id=12");
}

#[tokio::test]
async fn active_reservation_warns_but_allows_submission() {
    let harness = bound_screen(default_config(), templates_ok(RecordingTransport::new())).await;
    let mut record = rex();
    record["HASACTIVERESERVE"] = json!("1");

    harness.screen.animal_changed(&record).await.unwrap().wait().await;

    let state = harness.screen.snapshot().await.unwrap();
    assert!(state.panels.multiple_reserve);
    assert!(state.submit_enabled);
}

#[tokio::test]
async fn adoption_fee_is_shown_formatted() {
    let harness = bound_screen(default_config(), templates_ok(RecordingTransport::new())).await;
    let mut record = rex();
    record["FEE"] = json!(2500);

    harness.screen.animal_changed(&record).await.unwrap().wait().await;

    let state = harness.screen.snapshot().await.unwrap();
    let fee = state.panels.fee_info.unwrap();
    assert!(fee.contains("25.00"), "fee panel was {fee:?}");
}

#[tokio::test]
async fn adoption_fee_hidden_by_configuration() {
    let config = default_config().with_flag("DontShowAdoptionFee", true);
    let harness = bound_screen(config, templates_ok(RecordingTransport::new())).await;
    let mut record = rex();
    record["FEE"] = json!(2500);

    harness.screen.animal_changed(&record).await.unwrap().wait().await;

    let state = harness.screen.snapshot().await.unwrap();
    assert_eq!(state.panels.fee_info, None);
}

#[tokio::test]
async fn new_animal_clears_previous_panels() {
    let harness = bound_screen(default_config(), templates_ok(RecordingTransport::new())).await;
    let mut blocked = rex();
    blocked["ARCHIVED"] = json!(1);

    harness.screen.animal_changed(&blocked).await.unwrap().wait().await;
    harness.screen.animal_changed(&rex()).await.unwrap().wait().await;

    let state = harness.screen.snapshot().await.unwrap();
    assert!(!state.panels.not_on_shelter);
    assert!(state.submit_enabled);
}

#[tokio::test]
async fn banned_person_shows_only_the_ban() {
    let harness = bound_screen(default_config(), RecordingTransport::new()).await;
    let mut record = jane();
    record["ISBANNED"] = json!(1);
    record["INVESTIGATION"] = json!(3);
    record["IDCHECK"] = json!(0);

    harness.screen.person_changed(&record).await.unwrap().wait().await;

    let state = harness.screen.snapshot().await.unwrap();
    assert_eq!(
        state.panels.owner_warning.as_deref(),
        Some("This person has been banned from adopting animals")
    );
    assert!(state.form.gift_aid);
}

#[tokio::test]
async fn clean_person_clears_the_warning() {
    let harness = bound_screen(default_config(), RecordingTransport::new()).await;
    let mut flagged = jane();
    flagged["INCIDENT"] = json!(1);
    flagged["ISGIFTAID"] = json!(0);

    harness.screen.person_changed(&flagged).await.unwrap().wait().await;
    let state = harness.screen.snapshot().await.unwrap();
    assert_eq!(
        state.panels.owner_warning.as_deref(),
        Some("This person has an animal control incident against them")
    );
    assert!(!state.form.gift_aid);

    harness.screen.person_changed(&jane()).await.unwrap().wait().await;
    let state = harness.screen.snapshot().await.unwrap();
    assert_eq!(state.panels.owner_warning, None);
    assert!(state.form.gift_aid);
}

#[tokio::test]
async fn successful_reservation_navigates_to_documents() {
    let transport = templates_ok(RecordingTransport::new()).respond(ENDPOINT, None, Ok("88".to_string()));
    let harness = bound_screen(default_config(), transport).await;

    harness.screen.animal_changed(&rex()).await.unwrap().wait().await;
    harness.screen.person_changed(&jane()).await.unwrap().wait().await;
    harness.screen.movement_number_changed("R-0042").await.unwrap();
    harness.screen.payment_amount_changed("15.00").await.unwrap();
    harness.screen.submit().await.unwrap().wait().await;

    let state = harness.screen.snapshot().await.unwrap();
    assert_eq!(state.form.movement_id, "88");
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.busy, None);
    assert!(state.submit_enabled);

    let creates = harness.transport.requests_with_mode(None);
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].endpoint, ENDPOINT);
    assert_eq!(
        creates[0].body.encode().unwrap(),
        "movementid=&animal=12&person=34&movementnumber=R-0042&reservationdate=01%2F01%2F2025\
         &reservationstatus=1&giftaid=1&amount1=15.00"
    );

    let urls = harness.navigator.urls();
    assert_eq!(urls.len(), 1);
    assert_eq!(state.navigation.as_deref(), Some(urls[0].as_str()));

    let (prefix, encoded) = urls[0].split_once("&message=").unwrap();
    assert_eq!(prefix, "move_gendoc?mode=ANIMAL&id=12");
    let message = BASE64.decode(urlencoding::decode(encoded).unwrap().as_bytes()).unwrap();
    let message = String::from_utf8(message).unwrap();
    assert!(message.starts_with("Reservation successfully created. "));
    assert!(message.contains("D2025012 - Rex"));
    assert!(message.contains("Jane Smith"));
}

#[tokio::test]
async fn failed_create_restores_the_button() {
    let transport = templates_ok(RecordingTransport::new()).respond(
        ENDPOINT,
        None,
        Err(TransportError::Status {
            endpoint: ENDPOINT.to_string(),
            status: 500,
            body: "Database locked".to_string(),
        }),
    );
    let harness = bound_screen(default_config(), transport).await;

    harness.screen.animal_changed(&rex()).await.unwrap().wait().await;
    harness.screen.person_changed(&jane()).await.unwrap().wait().await;
    harness.screen.submit().await.unwrap().wait().await;

    let state = harness.screen.snapshot().await.unwrap();
    assert_eq!(state.phase, Phase::Idle);
    assert!(state.submit_enabled);
    assert_eq!(state.busy, None);
    assert_eq!(state.navigation, None);
    assert_eq!(state.form.movement_id, "");
    assert!(harness.navigator.urls().is_empty());

    // The user can try again
    harness.screen.submit().await.unwrap().wait().await;
    assert_eq!(harness.transport.requests_with_mode(None).len(), 2);
}

#[tokio::test]
async fn incomplete_form_is_not_submitted() {
    let harness = bound_screen(default_config(), templates_ok(RecordingTransport::new())).await;

    harness.screen.submit().await.unwrap().wait().await;
    let state = harness.screen.snapshot().await.unwrap();
    assert_eq!(state.header_error.as_deref(), Some("Movements require an animal"));
    assert_eq!(state.highlighted, Some(FormField::Animal));

    harness.screen.animal_changed(&rex()).await.unwrap().wait().await;
    harness.screen.person_changed(&jane()).await.unwrap().wait().await;
    harness.screen.reservation_date_changed("  ").await.unwrap();
    harness.screen.submit().await.unwrap().wait().await;

    let state = harness.screen.snapshot().await.unwrap();
    assert_eq!(state.header_error.as_deref(), Some("This type of movement requires a date."));
    assert_eq!(state.highlighted, Some(FormField::ReservationDate));
    assert_eq!(state.phase, Phase::Idle);
    assert!(harness.transport.requests_with_mode(None).is_empty());

    let markup = harness.screen.render_current().await.unwrap();
    assert!(markup.contains("This type of movement requires a date."));
}

#[tokio::test]
async fn stale_template_list_is_discarded() {
    let transport = RecordingTransport::new()
        .respond_after(
            ENDPOINT,
            Some("templates"),
            Duration::from_millis(100),
            Ok("<ul>first</ul>".to_string()),
        )
        .respond(ENDPOINT, Some("templates"), Ok("<ul>second</ul>".to_string()));
    let harness = bound_screen(default_config(), transport).await;
    let mut second = rex();
    second["ID"] = json!(13);

    let mut first_handle = harness.screen.animal_changed(&rex()).await.unwrap();
    // Let the first request reach the transport before the second selection
    tokio::task::yield_now().await;
    harness.screen.animal_changed(&second).await.unwrap().wait().await;
    first_handle.wait().await;

    let state = harness.screen.snapshot().await.unwrap();
    assert_eq!(state.form.animal_id, "13");
    assert_eq!(state.template_list, "<ul>second</ul>");
}

#[tokio::test]
async fn malformed_record_is_rejected() {
    let harness = bound_screen(default_config(), RecordingTransport::new()).await;

    let result = harness.screen.animal_changed(&json!({"ANIMALNAME": "Rex"})).await;

    assert!(matches!(
        result,
        Err(ScreenError::InvalidRecord { widget: "animal", .. })
    ));
    assert_eq!(harness.screen.snapshot().await.unwrap().form.animal_id, "");
}

#[tokio::test]
async fn destroy_releases_widgets_and_drops_late_responses() {
    let transport = templates_ok(RecordingTransport::new()).respond_after(
        ENDPOINT,
        None,
        Duration::from_millis(50),
        Ok("88".to_string()),
    );
    let mut harness = bound_screen(default_config(), transport).await;

    harness.screen.animal_changed(&rex()).await.unwrap().wait().await;
    harness.screen.person_changed(&jane()).await.unwrap().wait().await;
    let mut pending = harness.screen.submit().await.unwrap();

    harness.screen.destroy();
    pending.wait().await;

    assert_eq!(harness.widgets.destroyed(), vec!["#animal".to_string(), "#person".to_string()]);
    assert!(harness.navigator.urls().is_empty());
    assert_eq!(harness.screen.submit().await.err(), Some(ScreenError::NotBound("move_reserve")));
}

#[tokio::test]
async fn registry_activates_the_screen_by_route() {
    let harness = bound_screen(default_config(), RecordingTransport::new()).await;
    let mut registry = ModuleRegistry::new();
    registry.register(Box::new(harness.screen));

    let markup = registry.activate("move_reserve").await.unwrap();

    assert!(markup.contains("<h2>Reserve an animal</h2>"));
    assert_eq!(registry.active(), Some("move_reserve"));
    assert_eq!(registry.routes(), vec!["move_reserve"]);

    let module = registry.module("move_reserve").unwrap();
    assert_eq!(module.title(), "Reserve an animal");
    assert_eq!(module.autofocus(), "#asm-content button:first");
    assert_eq!(module.animation(), "newdata");

    // Reactivating tears down the current instance first
    registry.activate("move_reserve").await.unwrap();
    assert_eq!(harness.widgets.destroyed(), vec!["#animal".to_string(), "#person".to_string()]);
}
