use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

use crate::helpers::{
    APPOINTMENT_ACCOUNT, APPOINTMENT_RECIPIENT, FORWARD_EMAIL, FakeTransport, TestApp,
};

const PATH: &str = "/api/book-appointment";

fn valid_body() -> Value {
    json!({
        "name": "A",
        "email": "a@b.com",
        "phone": "1",
        "doctor": "D",
        "timeSlot": "10am",
        "date": "2024-01-01"
    })
}

#[tokio::test]
async fn valid_booking_sends_primary_then_forward() {
    // Arrange
    let app = TestApp::new();

    // Act
    let (status, body) = app.post_json(PATH, &valid_body()).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "✅ Appointment booked successfully" }));

    let sent = app.appointment.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, APPOINTMENT_RECIPIENT);
    assert_eq!(sent[0].subject, "New Appointment Booked");
    assert_eq!(sent[1].to, FORWARD_EMAIL);
    assert_eq!(sent[1].subject, "[Appointment] New Appointment Booked");
    assert_eq!(sent[0].text, sent[1].text);
    assert_eq!(sent[0].html, sent[1].html);
    assert_eq!(app.contact.attempts(), 0);
}

#[tokio::test]
async fn booking_is_sent_from_the_appointment_account() {
    let app = TestApp::new();

    app.post_json(PATH, &valid_body()).await;

    for mail in app.appointment.sent() {
        assert_eq!(mail.from, APPOINTMENT_ACCOUNT);
        assert_eq!(mail.reply_to, APPOINTMENT_ACCOUNT);
        assert_eq!(mail.from_name, "Agnia Ayurvedic Hospital");
    }
}

#[tokio::test]
async fn booking_text_contains_each_field_and_defaults_message() {
    let app = TestApp::new();

    app.post_json(PATH, &valid_body()).await;

    let text = &app.appointment.sent()[0].text;
    for line in [
        "Name: A\n",
        "Email: a@b.com\n",
        "Phone: 1\n",
        "Doctor: D\n",
        "Time Slot: 10am\n",
        "Date: 2024-01-01\n",
    ] {
        assert_eq!(text.matches(line).count(), 1, "{line:?}");
    }
    assert!(text.ends_with("Message: N/A"));
}

#[tokio::test]
async fn optional_message_is_included_when_present() {
    let app = TestApp::new();
    let mut body = valid_body();
    body["message"] = json!("Please call before noon");

    let (status, _) = app.post_json(PATH, &body).await;

    assert_eq!(status, StatusCode::OK);
    assert!(
        app.appointment.sent()[0]
            .text
            .ends_with("Message: Please call before noon")
    );
}

#[rstest]
#[case::name("name")]
#[case::email("email")]
#[case::phone("phone")]
#[case::doctor("doctor")]
#[case::time_slot("timeSlot")]
#[case::date("date")]
#[tokio::test]
async fn missing_field_is_rejected_without_sending(#[case] field: &str) {
    let app = TestApp::new();
    let mut body = valid_body();
    body.as_object_mut().unwrap().remove(field);

    let (status, body) = app.post_json(PATH, &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "All fields except message are required" }));
    assert_eq!(app.appointment.attempts(), 0);
}

#[tokio::test]
async fn empty_field_is_rejected_without_sending() {
    let app = TestApp::new();
    let mut body = valid_body();
    body["doctor"] = json!("");

    let (status, _) = app.post_json(PATH, &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.appointment.attempts(), 0);
}

#[tokio::test]
async fn failed_primary_send_skips_forward() {
    let app = TestApp::with_transports(FakeTransport::failing_on(vec![0]), FakeTransport::default());

    let (status, body) = app.post_json(PATH, &valid_body()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert_eq!(
        body["details"],
        "Mail transport error: 535 authentication failed"
    );
    assert_eq!(app.appointment.attempts(), 1);
    assert!(app.appointment.sent().is_empty());
}

#[tokio::test]
async fn failed_forward_send_is_a_server_error() {
    let app = TestApp::with_transports(FakeTransport::failing_on(vec![1]), FakeTransport::default());

    let (status, body) = app.post_json(PATH, &valid_body()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");
    assert_eq!(app.appointment.attempts(), 2);
    assert_eq!(app.appointment.sent().len(), 1);
}

#[tokio::test]
async fn malformed_json_is_a_server_error() {
    let app = TestApp::new();

    let (status, body) = app.post_raw(PATH, "{\"name\": ".to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Something went wrong!");
    assert!(body["details"].is_string());
    assert_eq!(app.appointment.attempts(), 0);
}

#[tokio::test]
async fn numeric_phone_is_accepted_as_text() {
    let app = TestApp::new();
    let mut body = valid_body();
    body["phone"] = json!(5_551_234);

    let (status, _) = app.post_json(PATH, &body).await;

    assert_eq!(status, StatusCode::OK);
    let sent = app.appointment.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent[0].text.contains("Phone: 5551234\n"));
}

#[rstest]
#[case::array(json!([valid_body()]))]
#[case::string(json!("A"))]
#[case::nested_field(json!({ "name": { "first": "A" }, "email": "a@b.com" }))]
#[tokio::test]
async fn body_that_is_not_a_form_object_fails_validation(#[case] body: Value) {
    let app = TestApp::new();

    let (status, body) = app.post_json(PATH, &body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "All fields except message are required" }));
    assert_eq!(app.appointment.attempts(), 0);
}

#[tokio::test]
async fn panic_while_sending_is_caught_by_the_fallback() {
    let app = TestApp::with_transports(FakeTransport::panicking(), FakeTransport::default());

    let (status, body) = app.post_json(PATH, &valid_body()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "Something went wrong!", "details": "smtp client crashed" })
    );
}
