//! API integration tests
//!
//! Require a running server with a database and object storage configured.

use chrono::{Duration, SecondsFormat, Utc};
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:8080/api/v1";

fn photo() -> Part {
    Part::bytes(vec![0xff, 0xd8, 0xff, 0xe0])
        .file_name("visitor.jpg")
        .mime_str("image/jpeg")
        .expect("Invalid mime type")
}

fn id_front() -> Part {
    Part::bytes(vec![0x89, 0x50, 0x4e, 0x47])
        .file_name("licence.png")
        .mime_str("image/png")
        .expect("Invalid mime type")
}

fn submission(student_number: &str, resident_name: &str, entry_at: &str) -> Form {
    Form::new()
        .text("resident_name", resident_name.to_string())
        .text("student_number", student_number.to_string())
        .text("student_email", "tester@student.sae.edu.au")
        .text("visitor_full_name", "Integration Visitor")
        .text("entry_at", entry_at.to_string())
        .part("visitor_photo", photo())
        .part("id_front", id_front())
}

fn entry_in(hours: i64) -> String {
    (Utc::now() + Duration::hours(hours)).to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_submit_visit() {
    let client = Client::new();
    let entry_at = entry_in(6);

    let response = client
        .post(format!("{}/visits/submit", BASE_URL))
        .header("X-Forwarded-For", "198.51.100.23")
        .multipart(submission("IT-0001", "Integration Resident", &entry_at))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["ok"], true);
    assert!(body["visit_id"].is_string());

    let entry = chrono::DateTime::parse_from_rfc3339(&entry_at).unwrap();
    let exit = chrono::DateTime::parse_from_rfc3339(body["exit_at"].as_str().unwrap()).unwrap();
    assert_eq!((exit - entry).num_seconds(), 86_400);
}

#[tokio::test]
#[ignore]
async fn test_resubmission_creates_new_visit() {
    let client = Client::new();

    let mut visit_ids = Vec::new();
    for name in ["First Name", "Updated Name"] {
        let response = client
            .post(format!("{}/visits/submit", BASE_URL))
            .multipart(submission("IT-0002", name, &entry_in(4)))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.expect("Failed to parse response");
        visit_ids.push(body["visit_id"].as_str().unwrap().to_string());
    }

    assert_ne!(visit_ids[0], visit_ids[1]);
}

#[tokio::test]
#[ignore]
async fn test_submit_rejects_wrong_domain() {
    let client = Client::new();

    let form = Form::new()
        .text("resident_name", "Resident")
        .text("student_number", "IT-0003")
        .text("student_email", "tester@gmail.com")
        .text("visitor_full_name", "Visitor")
        .text("entry_at", entry_in(6))
        .part("visitor_photo", photo())
        .part("id_front", id_front());

    let response = client
        .post(format!("{}/visits/submit", BASE_URL))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Email must end with @student.sae.edu.au");
}

#[tokio::test]
#[ignore]
async fn test_submit_rejects_short_notice() {
    let client = Client::new();

    let response = client
        .post(format!("{}/visits/submit", BASE_URL))
        .multipart(submission("IT-0004", "Resident", &entry_in(1)))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Entry must be at least 2 hours from now");
}

#[tokio::test]
#[ignore]
async fn test_submit_requires_files() {
    let client = Client::new();

    let form = Form::new()
        .text("resident_name", "Resident")
        .text("student_number", "IT-0005")
        .text("student_email", "tester@student.sae.edu.au")
        .text("visitor_full_name", "Visitor")
        .text("entry_at", entry_in(6))
        .part("visitor_photo", photo());

    let response = client
        .post(format!("{}/visits/submit", BASE_URL))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Missing id_front");
}

#[tokio::test]
#[ignore]
async fn test_get_is_not_allowed() {
    let client = Client::new();

    let response = client
        .get(format!("{}/visits/submit", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 405);
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Use POST with multipart/form-data");
}
