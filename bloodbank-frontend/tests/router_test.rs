mod common;

use axum::http::StatusCode;
use common::{body_text, location, TestApp};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

async fn mock_admin_reads(app: &TestApp, donors: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/admin/donors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(donors))
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/blood-requests/admin/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&app.backend)
        .await;
}

#[tokio::test]
async fn health_check_works() {
    let mut app = TestApp::spawn().await;

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn responses_carry_security_and_request_id_headers() {
    let mut app = TestApp::spawn().await;

    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let headers = response.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert!(headers.contains_key("content-security-policy"));
    assert!(!headers["x-request-id"].is_empty());
}

#[tokio::test]
async fn signed_out_visitors_are_sent_to_sign_in() {
    let mut app = TestApp::spawn().await;

    for page in [
        "/donor-dashboard",
        "/hospital-dashboard",
        "/admin-dashboard",
        "/profile",
        "/settings",
    ] {
        let response = app.get(page).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{}", page);
        assert_eq!(location(&response), Some("/signin"), "{}", page);
    }

    let response = app.post_form("/admin/donors/new", "").await;
    assert_eq!(location(&response), Some("/signin"));
}

#[tokio::test]
async fn sign_in_without_role_is_rejected() {
    let mut app = TestApp::spawn().await;

    let response = app
        .post_form("/signin", "role=&email=a%40b.com&password=pw")
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("Please select your role"));
}

#[tokio::test]
async fn rejected_credentials_show_backend_message() {
    let mut app = TestApp::spawn().await;
    Mock::given(method("POST"))
        .and(path("/api/donors/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Bad password"})),
        )
        .mount(&app.backend)
        .await;

    let response = app
        .post_form("/signin", "role=donor&email=jane%40x.com&password=nope")
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("Bad password"));
}

#[tokio::test]
async fn admin_sign_in_opens_admin_dashboard() {
    let mut app = TestApp::spawn().await;
    mock_admin_reads(&app, json!([])).await;

    let response = app.sign_in_admin().await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin-dashboard"));

    let response = app.get("/admin-dashboard").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Login successful"));
    assert!(body.contains("Michael"));
    assert!(body.contains("No donors registered"));

    // flash is shown once
    let body = body_text(app.get("/admin-dashboard").await).await;
    assert!(!body.contains("Login successful"));
}

#[tokio::test]
async fn admin_adds_a_donor_through_the_composer() {
    let mut app = TestApp::spawn().await;
    mock_admin_reads(
        &app,
        json!([{
            "id": 7,
            "fullName": "Jane Doe",
            "age": 30,
            "gender": "female",
            "bloodGroup": "O+",
            "email": "jane@x.com",
            "phone": "555-0100",
            "location": "Boston"
        }]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/api/admin/donors"))
        .and(header("authorization", "Bearer admin-token"))
        .and(body_partial_json(json!({"fullName": "Jane Doe", "age": 30})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&app.backend)
        .await;

    app.sign_in_admin().await;

    let response = app.post_form("/admin/donors/new", "").await;
    assert_eq!(location(&response), Some("/admin-dashboard"));
    let body = body_text(app.get("/admin-dashboard").await).await;
    assert!(body.contains("Add New Donor"));

    let response = app
        .post_form(
            "/admin/donors/submit",
            "full_name=Jane+Doe&age=30&gender=female&blood_group=O%2B\
             &email=jane%40x.com&phone=555-0100&location=Boston&password=pw",
        )
        .await;
    assert_eq!(location(&response), Some("/admin-dashboard"));

    let body = body_text(app.get("/admin-dashboard").await).await;
    assert!(body.contains("Donor added successfully"));
    assert!(body.contains("Jane Doe"));
    assert!(!body.contains("Add New Donor"));
}

#[tokio::test]
async fn declined_delete_leaves_the_donor() {
    let mut app = TestApp::spawn().await;
    mock_admin_reads(
        &app,
        json!([{"id": 5, "fullName": "Sam Lee", "email": "sam@x.com"}]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/donors/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&app.backend)
        .await;

    app.sign_in_admin().await;

    let response = app.get("/admin/donors/5/delete").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Sam Lee"));

    let response = app
        .post_form("/admin/donors/5/delete", "decision=decline")
        .await;
    assert_eq!(location(&response), Some("/admin-dashboard"));
}

#[tokio::test]
async fn sign_out_closes_protected_pages() {
    let mut app = TestApp::spawn().await;
    mock_admin_reads(&app, json!([])).await;
    app.sign_in_admin().await;

    let response = app.post_form("/signout", "").await;
    assert_eq!(location(&response), Some("/"));

    let response = app.get("/admin-dashboard").await;
    assert_eq!(location(&response), Some("/signin"));
}

#[tokio::test]
async fn failed_first_fetch_is_not_shown_as_empty_registry() {
    let mut app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/donors"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/blood-requests/admin/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&app.backend)
        .await;
    app.sign_in_admin().await;

    let response = app.get("/admin-dashboard").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Failed to fetch donors"));
    assert!(!body.contains("No donors registered"));
}

#[tokio::test]
async fn delete_prompt_reports_the_fetch_failure() {
    let mut app = TestApp::spawn().await;
    // first fetch fails, later ones succeed
    Mock::given(method("GET"))
        .and(path("/api/admin/donors"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"message": "Donor service down"})),
        )
        .up_to_n_times(1)
        .mount(&app.backend)
        .await;
    mock_admin_reads(
        &app,
        json!([{"id": 5, "fullName": "Sam Lee", "email": "sam@x.com"}]),
    )
    .await;
    app.sign_in_admin().await;

    let response = app.get("/admin/donors/5/delete").await;
    assert_eq!(location(&response), Some("/admin-dashboard"));

    let body = body_text(app.get("/admin-dashboard").await).await;
    assert!(body.contains("Donor service down"));
    assert!(!body.contains("is not in the list"));
    assert!(body.contains("Sam Lee"));
}

#[tokio::test]
async fn edit_on_fresh_panel_reports_the_fetch_failure() {
    let mut app = TestApp::spawn().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/donors"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"message": "Donor service down"})),
        )
        .up_to_n_times(1)
        .mount(&app.backend)
        .await;
    mock_admin_reads(
        &app,
        json!([{"id": 5, "fullName": "Sam Lee", "email": "sam@x.com"}]),
    )
    .await;
    app.sign_in_admin().await;

    let response = app.post_form("/admin/donors/5/edit", "").await;
    assert_eq!(location(&response), Some("/admin-dashboard"));

    let body = body_text(app.get("/admin-dashboard").await).await;
    assert!(body.contains("Donor service down"));
    assert!(!body.contains("is not in the list"));
    assert!(!body.contains("Edit Donor"));
}
