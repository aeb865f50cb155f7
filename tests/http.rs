mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use employee_directory::api::{self, AppState};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    api::build_app(AppState::new(common::setup().await))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn employee(first: &str, last: &str, email: &str) -> Value {
    json!({
        "firstName": first,
        "lastName": last,
        "email": email,
        "phone": "+1-555-0100",
        "department": "Engineering",
        "position": "Developer",
        "salary": 85000.5,
        "hireDate": "2024-01-15"
    })
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/api/v1/employees/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"], "OK");
    assert_eq!(body["message"], "Employee API is healthy");
}

#[tokio::test]
async fn test_create_get_delete_lifecycle() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/employees",
        Some(employee("John", "Smith", "john@x.com")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Employee created successfully");
    assert_eq!(body["data"]["fullName"], "John Smith");
    assert_eq!(body["data"]["isActive"], true);
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/employees/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "john@x.com");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/v1/employees/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Employee deleted successfully");
    assert!(body.get("data").is_none());

    let (status, body) = send(&app, Method::GET, &format!("/api/v1/employees/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Resource not found");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/v1/employees/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("Employee with id {id} is already inactive"));
}

#[tokio::test]
async fn test_duplicate_email_conflict() {
    let app = app().await;
    send(&app, Method::POST, "/api/v1/employees", Some(employee("John", "Smith", "john@x.com"))).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/employees",
        Some(employee("Jon", "Smythe", "JOHN@X.COM")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Duplicate resource");
}

#[tokio::test]
async fn test_validation_errors_carry_field_map() {
    let app = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/employees",
        Some(json!({ "firstName": "John", "email": "broken" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid input data");
    assert_eq!(body["data"]["email"], "Email should be valid");
    assert_eq!(body["data"]["lastName"], "Last name is required");
    assert!(body["data"].get("firstName").is_none());
}

#[tokio::test]
async fn test_malformed_input_is_bad_request() {
    let app = app().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/employees/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid argument");

    let (status, _) = send(&app, Method::GET, "/api/v1/employees/paginated?page=-1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(&app, Method::GET, "/api/v1/employees/paginated?sortBy=bogus", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid argument");
}

#[tokio::test]
async fn test_list_envelope_has_count() {
    let app = app().await;
    for (first, email) in [("Amy", "amy@x.com"), ("Ben", "ben@x.com"), ("Cid", "cid@x.com")] {
        send(&app, Method::POST, "/api/v1/employees", Some(employee(first, "Stone", email))).await;
    }

    let (status, body) = send(&app, Method::GET, "/api/v1/employees", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (_, body) = send(&app, Method::GET, "/api/v1/employees/department/engineering", None).await;
    assert_eq!(body["count"], 3);
    assert_eq!(
        body["message"],
        "Employees retrieved successfully for department: engineering"
    );
}

#[tokio::test]
async fn test_paginated_listing() {
    let app = app().await;
    for (first, email) in [("Amy", "amy@x.com"), ("Ben", "ben@x.com"), ("Cid", "cid@x.com")] {
        send(&app, Method::POST, "/api/v1/employees", Some(employee(first, "Stone", email))).await;
    }

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v1/employees/paginated?page=0&size=2&sortBy=firstName&sortDirection=desc",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalElements"], 3);
    assert_eq!(body["data"]["totalPages"], 2);
    assert_eq!(body["data"]["content"][0]["firstName"], "Cid");
    assert_eq!(body["data"]["content"][1]["firstName"], "Ben");

    let (status, body) = send(&app, Method::GET, "/api/v1/employees/paginated?page=5&size=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["content"].as_array().unwrap().len(), 0);
    assert_eq!(body["data"]["totalPages"], 2);
}

#[tokio::test]
async fn test_search_endpoint() {
    let app = app().await;
    send(&app, Method::POST, "/api/v1/employees", Some(employee("John", "Smith", "john@x.com"))).await;
    send(&app, Method::POST, "/api/v1/employees", Some(employee("Mary", "Major", "mary@x.com"))).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/employees/search",
        Some(json!({ "searchTerm": "smi", "department": "ENGINEERING" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Employees search completed successfully");
    assert_eq!(body["data"]["totalElements"], 1);
    assert_eq!(body["data"]["content"][0]["lastName"], "Smith");
}

#[tokio::test]
async fn test_update_with_unknown_manager() {
    let app = app().await;
    let (_, body) = send(&app, Method::POST, "/api/v1/employees", Some(employee("John", "Smith", "john@x.com"))).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let mut update = employee("John", "Smith", "john@x.com");
    update["managerId"] = json!(999);
    let (status, body) = send(&app, Method::PUT, &format!("/api/v1/employees/{id}"), Some(update)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Manager not found with id: 999");
}

#[tokio::test]
async fn test_email_exists_endpoint() {
    let app = app().await;
    let (_, body) = send(&app, Method::POST, "/api/v1/employees", Some(employee("John", "Smith", "john@x.com"))).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = send(&app, Method::GET, "/api/v1/employees/email-exists?email=JOHN@x.com", None).await;
    assert_eq!(body["data"], true);

    let uri = format!("/api/v1/employees/email-exists?email=john@x.com&excludeId={id}");
    let (_, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(body["data"], false);
}
