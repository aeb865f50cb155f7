//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::NaiveDate;
use employee_directory::db;
use employee_directory::models::{EmployeeRequest, EmployeeView};
use employee_directory::service::EmployeeService;
use rust_decimal::Decimal;
use sea_orm::{ConnectOptions, Database};

/// Service backed by a fresh in-memory SQLite database.
pub async fn setup() -> EmployeeService {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    // One connection, otherwise each pooled connection sees its own empty database
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let conn = Database::connect(opt).await.expect("connect to sqlite");
    db::ensure_schema(&conn).await.expect("create schema");
    EmployeeService::new(conn)
}

pub fn request(first: &str, last: &str, email: &str, department: &str, position: &str) -> EmployeeRequest {
    EmployeeRequest {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        department: department.to_string(),
        position: position.to_string(),
        hire_date: NaiveDate::from_ymd_opt(2023, 3, 1),
        ..Default::default()
    }
}

pub fn salary(cents: i64) -> Option<Decimal> {
    Some(Decimal::new(cents, 2))
}

pub async fn create(service: &EmployeeService, request: EmployeeRequest) -> EmployeeView {
    service.create(request).await.expect("create employee")
}

/// A(active, a@x.com), B(active, reports to A), C(inactive, c@x.com).
pub async fn seed_abc(service: &EmployeeService) -> (EmployeeView, EmployeeView, EmployeeView) {
    let a = create(service, request("Alice", "Adams", "a@x.com", "Engineering", "Manager")).await;
    let b = create(
        service,
        EmployeeRequest {
            manager_id: Some(a.id),
            ..request("Bob", "Brown", "b@x.com", "Engineering", "Developer")
        },
    )
    .await;
    let c = create(service, request("Carol", "Clark", "c@x.com", "Sales", "Representative")).await;
    service.soft_delete(c.id).await.expect("soft delete C");
    (a, b, c)
}
