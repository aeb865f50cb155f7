//! Employee API Handlers

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::api::AppState;
use crate::api::response::{ApiResponse, AppResult, ok, ok_list};
use crate::models::{DepartmentCount, EmployeeRequest, EmployeeView, Page, SearchCriteria};
use crate::service::DEFAULT_LIST_SORT;

type Envelope<T> = Json<ApiResponse<T>>;

/// Query string of the paginated listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaginationParams {
    pub page: u64,
    pub size: u64,
    pub sort_by: String,
    pub sort_direction: String,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            sort_by: DEFAULT_LIST_SORT.to_string(),
            sort_direction: "asc".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct SalaryRange {
    pub min: Decimal,
    pub max: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailQuery {
    pub email: String,
    pub exclude_id: Option<i32>,
}

/// List all active employees
pub async fn list(State(state): State<AppState>) -> AppResult<Envelope<Vec<EmployeeView>>> {
    info!("Fetching all employees");
    let employees = state.employees.list_all().await?;
    Ok(ok_list(employees, "Employees retrieved successfully"))
}

/// List active employees one page at a time
pub async fn list_paginated(
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> AppResult<Envelope<Page<EmployeeView>>> {
    let Query(params) = params?;
    info!(
        page = params.page,
        size = params.size,
        sort_by = %params.sort_by,
        sort_direction = %params.sort_direction,
        "Fetching employees with pagination"
    );
    let page = state
        .employees
        .list_paginated(params.page, params.size, &params.sort_by, &params.sort_direction)
        .await?;
    Ok(ok(page, "Employees retrieved successfully"))
}

/// Get active employee by id
pub async fn get_by_id(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Envelope<EmployeeView>> {
    let Path(id) = id?;
    info!(id, "Fetching employee");
    let employee = state.employees.get(id).await?;
    Ok(ok(employee, "Employee retrieved successfully"))
}

/// Create a new employee
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Envelope<EmployeeView>)> {
    let Json(payload) = payload?;
    info!(email = %payload.email, "Creating new employee");
    let employee = state.employees.create(payload).await?;
    Ok((StatusCode::CREATED, ok(employee, "Employee created successfully")))
}

/// Update an employee
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> AppResult<Envelope<EmployeeView>> {
    let Path(id) = id?;
    let Json(payload) = payload?;
    info!(id, "Updating employee");
    let employee = state.employees.update(id, payload).await?;
    Ok(ok(employee, "Employee updated successfully"))
}

/// Soft delete an employee
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Envelope<()>> {
    let Path(id) = id?;
    info!(id, "Deleting employee");
    state.employees.soft_delete(id).await?;
    Ok(Json(ApiResponse::message("Employee deleted successfully")))
}

/// Search employees by criteria
pub async fn search(
    State(state): State<AppState>,
    criteria: Result<Json<SearchCriteria>, JsonRejection>,
) -> AppResult<Envelope<Page<EmployeeView>>> {
    let Json(criteria) = criteria?;
    info!(?criteria, "Searching employees");
    let page = state.employees.search(&criteria).await?;
    Ok(ok(page, "Employees search completed successfully"))
}

/// Search employees by name only
pub async fn search_by_name(
    State(state): State<AppState>,
    query: Result<Query<NameQuery>, QueryRejection>,
) -> AppResult<Envelope<Vec<EmployeeView>>> {
    let Query(query) = query?;
    let employees = state.employees.search_by_name(&query.name).await?;
    Ok(ok_list(employees, "Employees search completed successfully"))
}

/// Active employees in a department
pub async fn by_department(
    State(state): State<AppState>,
    department: Result<Path<String>, PathRejection>,
) -> AppResult<Envelope<Vec<EmployeeView>>> {
    let Path(department) = department?;
    info!(%department, "Fetching employees in department");
    let employees = state.employees.by_department(&department).await?;
    Ok(ok_list(
        employees,
        format!("Employees retrieved successfully for department: {department}"),
    ))
}

/// Active employees in a position
pub async fn by_position(
    State(state): State<AppState>,
    position: Result<Path<String>, PathRejection>,
) -> AppResult<Envelope<Vec<EmployeeView>>> {
    let Path(position) = position?;
    let employees = state.employees.by_position(&position).await?;
    Ok(ok_list(
        employees,
        format!("Employees retrieved successfully for position: {position}"),
    ))
}

/// Active direct reports of a manager
pub async fn by_manager(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> AppResult<Envelope<Vec<EmployeeView>>> {
    let Path(id) = id?;
    let employees = state.employees.by_manager(id).await?;
    Ok(ok_list(
        employees,
        format!("Employees retrieved successfully for manager: {id}"),
    ))
}

/// Active employees without a manager
pub async fn top_level(State(state): State<AppState>) -> AppResult<Envelope<Vec<EmployeeView>>> {
    let employees = state.employees.top_level().await?;
    Ok(ok_list(employees, "Top-level employees retrieved successfully"))
}

/// Active employees hired in a date range
pub async fn hired_between(
    State(state): State<AppState>,
    range: Result<Query<DateRange>, QueryRejection>,
) -> AppResult<Envelope<Vec<EmployeeView>>> {
    let Query(range) = range?;
    let employees = state.employees.hired_between(range.from, range.to).await?;
    Ok(ok_list(employees, "Employees retrieved successfully"))
}

/// Active employees in a salary range
pub async fn salary_between(
    State(state): State<AppState>,
    range: Result<Query<SalaryRange>, QueryRejection>,
) -> AppResult<Envelope<Vec<EmployeeView>>> {
    let Query(range) = range?;
    let employees = state.employees.salary_between(range.min, range.max).await?;
    Ok(ok_list(employees, "Employees retrieved successfully"))
}

/// Distinct departments
pub async fn departments(State(state): State<AppState>) -> AppResult<Envelope<Vec<String>>> {
    let departments = state.employees.departments().await?;
    Ok(ok_list(departments, "Departments retrieved successfully"))
}

/// Active head count per department
pub async fn department_counts(State(state): State<AppState>) -> AppResult<Envelope<Vec<DepartmentCount>>> {
    let counts = state.employees.department_counts().await?;
    Ok(ok_list(counts, "Department counts retrieved successfully"))
}

/// Distinct positions
pub async fn positions(State(state): State<AppState>) -> AppResult<Envelope<Vec<String>>> {
    let positions = state.employees.positions().await?;
    Ok(ok_list(positions, "Positions retrieved successfully"))
}

/// Whether an email is already taken
pub async fn email_exists(
    State(state): State<AppState>,
    query: Result<Query<EmailQuery>, QueryRejection>,
) -> AppResult<Envelope<bool>> {
    let Query(query) = query?;
    let exists = match query.exclude_id {
        Some(id) => state.employees.email_exists_excluding(&query.email, id).await?,
        None => state.employees.email_exists(&query.email).await?,
    };
    Ok(ok(exists, "Email availability checked"))
}

/// Liveness probe
pub async fn health() -> Envelope<&'static str> {
    ok("OK", "Employee API is healthy")
}
