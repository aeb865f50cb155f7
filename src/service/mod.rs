//! Employee service orchestration.
//!
//! Each mutating operation runs inside one transaction: the invariant checks
//! and the write see the same snapshot, and any failure rolls back.

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use tracing::{debug, info};

use crate::db::employee::{self as repo, EmployeeChanges, NewEmployee};
use crate::db::query::{self, PageRequest, SearchFilter};
use crate::entities::employees;
use crate::error::{AppError, Result};
use crate::invariants;
use crate::models::{DepartmentCount, EmployeeRequest, EmployeeView, Page, SearchCriteria};

/// Default sort field for the paginated listing.
pub const DEFAULT_LIST_SORT: &str = "firstName";

/// Service for employee records.
#[derive(Debug, Clone)]
pub struct EmployeeService {
    db: DatabaseConnection,
}

impl EmployeeService {
    /// Create a new employee service.
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Underlying connection pool.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// All active employees.
    pub async fn list_all(&self) -> Result<Vec<EmployeeView>> {
        debug!("Fetching all active employees");
        let models = repo::list_active(&self.db).await?;
        to_views(&self.db, models).await
    }

    /// One page of active employees, no filters.
    pub async fn list_paginated(&self, page: u64, size: u64, sort_by: &str, sort_direction: &str) -> Result<Page<EmployeeView>> {
        debug!(page, size, sort_by, sort_direction, "Fetching employees with pagination");
        let request = PageRequest::new(page, size, sort_by, sort_direction)?;
        let page = query::search(&self.db, &SearchFilter::default(), &request).await?;
        to_view_page(&self.db, page).await
    }

    /// Active employee by id.
    pub async fn get(&self, id: i32) -> Result<EmployeeView> {
        debug!(id, "Fetching employee");
        let model = invariants::require_active_by_id(&self.db, id).await?;
        to_view(&self.db, model).await
    }

    /// Create an employee.
    pub async fn create(&self, request: EmployeeRequest) -> Result<EmployeeView> {
        debug!(email = %request.email, "Creating new employee");
        request.validate()?;

        let txn = self.db.begin().await?;

        invariants::check_email_available(&txn, &request.email, None).await?;
        if let Some(manager_id) = request.manager_id {
            invariants::validate_manager(&txn, manager_id).await?;
        }

        let created = repo::create(
            &txn,
            NewEmployee {
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                phone: request.phone,
                department: request.department,
                position: request.position,
                salary: request.salary,
                hire_date: request.hire_date.unwrap_or_else(today),
                manager_id: request.manager_id,
                is_active: request.is_active.unwrap_or(true),
            },
        )
        .await?;
        let view = to_view(&txn, created).await?;

        txn.commit().await?;
        info!(id = view.id, "Employee created successfully");
        Ok(view)
    }

    /// Overwrite an active employee's fields.
    pub async fn update(&self, id: i32, request: EmployeeRequest) -> Result<EmployeeView> {
        debug!(id, "Updating employee");
        request.validate()?;

        let txn = self.db.begin().await?;

        let existing = invariants::require_active_by_id_with_reason(&txn, id, "is inactive and cannot be updated").await?;

        if !existing.email.eq_ignore_ascii_case(&request.email) {
            invariants::check_email_available(&txn, &request.email, Some(id)).await?;
        }
        if let Some(manager_id) = request.manager_id {
            if manager_id == id {
                return Err(AppError::validation("An employee cannot be their own manager"));
            }
            invariants::validate_manager(&txn, manager_id).await?;
        }

        let updated = repo::update(
            &txn,
            existing,
            EmployeeChanges {
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                phone: request.phone,
                department: request.department,
                position: request.position,
                salary: request.salary,
                manager_id: request.manager_id,
                hire_date: request.hire_date,
                is_active: request.is_active,
            },
        )
        .await?;
        let view = to_view(&txn, updated).await?;

        txn.commit().await?;
        info!(id, "Employee updated successfully");
        Ok(view)
    }

    /// Soft delete: flip the active flag.
    pub async fn soft_delete(&self, id: i32) -> Result<()> {
        debug!(id, "Soft deleting employee");
        let txn = self.db.begin().await?;

        let existing = invariants::require_active_by_id_with_reason(&txn, id, "is already inactive").await?;
        repo::set_active(&txn, existing, false).await?;

        txn.commit().await?;
        info!(id, "Employee soft deleted successfully");
        Ok(())
    }

    /// Filtered, paginated search over active employees.
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Page<EmployeeView>> {
        debug!(?criteria, "Searching employees");
        let request = PageRequest::new(criteria.page, criteria.size, &criteria.sort_by, &criteria.sort_direction)?;
        let page = query::search(&self.db, &SearchFilter::from(criteria), &request).await?;
        to_view_page(&self.db, page).await
    }

    /// Active employees in a department, matched case-insensitively.
    pub async fn by_department(&self, department: &str) -> Result<Vec<EmployeeView>> {
        debug!(department, "Fetching employees by department");
        let models = repo::list_by_department(&self.db, department).await?;
        to_views(&self.db, models).await
    }

    /// Active employees holding a position, matched case-insensitively.
    pub async fn by_position(&self, position: &str) -> Result<Vec<EmployeeView>> {
        debug!(position, "Fetching employees by position");
        let models = repo::list_by_position(&self.db, position).await?;
        to_views(&self.db, models).await
    }

    /// Active direct reports. The manager must itself be active.
    pub async fn by_manager(&self, manager_id: i32) -> Result<Vec<EmployeeView>> {
        debug!(manager_id, "Fetching employees by manager");
        invariants::validate_manager(&self.db, manager_id).await?;
        let models = repo::list_by_manager(&self.db, manager_id).await?;
        to_views(&self.db, models).await
    }

    /// Active employees without a manager.
    pub async fn top_level(&self) -> Result<Vec<EmployeeView>> {
        debug!("Fetching top-level employees");
        let models = repo::list_top_level(&self.db).await?;
        to_views(&self.db, models).await
    }

    /// Active employees hired within the inclusive date range.
    pub async fn hired_between(&self, start_date: NaiveDate, end_date: NaiveDate) -> Result<Vec<EmployeeView>> {
        debug!(%start_date, %end_date, "Fetching employees by hire date");
        if start_date > end_date {
            return Err(AppError::validation("Start date must not be after end date"));
        }
        let models = repo::list_hired_between(&self.db, start_date, end_date).await?;
        to_views(&self.db, models).await
    }

    /// Active employees whose salary lies within the inclusive range.
    pub async fn salary_between(&self, min_salary: Decimal, max_salary: Decimal) -> Result<Vec<EmployeeView>> {
        debug!(%min_salary, %max_salary, "Fetching employees by salary range");
        if min_salary > max_salary {
            return Err(AppError::validation("Minimum salary must not exceed maximum salary"));
        }
        let models = repo::list_salary_between(&self.db, min_salary, max_salary).await?;
        to_views(&self.db, models).await
    }

    /// Name-only search (first, last or full name).
    pub async fn search_by_name(&self, term: &str) -> Result<Vec<EmployeeView>> {
        debug!(term, "Searching employees by name");
        let models = repo::search_by_name(&self.db, term.trim()).await?;
        to_views(&self.db, models).await
    }

    /// Distinct departments with at least one active employee.
    pub async fn departments(&self) -> Result<Vec<String>> {
        debug!("Fetching departments");
        Ok(repo::distinct_departments(&self.db).await?)
    }

    /// Distinct positions held by active employees.
    pub async fn positions(&self) -> Result<Vec<String>> {
        debug!("Fetching positions");
        Ok(repo::distinct_positions(&self.db).await?)
    }

    /// Active head count per department.
    pub async fn department_counts(&self) -> Result<Vec<DepartmentCount>> {
        debug!("Counting employees by department");
        Ok(repo::count_by_department(&self.db).await?)
    }

    /// Whether any employee, active or not, owns this email.
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        debug!(email, "Checking email");
        Ok(repo::email_exists(&self.db, email, None).await?)
    }

    /// Same as [`Self::email_exists`], ignoring employee `id`.
    pub async fn email_exists_excluding(&self, email: &str, id: i32) -> Result<bool> {
        debug!(email, id, "Checking email");
        Ok(repo::email_exists(&self.db, email, Some(id)).await?)
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

async fn to_view<C: ConnectionTrait>(db: &C, model: employees::Model) -> Result<EmployeeView> {
    let mut views = to_views(db, vec![model]).await?;
    views.pop().ok_or_else(|| AppError::internal("Employee view conversion produced no result"))
}

/// Convert rows to views, resolving manager names with one batched lookup.
async fn to_views<C: ConnectionTrait>(db: &C, models: Vec<employees::Model>) -> Result<Vec<EmployeeView>> {
    let mut manager_ids: Vec<i32> = models.iter().filter_map(|m| m.manager_id).collect();
    manager_ids.sort_unstable();
    manager_ids.dedup();

    let names: HashMap<i32, String> = repo::full_names_by_ids(db, &manager_ids).await?;

    Ok(models
        .into_iter()
        .map(|model| {
            let manager_name = model.manager_id.and_then(|id| names.get(&id).cloned());
            EmployeeView::from_model(model, manager_name)
        })
        .collect())
}

async fn to_view_page<C: ConnectionTrait>(db: &C, page: Page<employees::Model>) -> Result<Page<EmployeeView>> {
    let Page {
        content,
        page,
        size,
        total_elements,
        ..
    } = page;
    let views = to_views(db, content).await?;
    Ok(Page::new(views, page, size, total_elements))
}
