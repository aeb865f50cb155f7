//! Employee repository with CRUD and lookup operations.
//!
//! All list functions return active employees only. `get_by_id` is the raw
//! primary-key lookup; user-facing code should go through
//! [`invariants::require_active_by_id`] instead.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::*;

use super::query::{contains_ignore_case, eq_ignore_case, like_lower};
use crate::entities::{employees, prelude::*};
use crate::invariants;
use crate::models::DepartmentCount;

/// Fields written on insert.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: String,
    pub position: String,
    pub salary: Option<Decimal>,
    pub hire_date: NaiveDate,
    pub manager_id: Option<i32>,
    pub is_active: bool,
}

/// Fields written on update. `None` for `hire_date`/`is_active` keeps the stored value.
#[derive(Debug, Clone)]
pub struct EmployeeChanges {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: String,
    pub position: String,
    pub salary: Option<Decimal>,
    pub manager_id: Option<i32>,
    pub hire_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
}

/// Active employees ordered by last name then first name.
fn active_by_name() -> Select<Employees> {
    invariants::active_only()
        .order_by_asc(employees::Column::LastName)
        .order_by_asc(employees::Column::FirstName)
        .order_by_asc(employees::Column::Id)
}

/// List all active employees.
pub async fn list_active<C: ConnectionTrait>(db: &C) -> Result<Vec<employees::Model>, DbErr> {
    active_by_name().all(db).await
}

/// List active employees in a department (case-insensitive exact match).
pub async fn list_by_department<C: ConnectionTrait>(db: &C, department: &str) -> Result<Vec<employees::Model>, DbErr> {
    active_by_name()
        .filter(eq_ignore_case(employees::Column::Department, department))
        .all(db)
        .await
}

/// List active employees holding a position (case-insensitive exact match).
pub async fn list_by_position<C: ConnectionTrait>(db: &C, position: &str) -> Result<Vec<employees::Model>, DbErr> {
    active_by_name()
        .filter(eq_ignore_case(employees::Column::Position, position))
        .all(db)
        .await
}

/// List active direct reports of a manager.
pub async fn list_by_manager<C: ConnectionTrait>(db: &C, manager_id: i32) -> Result<Vec<employees::Model>, DbErr> {
    active_by_name()
        .filter(employees::Column::ManagerId.eq(manager_id))
        .all(db)
        .await
}

/// List active employees without a manager.
pub async fn list_top_level<C: ConnectionTrait>(db: &C) -> Result<Vec<employees::Model>, DbErr> {
    active_by_name()
        .filter(employees::Column::ManagerId.is_null())
        .all(db)
        .await
}

/// List active employees hired within the inclusive date range.
pub async fn list_hired_between<C: ConnectionTrait>(
    db: &C,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<Vec<employees::Model>, DbErr> {
    active_by_name()
        .filter(employees::Column::HireDate.between(start_date, end_date))
        .all(db)
        .await
}

/// List active employees whose salary lies within the inclusive range.
pub async fn list_salary_between<C: ConnectionTrait>(
    db: &C,
    min_salary: Decimal,
    max_salary: Decimal,
) -> Result<Vec<employees::Model>, DbErr> {
    active_by_name()
        .filter(employees::Column::Salary.between(min_salary, max_salary))
        .all(db)
        .await
}

/// Active employees whose first, last or full name contains `term`.
pub async fn search_by_name<C: ConnectionTrait>(db: &C, term: &str) -> Result<Vec<employees::Model>, DbErr> {
    let full_name = Expr::expr(Func::lower(Expr::cust("first_name || ' ' || last_name")));

    active_by_name()
        .filter(
            Condition::any()
                .add(contains_ignore_case(employees::Column::FirstName, term))
                .add(contains_ignore_case(employees::Column::LastName, term))
                .add(like_lower(full_name, term)),
        )
        .all(db)
        .await
}

/// Distinct departments with at least one active employee, sorted.
pub async fn distinct_departments<C: ConnectionTrait>(db: &C) -> Result<Vec<String>, DbErr> {
    invariants::active_only()
        .select_only()
        .column(employees::Column::Department)
        .distinct()
        .order_by_asc(employees::Column::Department)
        .into_tuple()
        .all(db)
        .await
}

/// Distinct positions held by active employees, sorted.
pub async fn distinct_positions<C: ConnectionTrait>(db: &C) -> Result<Vec<String>, DbErr> {
    invariants::active_only()
        .select_only()
        .column(employees::Column::Position)
        .distinct()
        .order_by_asc(employees::Column::Position)
        .into_tuple()
        .all(db)
        .await
}

/// Active head count per department, sorted by department.
pub async fn count_by_department<C: ConnectionTrait>(db: &C) -> Result<Vec<DepartmentCount>, DbErr> {
    invariants::active_only()
        .select_only()
        .column(employees::Column::Department)
        .column_as(Expr::col(employees::Column::Id).count(), "count")
        .group_by(employees::Column::Department)
        .order_by_asc(employees::Column::Department)
        .into_model::<DepartmentCount>()
        .all(db)
        .await
}

/// Get employee by ID regardless of active status.
pub async fn get_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<employees::Model>, DbErr> {
    Employees::find_by_id(id).one(db).await
}

/// Display names for the given ids, regardless of active status.
pub async fn full_names_by_ids<C: ConnectionTrait>(db: &C, ids: &[i32]) -> Result<HashMap<i32, String>, DbErr> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = Employees::find()
        .filter(employees::Column::Id.is_in(ids.iter().copied()))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|m| (m.id, m.full_name())).collect())
}

/// Check if email exists in any row, active or not (case-insensitive).
pub async fn email_exists<C: ConnectionTrait>(db: &C, email: &str, exclude_id: Option<i32>) -> Result<bool, DbErr> {
    let mut query = Employees::find().filter(eq_ignore_case(employees::Column::Email, email));

    if let Some(id) = exclude_id {
        query = query.filter(employees::Column::Id.ne(id));
    }

    let count = query.count(db).await?;
    Ok(count > 0)
}

/// Create a new employee.
pub async fn create<C: ConnectionTrait>(db: &C, data: NewEmployee) -> Result<employees::Model, DbErr> {
    let now = Utc::now();
    let model = employees::ActiveModel {
        first_name: Set(data.first_name),
        last_name: Set(data.last_name),
        email: Set(data.email),
        phone: Set(data.phone),
        department: Set(data.department),
        position: Set(data.position),
        salary: Set(data.salary),
        hire_date: Set(data.hire_date),
        manager_id: Set(data.manager_id),
        is_active: Set(data.is_active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    model.insert(db).await
}

/// Overwrite the mutable fields of an existing employee.
pub async fn update<C: ConnectionTrait>(
    db: &C,
    existing: employees::Model,
    data: EmployeeChanges,
) -> Result<employees::Model, DbErr> {
    let mut active: employees::ActiveModel = existing.into();

    active.first_name = Set(data.first_name);
    active.last_name = Set(data.last_name);
    active.email = Set(data.email);
    active.phone = Set(data.phone);
    active.department = Set(data.department);
    active.position = Set(data.position);
    active.salary = Set(data.salary);
    active.manager_id = Set(data.manager_id);
    if let Some(hire_date) = data.hire_date {
        active.hire_date = Set(hire_date);
    }
    if let Some(is_active) = data.is_active {
        active.is_active = Set(is_active);
    }
    active.updated_at = Set(Utc::now());

    active.update(db).await
}

/// Flip the active flag. The row itself is never removed.
pub async fn set_active<C: ConnectionTrait>(
    db: &C,
    existing: employees::Model,
    is_active: bool,
) -> Result<employees::Model, DbErr> {
    let mut active: employees::ActiveModel = existing.into();
    active.is_active = Set(is_active);
    active.updated_at = Set(Utc::now());
    active.update(db).await
}

/// Get total employee count, active and inactive.
pub async fn count_all<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    Employees::find().count(db).await
}

/// Get active employee count.
pub async fn count_active<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    invariants::active_only().count(db).await
}
