//! Record visibility and reference rules shared by every read and write path.
//!
//! Inactive (soft-deleted) employees are invisible: every list and search
//! query starts from [`active_only`], and every lookup by id that backs a
//! user-facing operation goes through [`require_active_by_id`], so an
//! inactive row and a missing row look the same to callers.
//!
//! Email uniqueness is the one deliberate exception. It spans inactive rows
//! too, so a soft-deleted employee's address stays reserved.

use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Select};

use crate::db::employee;
use crate::entities::{employees, prelude::*};
use crate::error::{AppError, Result};

/// Base select for every list and search path.
pub fn active_only() -> Select<Employees> {
    Employees::find().filter(employees::Column::IsActive.eq(true))
}

/// Fail with `DuplicateResource` if another employee owns `email`, ignoring
/// case and active status. `excluding_id` skips the caller's own row on update.
pub async fn check_email_available<C>(db: &C, email: &str, excluding_id: Option<i32>) -> Result<()>
where
    C: ConnectionTrait,
{
    if employee::email_exists(db, email, excluding_id).await? {
        return Err(AppError::duplicate(format!("Employee with email {email} already exists")));
    }
    Ok(())
}

/// Fail with `NotFound` unless `manager_id` names an existing, active employee.
pub async fn validate_manager<C>(db: &C, manager_id: i32) -> Result<employees::Model>
where
    C: ConnectionTrait,
{
    let manager = employee::get_by_id(db, manager_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Manager not found with id: {manager_id}")))?;

    if !manager.is_active {
        return Err(AppError::not_found(format!("Manager with id {manager_id} is inactive")));
    }
    Ok(manager)
}

/// Fetch an employee by id, treating inactive rows as absent.
pub async fn require_active_by_id<C>(db: &C, id: i32) -> Result<employees::Model>
where
    C: ConnectionTrait,
{
    require_active_by_id_with_reason(db, id, "is inactive").await
}

/// Same as [`require_active_by_id`], with the wording used for inactive rows.
pub async fn require_active_by_id_with_reason<C>(db: &C, id: i32, inactive_reason: &str) -> Result<employees::Model>
where
    C: ConnectionTrait,
{
    let model = employee::get_by_id(db, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Employee not found with id: {id}")))?;

    if !model.is_active {
        return Err(AppError::not_found(format!("Employee with id {id} {inactive_reason}")));
    }
    Ok(model)
}
