//! Employee DTOs for create, update, search and responses.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};

use crate::entities::employees;
use crate::error::{AppError, FieldErrors, Result};
use crate::validation::{self, MAX_DEPARTMENT_LEN, MAX_NAME_LEN, MAX_PHONE_LEN, MAX_POSITION_LEN};

/// Body of create and update requests.
///
/// Update overwrites every field with the request value, except `hire_date`
/// and `is_active`, which are only applied when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub position: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub salary: Option<Decimal>,
    pub hire_date: Option<NaiveDate>,
    pub manager_id: Option<i32>,
    pub is_active: Option<bool>,
}

impl EmployeeRequest {
    /// Check field constraints, collecting every violation.
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();

        validation::required_text(&mut errors, "firstName", "First name", &self.first_name, MAX_NAME_LEN);
        validation::required_text(&mut errors, "lastName", "Last name", &self.last_name, MAX_NAME_LEN);
        validation::email(&mut errors, "email", &self.email);
        validation::optional_text(&mut errors, "phone", "Phone number", self.phone.as_deref(), MAX_PHONE_LEN);
        validation::required_text(&mut errors, "department", "Department", &self.department, MAX_DEPARTMENT_LEN);
        validation::required_text(&mut errors, "position", "Position", &self.position, MAX_POSITION_LEN);
        validation::salary(&mut errors, "salary", self.salary);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::InvalidFields(errors))
        }
    }
}

/// Employee as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeView {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: String,
    pub position: String,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub salary: Option<Decimal>,
    pub hire_date: NaiveDate,
    pub manager_id: Option<i32>,
    pub manager_name: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EmployeeView {
    /// Build a view from a stored row and the manager's resolved name.
    pub fn from_model(model: employees::Model, manager_name: Option<String>) -> Self {
        Self {
            full_name: model.full_name(),
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            phone: model.phone,
            department: model.department,
            position: model.position,
            salary: model.salary,
            hire_date: model.hire_date,
            manager_id: model.manager_id,
            manager_name,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Body of the search endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchCriteria {
    pub search_term: Option<String>,
    pub department: Option<String>,
    pub position: Option<String>,
    pub page: u64,
    pub size: u64,
    pub sort_by: String,
    pub sort_direction: String,
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            search_term: None,
            department: None,
            position: None,
            page: 0,
            size: 10,
            sort_by: "lastName".to_string(),
            sort_direction: "ASC".to_string(),
        }
    }
}

/// Active head count for one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromQueryResult)]
pub struct DepartmentCount {
    pub department: String,
    pub count: i64,
}
