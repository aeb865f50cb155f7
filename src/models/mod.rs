//! Wire shapes for employee requests, responses and result pages.

pub mod employee;
pub mod page;

pub use employee::{DepartmentCount, EmployeeRequest, EmployeeView, SearchCriteria};
pub use page::Page;
