//! Employee Directory - REST service for employee records.

pub mod api;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod invariants;
pub mod logging;
pub mod models;
pub mod service;
pub mod validation;

pub use error::{AppError, Result};
