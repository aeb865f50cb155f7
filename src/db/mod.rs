//! Database connection pool and operations.

pub mod connection;
pub mod employee;
pub mod query;

pub use connection::{TableCounts, backend_name, connect, ensure_schema, get_table_counts, test_connection};
