//! Core domain logic for the employee directory.
//! This crate is the single source of truth for business invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::employee::{Employee, EmployeeId};
pub use repo::employee_repo::{
    EmployeeRepository, EmployeeStore, RepoError, RepoResult, SqliteEmployeeRepository,
};
pub use service::employee_service::{EmployeeService, ServiceError, ServiceResult};

/// Returns the core crate version; reported by `employee --version`.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
