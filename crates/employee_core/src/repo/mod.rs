//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the employee storage contract used by services.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `NoMatch`,
//!   `AmbiguousMatch`) in addition to DB transport errors.

pub mod employee_repo;
