//! Domain model for employee records.
//!
//! # Responsibility
//! - Define the plain data structures shared by repository and service layers.
//!
//! # Invariants
//! - Model types carry no persistence behavior.
//! - Identifiers are assigned by storage, never invented by callers.

pub mod employee;
