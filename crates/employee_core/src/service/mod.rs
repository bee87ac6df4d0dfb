//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Hold the business rules that storage does not enforce.

pub mod employee_service;
