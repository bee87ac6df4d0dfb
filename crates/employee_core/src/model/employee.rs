//! Employee domain model.
//!
//! # Responsibility
//! - Define the canonical employee record.
//!
//! # Invariants
//! - `id` is `None` until the record has been inserted once.
//! - `id` is never changed after assignment.
//! - At most one employee exists per `email`; this is enforced by
//!   `EmployeeService`, not by this type.

use serde::{Deserialize, Serialize};

/// Storage-assigned employee identifier.
pub type EmployeeId = i64;

/// Canonical employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// `None` for records that were never saved.
    pub id: Option<EmployeeId>,
    pub first_name: String,
    pub last_name: String,
    /// Compared exactly and case-sensitively by lookups.
    pub email: String,
}

impl Employee {
    /// Creates an unsaved employee record.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }

    /// Creates a record for an identifier that storage already assigned.
    ///
    /// Used when re-hydrating rows and by callers rewriting a known record.
    pub fn with_id(
        id: EmployeeId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(id),
            ..Self::new(first_name, last_name, email)
        }
    }
}
