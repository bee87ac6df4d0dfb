//! Employee use-case service.
//!
//! # Responsibility
//! - Create employees while keeping email values unique.
//! - Provide lookup and update entry points over repository persistence.
//!
//! # Invariants
//! - `create_employee` performs one email lookup and at most one write.
//! - The uniqueness check is not isolated from concurrent creators; two
//!   racing calls with the same email can both insert.
//! - Log events carry ids only, never email or name values.

use crate::model::employee::{Employee, EmployeeId};
use crate::repo::employee_repo::{EmployeeRepository, EmployeeStore, RepoError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for employee use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Another employee already owns this email.
    DuplicateResource { email: String },
    /// Update requested for a record that was never saved.
    MissingId,
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateResource { email } => {
                write!(f, "employee with email {email} already exists")
            }
            Self::MissingId => write!(f, "employee has no id; create it first"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Use-case service over an injected employee store.
pub struct EmployeeService<S: EmployeeStore> {
    store: S,
}

impl<S: EmployeeStore> EmployeeService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Creates an employee unless its email is already taken.
    ///
    /// # Contract
    /// - Fails with `DuplicateResource` when `find_by_email` returns a record.
    /// - Otherwise returns the saved record with `id` populated.
    pub fn create_employee(&self, candidate: &Employee) -> ServiceResult<Employee> {
        if let Some(existing) = self.store.find_by_email(&candidate.email)? {
            warn!(
                "event=employee_create module=service status=rejected reason=duplicate_email existing_id={}",
                display_id(existing.id)
            );
            return Err(ServiceError::DuplicateResource {
                email: candidate.email.clone(),
            });
        }

        let saved = self.store.save(candidate)?;
        info!(
            "event=employee_create module=service status=ok id={}",
            display_id(saved.id)
        );
        Ok(saved)
    }
}

impl<R: EmployeeRepository> EmployeeService<R> {
    /// Rewrites a saved employee, keeping emails unique across records.
    ///
    /// # Contract
    /// - Fails with `MissingId` when `employee.id` is `None`.
    /// - Fails with `DuplicateResource` when the email changes to one another
    ///   record already owns. An unchanged email is never re-checked, so rows
    ///   that share an email through the creation race stay editable.
    /// - Fails with repository `NotFound` for unknown ids.
    pub fn update_employee(&self, employee: &Employee) -> ServiceResult<Employee> {
        let Some(id) = employee.id else {
            return Err(ServiceError::MissingId);
        };

        let current = self
            .store
            .find_by_id(id)?
            .ok_or(RepoError::NotFound(id))?;
        if current.email != employee.email {
            if let Some(owner) = self.store.find_by_email(&employee.email)? {
                warn!(
                    "event=employee_update module=service status=rejected reason=duplicate_email id={} existing_id={}",
                    id,
                    display_id(owner.id)
                );
                return Err(ServiceError::DuplicateResource {
                    email: employee.email.clone(),
                });
            }
        }

        let saved = self.store.save(employee)?;
        info!("event=employee_update module=service status=ok id={id}");
        Ok(saved)
    }

    pub fn get_employee(&self, id: EmployeeId) -> ServiceResult<Option<Employee>> {
        Ok(self.store.find_by_id(id)?)
    }

    pub fn find_employee_by_email(&self, email: &str) -> ServiceResult<Option<Employee>> {
        Ok(self.store.find_by_email(email)?)
    }

    /// Returns the single employee with this first and last name.
    pub fn find_employee_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> ServiceResult<Employee> {
        Ok(self.store.find_by_first_and_last_name(first_name, last_name)?)
    }

    pub fn list_employees(&self) -> ServiceResult<Vec<Employee>> {
        Ok(self.store.find_all()?)
    }
}

fn display_id(id: Option<EmployeeId>) -> String {
    id.map_or_else(|| "none".to_string(), |id| id.to_string())
}
