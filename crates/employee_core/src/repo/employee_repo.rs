//! Employee repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide the storage contract consumed by `EmployeeService`.
//! - Keep SQL and row mapping details inside the persistence boundary.
//!
//! # Invariants
//! - `save` inserts when `id` is `None` and rewrites the whole row otherwise.
//! - Identifiers come from SQLite; saving an unknown `id` is `NotFound`.
//! - Email lookups are exact and case-sensitive (SQLite `BINARY` collation).
//! - No storage-level email uniqueness is enforced here.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::employee::{Employee, EmployeeId};
use rusqlite::types::FromSql;
use rusqlite::{params, Connection, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EMPLOYEES_TABLE: &str = "employees";
const EMPLOYEE_COLUMNS: &[&str] = &["id", "first_name", "last_name", "email"];

const EMPLOYEE_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    last_name,
    email
FROM employees";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for employee persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Update target does not exist.
    NotFound(EmployeeId),
    /// Two-field lookup matched no row.
    NoMatch {
        first_name: String,
        last_name: String,
    },
    /// Two-field lookup matched more than one row.
    AmbiguousMatch {
        first_name: String,
        last_name: String,
        count: usize,
    },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "employee not found: {id}"),
            Self::NoMatch {
                first_name,
                last_name,
            } => write!(f, "no employee named `{first_name} {last_name}`"),
            Self::AmbiguousMatch {
                first_name,
                last_name,
                count,
            } => write!(
                f,
                "{count} employees named `{first_name} {last_name}`; expected exactly one"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted employee data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match required {expected_version}; open it with db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Minimal storage capability needed for uniqueness-checked creation.
pub trait EmployeeStore {
    /// Inserts (no `id`) or rewrites (with `id`) one record and returns it
    /// with `id` populated.
    ///
    /// A record carrying an `id` that has no row fails with `NotFound`; it is
    /// never inserted under a fresh id, unlike merge-style upserts.
    fn save(&self, employee: &Employee) -> RepoResult<Employee>;
    /// Returns the record whose email matches exactly, if any.
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Employee>>;
}

/// Full repository interface for employee records.
pub trait EmployeeRepository: EmployeeStore {
    /// Saves each record in input order. Not atomic: rows saved before a
    /// failing element stay written.
    fn save_all(&self, employees: &[Employee]) -> RepoResult<Vec<Employee>> {
        employees
            .iter()
            .map(|employee| self.save(employee))
            .collect()
    }
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>>;
    /// Fails with `NoMatch` or `AmbiguousMatch` unless exactly one row matches.
    fn find_by_first_and_last_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Employee>;
    fn find_all(&self) -> RepoResult<Vec<Employee>>;
}

/// SQLite-backed employee repository.
pub struct SqliteEmployeeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEmployeeRepository<'conn> {
    /// Wraps a connection that has been opened through `db::open_db*`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not carry the `employees` shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        ensure_employees_schema(conn)?;
        Ok(Self { conn })
    }

    fn insert(&self, employee: &Employee) -> RepoResult<Employee> {
        self.conn.execute(
            "INSERT INTO employees (first_name, last_name, email)
             VALUES (?1, ?2, ?3);",
            params![
                employee.first_name.as_str(),
                employee.last_name.as_str(),
                employee.email.as_str(),
            ],
        )?;

        Ok(Employee {
            id: Some(self.conn.last_insert_rowid()),
            ..employee.clone()
        })
    }

    fn update(&self, id: EmployeeId, employee: &Employee) -> RepoResult<Employee> {
        let changed = self.conn.execute(
            "UPDATE employees
             SET
                first_name = ?1,
                last_name = ?2,
                email = ?3
             WHERE id = ?4;",
            params![
                employee.first_name.as_str(),
                employee.last_name.as_str(),
                employee.email.as_str(),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(employee.clone())
    }

    fn query_employees(&self, sql: &str, bind: impl Params) -> RepoResult<Vec<Employee>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(bind)?;
        let mut employees = Vec::new();

        while let Some(row) = rows.next()? {
            employees.push(parse_employee_row(row)?);
        }

        Ok(employees)
    }
}

impl EmployeeStore for SqliteEmployeeRepository<'_> {
    fn save(&self, employee: &Employee) -> RepoResult<Employee> {
        match employee.id {
            None => self.insert(employee),
            Some(id) => self.update(id, employee),
        }
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Employee>> {
        let mut employees = self.query_employees(
            &format!("{EMPLOYEE_SELECT_SQL} WHERE email = ?1 ORDER BY id ASC LIMIT 1;"),
            [email],
        )?;
        Ok(employees.pop())
    }
}

impl EmployeeRepository for SqliteEmployeeRepository<'_> {
    fn find_by_id(&self, id: EmployeeId) -> RepoResult<Option<Employee>> {
        let mut employees =
            self.query_employees(&format!("{EMPLOYEE_SELECT_SQL} WHERE id = ?1;"), [id])?;
        Ok(employees.pop())
    }

    fn find_by_first_and_last_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepoResult<Employee> {
        let mut employees = self.query_employees(
            &format!(
                "{EMPLOYEE_SELECT_SQL}
                 WHERE first_name = ?1
                   AND last_name = ?2
                 ORDER BY id ASC;"
            ),
            [first_name, last_name],
        )?;

        match employees.len() {
            0 => Err(RepoError::NoMatch {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
            }),
            1 => Ok(employees.remove(0)),
            count => Err(RepoError::AmbiguousMatch {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                count,
            }),
        }
    }

    fn find_all(&self) -> RepoResult<Vec<Employee>> {
        self.query_employees(&format!("{EMPLOYEE_SELECT_SQL} ORDER BY id ASC;"), params![])
    }
}

fn ensure_employees_schema(conn: &Connection) -> RepoResult<()> {
    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [EMPLOYEES_TABLE],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(RepoError::MissingRequiredTable(EMPLOYEES_TABLE));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let present = stmt
        .query_map([EMPLOYEES_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;

    for &column in EMPLOYEE_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(RepoError::MissingRequiredColumn {
                table: EMPLOYEES_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn parse_employee_row(row: &Row<'_>) -> RepoResult<Employee> {
    Ok(Employee {
        id: Some(column(row, "id")?),
        first_name: column(row, "first_name")?,
        last_name: column(row, "last_name")?,
        email: column(row, "email")?,
    })
}

fn column<T: FromSql>(row: &Row<'_>, name: &str) -> RepoResult<T> {
    row.get(name).map_err(|err| match err {
        rusqlite::Error::InvalidColumnType(_, column, value_type) => RepoError::InvalidData(
            format!("unexpected {value_type} value in {EMPLOYEES_TABLE}.{column}"),
        ),
        other => other.into(),
    })
}
