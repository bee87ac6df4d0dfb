//! Command-line front end for the employee core.
//!
//! # Responsibility
//! - Map subcommands onto `EmployeeService` use-cases.
//! - Print records as JSON on stdout; errors go to stderr with a non-zero exit.
//!
//! # Invariants
//! - Logging starts only when `--log-dir` / `EMPLOYEE_LOG_DIR` is set.
//! - `update` rewrites only the fields passed on the command line.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use employee_core::db::open_db;
use employee_core::{
    default_log_level, init_logging, Employee, EmployeeId, EmployeeService,
    SqliteEmployeeRepository,
};
use log::info;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version = employee_core::core_version(), about = "Manage employee records", long_about = None)]
#[command(name = "employee")]
struct Cli {
    /// SQLite database file; created and migrated on first use.
    #[arg(long, env = "EMPLOYEE_DB", default_value = "employees.sqlite3")]
    db: PathBuf,
    #[arg(long, env = "EMPLOYEE_LOG_LEVEL")]
    log_level: Option<String>,
    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "EMPLOYEE_LOG_DIR")]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an employee; fails if the email is already taken.
    Create(CreateArgs),
    Get { id: EmployeeId },
    FindEmail { email: String },
    FindName { first_name: String, last_name: String },
    List,
    /// Rewrite fields of an existing employee.
    Update(UpdateArgs),
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
}

#[derive(Args)]
struct UpdateArgs {
    id: EmployeeId,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    configure_logging(&cli)?;

    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn)?);

    println!("{}", run(cli.command, &service)?);
    Ok(())
}

/// Starts file logging when a log directory is configured.
///
/// Returns whether logging was started.
fn configure_logging(cli: &Cli) -> anyhow::Result<bool> {
    let Some(log_dir) = cli.log_dir.as_deref() else {
        return Ok(false);
    };
    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, log_dir)
        .map_err(|err| anyhow::anyhow!("failed to initialize logging: {err}"))?;
    Ok(true)
}

/// Executes one subcommand and returns its pretty-printed JSON output.
fn run(
    command: Commands,
    service: &EmployeeService<SqliteEmployeeRepository<'_>>,
) -> anyhow::Result<String> {
    info!("event=cli_command module=cli status=start");

    let output = match command {
        Commands::Create(args) => {
            let candidate = Employee::new(args.first_name, args.last_name, args.email);
            serde_json::to_string_pretty(&service.create_employee(&candidate)?)?
        }
        Commands::Get { id } => match service.get_employee(id)? {
            Some(employee) => serde_json::to_string_pretty(&employee)?,
            None => bail!("employee not found: {id}"),
        },
        Commands::FindEmail { email } => match service.find_employee_by_email(&email)? {
            Some(employee) => serde_json::to_string_pretty(&employee)?,
            None => bail!("no employee with email {email}"),
        },
        Commands::FindName {
            first_name,
            last_name,
        } => {
            let employee = service.find_employee_by_name(&first_name, &last_name)?;
            serde_json::to_string_pretty(&employee)?
        }
        Commands::List => serde_json::to_string_pretty(&service.list_employees()?)?,
        Commands::Update(args) => {
            let Some(mut employee) = service.get_employee(args.id)? else {
                bail!("employee not found: {}", args.id);
            };
            if let Some(first_name) = args.first_name {
                employee.first_name = first_name;
            }
            if let Some(last_name) = args.last_name {
                employee.last_name = last_name;
            }
            if let Some(email) = args.email {
                employee.email = email;
            }
            serde_json::to_string_pretty(&service.update_employee(&employee)?)?
        }
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::{configure_logging, run, Cli, Commands};
    use clap::{CommandFactory, Parser};
    use employee_core::db::open_db_in_memory;
    use employee_core::{Employee, EmployeeService, SqliteEmployeeRepository};

    fn command(args: &[&str]) -> Commands {
        let argv = std::iter::once("employee").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap().command
    }

    fn create_rochan() -> Commands {
        command(&[
            "create",
            "--first-name",
            "Rochan",
            "--last-name",
            "Golden",
            "--email",
            "rochanry@gmail.com",
        ])
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_create_with_global_db_flag() {
        let cli = Cli::try_parse_from([
            "employee",
            "--db",
            "/tmp/staff.sqlite3",
            "create",
            "--first-name",
            "Rochan",
            "--last-name",
            "Golden",
            "--email",
            "rochanry@gmail.com",
        ])
        .unwrap();

        assert_eq!(cli.db.to_str(), Some("/tmp/staff.sqlite3"));
        assert!(matches!(cli.command, Commands::Create(_)));
    }

    #[test]
    fn create_prints_record_and_duplicate_create_fails_naming_email() {
        let conn = open_db_in_memory().unwrap();
        let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());

        let output = run(create_rochan(), &service).unwrap();
        let created: Employee = serde_json::from_str(&output).unwrap();
        assert!(created.id.is_some());
        assert_eq!(created.email, "rochanry@gmail.com");

        let err = run(create_rochan(), &service).unwrap_err();
        assert_eq!(
            err.to_string(),
            "employee with email rochanry@gmail.com already exists"
        );
    }

    #[test]
    fn update_rewrites_only_given_fields() {
        let conn = open_db_in_memory().unwrap();
        let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
        let created: Employee =
            serde_json::from_str(&run(create_rochan(), &service).unwrap()).unwrap();
        let id = created.id.unwrap().to_string();

        let output = run(
            command(&["update", &id, "--email", "henryoseimensah@gmail.com"]),
            &service,
        )
        .unwrap();
        let updated: Employee = serde_json::from_str(&output).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.email, "henryoseimensah@gmail.com");
        assert_eq!(updated.first_name, "Rochan");
        assert_eq!(updated.last_name, "Golden");
        assert!(run(command(&["find-email", "rochanry@gmail.com"]), &service).is_err());
    }

    #[test]
    fn lookups_of_missing_records_fail() {
        let conn = open_db_in_memory().unwrap();
        let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());

        let err = run(command(&["get", "42"]), &service).unwrap_err();
        assert_eq!(err.to_string(), "employee not found: 42");
        let err = run(command(&["update", "42", "--last-name", "X"]), &service).unwrap_err();
        assert_eq!(err.to_string(), "employee not found: 42");
        assert!(run(command(&["find-name", "Rochan", "Golden"]), &service).is_err());
    }

    #[test]
    fn list_and_find_name_print_stored_records() {
        let conn = open_db_in_memory().unwrap();
        let service = EmployeeService::new(SqliteEmployeeRepository::try_new(&conn).unwrap());
        run(create_rochan(), &service).unwrap();

        let listed: Vec<Employee> =
            serde_json::from_str(&run(command(&["list"]), &service).unwrap()).unwrap();
        assert_eq!(listed.len(), 1);

        let found: Employee = serde_json::from_str(
            &run(command(&["find-name", "Rochan", "Golden"]), &service).unwrap(),
        )
        .unwrap();
        assert_eq!(found, listed[0]);
    }

    #[test]
    fn logging_stays_off_without_log_dir() {
        let cli = Cli::try_parse_from(["employee", "list"]).unwrap();
        if cli.log_dir.is_none() {
            assert!(!configure_logging(&cli).unwrap());
        }

        let cli = Cli::try_parse_from(["employee", "--log-dir", "relative/logs", "list"]).unwrap();
        assert!(configure_logging(&cli).is_err());
    }
}
