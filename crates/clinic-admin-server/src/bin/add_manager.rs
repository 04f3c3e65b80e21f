//! Create the manager account the admin panel signs in with.

#![forbid(unsafe_code)]

use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use clap::Parser;
use clinic_admin_core::service::AccountService;
use clinic_admin_core::{Database, Gender, NewManager, ProvisionOutcome};
use clinic_admin_server::config::DEFAULT_DB_PATH;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clinic-add-manager")]
#[command(about = "Provision the clinic manager account")]
struct Cli {
    #[arg(long, env = "CLINIC_DB_PATH", default_value = DEFAULT_DB_PATH)]
    db_path: std::path::PathBuf,
    #[arg(long, default_value = "manager@gmail.com")]
    email: String,
    #[arg(long, env = "CLINIC_MANAGER_PASSWORD")]
    password: String,
    #[arg(long, default_value = "John")]
    name: String,
    #[arg(long, default_value = "Doe")]
    surname: String,
    #[arg(long, default_value = "")]
    patronymic_name: String,
    #[arg(long, default_value = "Male", value_parser = parse_gender)]
    gender: Gender,
    /// YYYY-MM-DD
    #[arg(long, default_value = "1980-01-01", value_parser = parse_date)]
    date_of_birth: NaiveDate,
    #[arg(long, default_value = "New York")]
    residence: String,
    #[arg(long, default_value = "1234567890")]
    phone_number: String,
    #[arg(long, default_value = "")]
    additional_phone: String,
}

fn parse_gender(raw: &str) -> Result<Gender, String> {
    raw.parse().map_err(|e: clinic_admin_core::models::UnknownVariant| e.to_string())
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| e.to_string())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if cli.password.is_empty() {
        return Err(anyhow!("password must not be empty"));
    }

    let db = Database::open(&cli.db_path)
        .with_context(|| format!("opening database at {}", cli.db_path.display()))?;
    let details = NewManager {
        email: cli.email.clone(),
        password: cli.password,
        name: cli.name,
        surname: cli.surname,
        patronymic_name: cli.patronymic_name,
        gender: cli.gender,
        date_of_birth: cli.date_of_birth,
        residence: cli.residence,
        phone_number: cli.phone_number,
        additional_phone: cli.additional_phone,
    };

    match AccountService::new(&db)
        .provision_manager(details)
        .context("provisioning manager")?
    {
        ProvisionOutcome::Created(user) => println!("Manager added successfully: {}", user.email),
        ProvisionOutcome::AlreadyExists => println!("Manager already exists: {}", cli.email),
    }
    Ok(())
}
