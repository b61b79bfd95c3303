//! Insurance Manager CLI - record clients and their policies

use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use insurance_manager::config::{self, InsuranceConfig};
use insurance_manager::shell::Shell;
use insurance_manager::storage::SqliteStore;
use insurance_manager::ui::{self, Icons};
use insurance_manager::{PolicyForm, Session};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "insurance-manager")]
#[command(version)]
#[command(about = "Record insurance clients and their policies in a local SQLite database")]
#[command(long_about = r#"
Insurance Manager keeps clients and their policies in a local database file.

Example usage:
  insurance-manager add-client --name "Jane Doe" --contact 555-1234 --email jane@x.com
  insurance-manager add-policy --client-id 1 --type Auto --company "Acme Co" --number POL-100 --amount 999.99
  insurance-manager search jane
  insurance-manager shell
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log every SQL statement (debug level)
    #[arg(long, global = true)]
    echo: bool,

    /// Path to the database file
    #[arg(short, long, global = true, env = "INSURANCE_DB")]
    database: Option<PathBuf>,

    /// Path to the config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Search policies by client name (case-insensitive substring)
    Search {
        /// Part of the client name
        term: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add a new client
    AddClient {
        #[arg(short, long)]
        name: String,

        #[arg(long, default_value = "")]
        contact: String,

        #[arg(long, default_value = "")]
        email: String,
    },

    /// Add a policy for an existing client
    AddPolicy {
        /// Client the policy belongs to
        #[arg(long)]
        client_id: i64,

        /// Policy type (e.g. Auto, Life)
        #[arg(short = 't', long = "type")]
        policy_type: String,

        /// Insurance company
        #[arg(long)]
        company: String,

        /// Policy number
        #[arg(long)]
        number: String,

        /// Investment amount
        #[arg(long)]
        amount: String,

        #[arg(long, default_value = "")]
        start_date: String,

        #[arg(long, default_value = "")]
        end_date: String,
    },

    /// Show record counts
    Stats,

    /// Interactive form-style session
    Shell,

    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::report_failure(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let loaded = config::load_config(cli.config.as_deref())?;
    let database = config::resolve_database_path(cli.database.as_deref(), loaded.as_ref());
    let echo = cli.echo || loaded.as_ref().is_some_and(|c| c.echo);

    match cli.command {
        Commands::Search { term, format } => {
            let records = open_session(&database, echo)?.search(&term)?;
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
                OutputFormat::Text if records.is_empty() => ui::info("Info", "No results found"),
                OutputFormat::Text => {
                    println!("{} {} result(s) for '{}'", Icons::SEARCH, records.len(), term.trim());
                    println!("{}", ui::policy_table(&records));
                }
            }
        }

        Commands::AddClient { name, contact, email } => {
            let mut session = open_session(&database, echo)?;
            let client = session.add_client(&name, &contact, &email)?;
            ui::success("Client added successfully");
            ui::summary_row("Client id:", &client.id.to_string());
        }

        Commands::AddPolicy {
            client_id,
            policy_type,
            company,
            number,
            amount,
            start_date,
            end_date,
        } => {
            let mut session = open_session(&database, echo)?;
            let client = session.select_client(client_id)?;
            let form = PolicyForm::new(policy_type, company, number, amount).with_dates(start_date, end_date);
            let policy = session.add_policy(&form)?;
            ui::success("Policy added successfully");
            ui::summary_row("Policy id:", &policy.id.to_string());
            ui::summary_row("Client:", &format!("{} (id {})", client.name, client.id));
        }

        Commands::Stats => {
            let stats = open_session(&database, echo)?.store().stats()?;
            ui::header(&format!("{} Insurance Statistics ({})", Icons::STATS, database.display()));
            println!(
                "{}",
                ui::stats_table(&[
                    ("Clients", &stats.clients.to_string()),
                    ("Policies", &stats.policies.to_string()),
                ])
            );
        }

        Commands::Shell => {
            let mut session = open_session(&database, echo)?;
            let stdin = std::io::stdin();
            Shell::new(&mut session, stdin.lock(), std::io::stdout(), ui::theme().clone()).run()?;
        }

        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            let defaults = InsuranceConfig {
                database: Some(database.display().to_string()),
                echo,
            };
            config::write_config(&path, &defaults, force)?;
            ui::success(&format!("Wrote {}", path.display()));
        }
    }

    Ok(())
}

fn open_session(database: &Path, echo: bool) -> anyhow::Result<Session> {
    config::ensure_db_dir(database)?;
    let mut store = SqliteStore::open(database)?;
    store.set_echo(echo);
    tracing::debug!("{} Using database {}", Icons::DATABASE, database.display());
    Ok(Session::new(store))
}
