mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use migrun_core::{
    DatabaseConfig, MigratorConfig, TableName, DEFAULT_DRIVER, DEFAULT_MIGRATION_DIR,
    DEFAULT_PG_PORT, DEFAULT_TRACKING_TABLE,
};
use migrun_service::MigrateError;
use tracing_subscriber::EnvFilter;

/// Exit status used when the run is interrupted (128 + SIGINT).
const EXIT_INTERRUPTED: u8 = 130;

/// Logged on Ctrl-C. The run may not have opened a transaction yet.
const INTERRUPTED_MESSAGE: &str = "interrupted; any open migration transaction is rolled back";

#[derive(Parser)]
#[command(name = "migrun")]
#[command(about = "Apply pending SQL migrations in a single tracked transaction", long_about = None)]
struct Cli {
    #[command(flatten)]
    db: DbArgs,

    /// Directory holding the migration files, applied in file-name order
    #[arg(long, env = "MIGRATION_DIR", default_value = DEFAULT_MIGRATION_DIR, global = true)]
    dir: PathBuf,

    /// Table recording which migrations have been applied
    #[arg(long, env = "MIGRATION_TABLE", default_value = DEFAULT_TRACKING_TABLE, global = true)]
    table: TableName,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct DbArgs {
    #[arg(long, env = "DB_DRIVER", default_value = DEFAULT_DRIVER, global = true)]
    driver: String,
    #[arg(short = 'H', long, env = "DB_HOST", default_value = "localhost", global = true)]
    host: String,
    #[arg(short, long, env = "DB_PORT", default_value_t = DEFAULT_PG_PORT, global = true)]
    port: u16,
    #[arg(short, long, env = "DB_USER", default_value = "postgres", global = true)]
    user: String,
    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true, global = true)]
    password: String,
    #[arg(short, long, env = "DB_NAME", global = true)]
    database: Option<String>,
}

impl From<DbArgs> for DatabaseConfig {
    fn from(args: DbArgs) -> Self {
        Self {
            driver: args.driver,
            host: args.host,
            port: args.port,
            user: args.user,
            password: args.password,
            database: args.database.unwrap_or_default(),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Apply every pending migration (default)
    Up,
    /// Show applied and pending migrations as JSON without applying anything
    Status,
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = MigratorConfig { directory: cli.dir, table: cli.table };
    let db = DatabaseConfig::from(cli.db);

    match cli.command.unwrap_or(Commands::Up) {
        Commands::Up => commands::up::run(&db, config).await,
        Commands::Status => commands::status::run(&db, config).await,
    }
}

fn report_failure(err: &anyhow::Error) {
    match err.downcast_ref::<MigrateError>() {
        Some(migrate_err) => tracing::error!(
            phase = migrate_err.phase(),
            migration = migrate_err.migration_name(),
            rollback_failed = migrate_err.rollback_failed(),
            "{migrate_err}"
        ),
        None => tracing::error!("{err:#}"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    // Dropping the run future drops any open transaction, which rolls it back.
    let outcome = tokio::select! {
        result = dispatch(cli) => result,
        Ok(()) = tokio::signal::ctrl_c() => {
            tracing::warn!("{INTERRUPTED_MESSAGE}");
            return ExitCode::from(EXIT_INTERRUPTED);
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_failure(&err);
            ExitCode::FAILURE
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interrupt_message_does_not_assume_a_batch() {
        assert!(INTERRUPTED_MESSAGE.contains("any open migration transaction"));
        assert!(!INTERRUPTED_MESSAGE.contains("pending batch"));
    }

    #[test]
    fn test_no_subcommand_defaults_to_up() {
        let cli = Cli::try_parse_from(["migrun", "-d", "app"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.table.as_str(), DEFAULT_TRACKING_TABLE);
    }
}
