//! Guardian import command line
//!
//! ```bash
//! # Import a CSV for one organization
//! usermgmt import guardians.csv --organization org-1 --country COUNTRY_JP
//!
//! # Deliver queued import events until interrupted
//! usermgmt worker
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use usermgmt::modules::guardian_import::{ImportContext, ImportGuardiansCommand};
use usermgmt::shared::application::UseCase;
use usermgmt::shared::utils::logger::init_logger;
use usermgmt::shared::{AppConfig, Database};
use usermgmt::{build_import_handler, build_worker};

#[derive(Parser, Debug)]
#[command(name = "usermgmt")]
#[command(author, version, about = "Guardian batch import", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import guardians from a CSV file
    Import {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Organization receiving the guardians
        #[arg(long, env = "IMPORT_ORGANIZATION_ID")]
        organization: String,

        /// Country code stored on every created guardian
        #[arg(long, default_value = "COUNTRY_JP")]
        country: String,

        /// Recorded as importer on the ledger rows
        #[arg(long, default_value = "cli")]
        importer: String,

        /// Organization signs in with usernames instead of emails
        #[arg(long)]
        username_login: bool,
    },

    /// Run the background worker until Ctrl-C
    Worker,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logger();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = AppConfig::from_env().context("loading configuration")?;
    let database = Arc::new(Database::new(&config.database_url).context("connecting to database")?);

    let applied = database.run_migrations().context("running migrations")?;
    if applied > 0 {
        log::info!("Applied {} pending migrations", applied);
    }

    match cli.command {
        Command::Import {
            file,
            organization,
            country,
            importer,
            username_login,
        } => {
            let payload = tokio::fs::read(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;

            let context = ImportContext::new(&organization, &country, &importer)
                .with_username_login(username_login);
            let handler = build_import_handler(&config, database);
            let result = handler
                .execute(ImportGuardiansCommand::new(payload, context))
                .await?;

            println!("{}", serde_json::to_string_pretty(&result)?);
            Ok(if result.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            })
        }
        Command::Worker => {
            let worker = build_worker(&config, database);
            let handle = tokio::spawn(Arc::clone(&worker).run());

            tokio::signal::ctrl_c().await.context("waiting for Ctrl-C")?;
            worker.stop().await;
            handle.await.context("joining worker")?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
