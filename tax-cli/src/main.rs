use std::io;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use tax_cli::cli::Cli;
use tax_cli::config::AppConfig;
use tax_cli::{app, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_default_logging();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    // --log-level beats RUST_LOG, which beats the config file.
    match (&cli.log_level, &config.logging.level) {
        (Some(level), _) => logging::set_log_level(level)?,
        (None, Some(level)) if std::env::var_os("RUST_LOG").is_none() => {
            logging::set_log_level(level)?
        }
        _ => {}
    }
    if cli.quiet {
        logging::set_console_enabled(false)?;
    }
    if let Some(path) = &config.logging.file {
        logging::enable_file_logging(path)?;
    }

    let mut db_config = config.database.clone();
    if let Some(db) = &cli.db {
        db_config.connection_string = db.clone();
    }

    debug!(backend = %db_config.backend, "connecting to history store");
    let registry = app::build_registry();
    let repo = registry
        .create(&db_config)
        .await
        .with_context(|| format!("cannot open history store '{}'", db_config.connection_string))?;

    app::run(&cli.command, &config, &*repo, &mut io::stdout()).await
}
