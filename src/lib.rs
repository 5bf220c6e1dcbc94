pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod infra;

use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use cli::{Cli, Command};
use commands::person::{cmd_person_insert, cmd_person_list};
use commands::store::{cmd_store_init, open_ready_store};
use commands::OutputFormat;
use config::StoreConfig;
use error::{AppError, USAGE_EXIT_CODE};
use log::LevelFilter;
use std::io;

fn init_logging(level: LevelFilter) {
    let env = env_logger::Env::default().default_filter_or(level.as_str());
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already installed");
    }
}

/// Parse arguments, run one command, and return the process exit code.
pub fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return report_usage(&err),
    };
    let config = StoreConfig::from_env(cli.db.clone(), cli.verbose);
    init_logging(config.log_level);

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    match execute(&cli.command, &config, format) {
        Ok(()) => 0,
        Err(e) => {
            report_error(&e, format);
            e.exit_code()
        }
    }
}

/// Help and version exit 0; argument errors exit with `USAGE_EXIT_CODE`, apart
/// from every `AppError` code.
fn report_usage(err: &clap::Error) -> i32 {
    let printed = err.print();
    match err.kind() {
        ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion if printed.is_ok() => 0,
        ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion => {
            AppError::Output("failed to write help".into()).exit_code()
        }
        _ => USAGE_EXIT_CODE,
    }
}

fn execute(command: &Command, config: &StoreConfig, format: OutputFormat) -> Result<(), AppError> {
    log::info!("DB path: {:?}", config.db_path);
    let (mut store, status) = open_ready_store(&config.db_path).map_err(|e| {
        log::error!("Store init failed: {}", e);
        e
    })?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = match command {
        Command::Init => cmd_store_init(&status, &mut out, format),
        Command::Insert { name } => cmd_person_insert(
            &store,
            name.clone(),
            &mut io::stdin().lock(),
            &mut out,
            format,
        )
        .map(|_| ()),
        Command::List => cmd_person_list(&store, &mut out, format).map(|_| ()),
    };

    // Close on every path; a command failure takes precedence over a close failure.
    let closed = store.close();
    result?;
    closed
}

fn report_error(e: &AppError, format: OutputFormat) {
    match format {
        OutputFormat::Text => eprintln!("error: {}", e),
        OutputFormat::Json => match serde_json::to_string(e) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("error: {}", e),
        },
    }
}
