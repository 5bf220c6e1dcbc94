//! Command-line arguments for the `store` binary.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

const EXIT_CODES_HELP: &str = "Exit codes:
  0   ok
  1   invalid input
  2   store unavailable
  3   schema error
  4   store closed
  5   output failed
  64  usage error";

#[derive(Debug, Parser)]
#[command(
    name = "store",
    version,
    about = "Local file-backed person records",
    after_help = EXIT_CODES_HELP
)]
pub struct Cli {
    /// Store file (overrides STORE_DB_PATH; default test.db)
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Emit JSON on stdout and JSON errors on stderr
    #[arg(long, global = true)]
    pub json: bool,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Create the store and the people table if absent
    Init,
    /// Insert a person; prompts on stdin when --name is omitted
    Insert {
        #[arg(long)]
        name: Option<String>,
    },
    /// Print every person as `id | name`
    List,
}
