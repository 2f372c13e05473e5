pub mod app;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jsonlinesdb")]
#[command(about = "Query JSON Lines files as read-only SQL tables")]
#[command(version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Name of the row identifier pseudo-column
    #[arg(long, default_value = jsonlinesdb::adapter::DEFAULT_ROW_ID_COLUMN)]
    pub row_id_column: String,

    /// Skip malformed lines instead of failing
    #[arg(long)]
    pub skip_invalid: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the inferred schema of a file
    Describe {
        path: PathBuf,
    },
    /// Run a SELECT against the file named in FROM
    Query {
        sql: String,
    },
}
