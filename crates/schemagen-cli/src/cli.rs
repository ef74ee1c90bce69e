use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "schemagen")]
#[command(about = "Schemagen CLI: generate and exercise the sample GraphQL schema")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML file with a [schema] table
    #[arg(short, long, global = true, env = "SCHEMAGEN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, env = "SCHEMAGEN_LOG", default_value = "warn")]
    pub log_level: String,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the generated schema in SDL
    Sdl,
    /// List the generated types
    Types,
    /// Execute a query or mutation document
    Query(QueryArgs),
    /// Run a subscription and print each event
    Subscribe(SubscribeArgs),
}

#[derive(clap::Args)]
pub struct QueryArgs {
    /// GraphQL document (reads from stdin if omitted)
    pub document: Option<String>,
    /// Variables as a JSON object
    #[arg(long)]
    pub variables: Option<String>,
}

#[derive(clap::Args)]
pub struct SubscribeArgs {
    /// GraphQL subscription document
    pub document: String,
    /// Stop after this many events
    #[arg(long)]
    pub take: Option<usize>,
}
