mod cli;
mod commands;
mod config;
mod observability;
mod output;
mod sample;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use output::print_error;
use sample::Sample;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    observability::init_tracing_with_level(&cli.log_level);

    let settings = config::load_settings(cli.config.as_deref())?;
    let sample = Sample::new(settings)?;
    let format = cli.format.unwrap_or_default();

    match &cli.command {
        Commands::Sdl => commands::schema::sdl(&sample)?,
        Commands::Types => commands::schema::types(&sample, format)?,
        Commands::Query(args) => commands::execute::query(&sample, args, format).await?,
        Commands::Subscribe(args) => commands::execute::subscribe(&sample, args, format).await?,
    }

    Ok(())
}
