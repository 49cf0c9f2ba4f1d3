mod config;
mod db;
mod describe;
mod logging;
mod models;
mod server;
mod setup;
mod storage;

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;

use config::{Args, DatabaseConnection};
use db::Database;
use describe::Description;
use setup::{SetupContext, SetupOptions, SetupOutcome};
use storage::{JsonStorage, Repository};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init(&args.log_file) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let connection = DatabaseConnection::from_args(&args)?;
    let descriptions = args
        .describe_tables
        .iter()
        .map(|arg| Description::parse_table(arg))
        .chain(args.describe_columns.iter().map(|arg| Description::parse_column(arg)))
        .collect::<Result<Vec<_>, _>>()?;

    let repository_path = args.repository_path()?;
    let mut storage = JsonStorage::open(&repository_path)
        .with_context(|| format!("Could not open repository {}", repository_path.display()))?;

    let database = Database::connect(&connection).await?;
    if let Some(schema) = connection.search_path() {
        database.set_search_path(schema).await?;
    }
    println!("You connected to your database: {}", connection.name);

    if args.reset {
        storage.remove_everything()?;
        log::info!("repository {} reset", storage.path().display());
    }

    let options = SetupOptions { enrich: !args.bare };
    let outcome = SetupContext::new(&database, &mut storage, connection.to_database_info(), options)
        .run()
        .await
        .context("Failed to set up database metadata")?;
    match outcome {
        SetupOutcome::Skipped => println!("Metadata for {} already stored", connection.name),
        SetupOutcome::Extracted { tables, columns } => {
            println!("Stored {} tables and {} columns", tables, columns)
        }
    }

    for description in &descriptions {
        description.apply(&mut storage)?;
    }

    if !args.no_serve {
        server::serve(args.server_port).await?;
    }
    Ok(())
}
