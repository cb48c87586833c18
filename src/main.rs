//! Weft CLI - natural-language requests to integration workflows

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Map;

use weft::catalog::{Catalog, CatalogOptions};
use weft::context::load_context;
use weft::error::{FixSuggestion, WeftError};
use weft::nlu::create_parser;
use weft::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "weft")]
#[command(about = "Weft - turn natural-language requests into integration workflows")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a request and print the resulting workflow as JSON
    Run {
        /// The natural-language request
        request: String,

        /// Path to the integration catalog (JSON array)
        #[arg(short, long)]
        catalog: PathBuf,

        /// Path to a workflow context file (JSON object)
        #[arg(short = 'x', long)]
        context: Option<PathBuf>,

        /// Intent parser to use (keyword, openai, mock)
        #[arg(short, long, default_value = "keyword")]
        parser: String,
    },

    /// List the actions available in a catalog
    Actions {
        /// Path to the integration catalog (JSON array)
        #[arg(short, long)]
        catalog: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            request,
            catalog,
            context,
            parser,
        } => run_request(&request, &catalog, context.as_deref(), &parser).await,
        Commands::Actions { catalog } => list_actions(&catalog),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(suggestion) = e.fix_suggestion() {
            eprintln!("  {} {}", "Fix:".yellow(), suggestion);
        }
        std::process::exit(1);
    }
}

async fn run_request(
    request: &str,
    catalog_path: &std::path::Path,
    context_path: Option<&std::path::Path>,
    parser_name: &str,
) -> Result<(), WeftError> {
    let catalog = Catalog::from_file(catalog_path, &CatalogOptions::default())?;
    let context = match context_path {
        Some(path) => load_context(path)?,
        None => Map::new(),
    };
    let parser = create_parser(parser_name)?;

    let pipeline = Pipeline::new(catalog, parser);
    let outcome = pipeline.run(request, &context).await;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

fn list_actions(catalog_path: &std::path::Path) -> Result<(), WeftError> {
    let catalog = Catalog::from_file(catalog_path, &CatalogOptions::default())?;

    for platform in catalog.platforms() {
        println!("{}", platform.cyan().bold());
        for action in catalog.for_platform(&platform) {
            let required: Vec<&str> = action
                .required_params()
                .map(|p| p.name.as_str())
                .collect();
            if required.is_empty() {
                println!("  {}", action.action);
            } else {
                println!("  {} (requires: {})", action.action, required.join(", "));
            }
        }
    }
    Ok(())
}
