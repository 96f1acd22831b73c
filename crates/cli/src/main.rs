use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use config::{Overrides, Settings};
use metagraph_graph::SchemaModel;
use metagraph_search::{GenerationRequest, KeywordExtractor, SchemaRetriever};
use std::env;
use std::path::PathBuf;

mod config;

#[derive(Parser)]
#[command(name = "metagraph")]
#[command(about = "Schema graph retrieval for text-to-SQL generation", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (overrides METAGRAPH_CONFIG, default: ./metagraph.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Schema JSON file (overrides METAGRAPH_SCHEMA and the config file)
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the keywords extracted from a query
    Keywords(KeywordsArgs),

    /// Print the schema context relevant to a query
    Context(ContextArgs),

    /// Print the generation prompt for a query
    Prompt(PromptArgs),

    /// Dump the whole schema graph as nodes and links
    Export,

    /// Print the loaded schema as JSON, after table exclusions
    Schema,

    /// Print the JSON Schema of the schema input format
    #[command(name = "schema-format")]
    SchemaFormat,
}

#[derive(Args)]
struct KeywordsArgs {
    /// Natural language query
    query: String,

    /// Output as JSON array
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ContextArgs {
    /// Natural language query
    query: String,

    /// Output the full retrieval report as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct PromptArgs {
    /// Natural language query
    query: String,

    /// Database name used in the prompt (overrides `database_label`)
    #[arg(long)]
    database_label: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let overrides = Overrides {
        config: cli.config,
        schema: cli.schema,
        database_label: match &cli.command {
            Commands::Prompt(args) => args.database_label.clone(),
            _ => None,
        },
    };

    match cli.command {
        Commands::Keywords(args) => run_keywords(args),
        Commands::SchemaFormat => print_json(&SchemaModel::json_schema()),
        Commands::Context(args) => {
            let settings = resolve_settings(overrides)?;
            run_context(&build_retriever(&settings)?, args)
        }
        Commands::Prompt(args) => {
            let settings = resolve_settings(overrides)?;
            let retriever = build_retriever(&settings)?;
            let request = GenerationRequest::from(retriever.retrieve(&args.query));
            print!("{}", request.render_prompt(&settings.database_label));
            Ok(())
        }
        Commands::Export => {
            let settings = resolve_settings(overrides)?;
            print_json(&build_retriever(&settings)?.export())
        }
        Commands::Schema => {
            let settings = resolve_settings(overrides)?;
            print_json(build_retriever(&settings)?.schema())
        }
    }
}

fn resolve_settings(overrides: Overrides) -> Result<Settings> {
    Settings::resolve(overrides, |key| env::var(key).ok())
}

fn build_retriever(settings: &Settings) -> Result<SchemaRetriever> {
    let schema = settings.load_schema()?;
    SchemaRetriever::new(schema).context("Failed to build schema graph")
}

fn run_keywords(args: KeywordsArgs) -> Result<()> {
    let keywords = KeywordExtractor::new().extract(&args.query);
    if args.json {
        return print_json(&keywords);
    }
    for keyword in keywords {
        println!("{keyword}");
    }
    Ok(())
}

fn run_context(retriever: &SchemaRetriever, args: ContextArgs) -> Result<()> {
    let retrieval = retriever.retrieve(&args.query);
    if args.json {
        return print_json(&retrieval);
    }
    if retrieval.relevant.is_empty() {
        log::warn!("No schema elements matched query: {}", args.query);
    }
    print!("{}", retrieval.context);
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
