use anyhow::Result;
use clap::{Parser, Subcommand};
use command::build::BuildArgs;
use command::graph::GraphArgs;
use command::search::SearchArgs;
use config::AppConfig;
use std::path::PathBuf;

mod command;
mod config;

#[derive(Parser)]
#[command(name = "code-semi-graph")]
#[command(about = "Semantic and structural code index", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Home directory holding config.toml and the default index
    #[arg(long, global = true)]
    home: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the vector index and code graph for a project
    Build(BuildArgs),

    /// Rank indexed chunks by similarity to a query
    Search(SearchArgs),

    /// Traverse the code graph from a named class or method
    Graph(GraphArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let home = config::resolve_home(cli.home.as_deref());
    let app_config = AppConfig::load(&home)?;
    log::debug!("Using home directory {}", home.display());

    match cli.command {
        Commands::Build(args) => command::build::run(args, &app_config, &home).await?,
        Commands::Search(args) => command::search::run(args, &app_config, &home).await?,
        Commands::Graph(args) => command::graph::run(args, &app_config, &home).await?,
    }

    Ok(())
}
