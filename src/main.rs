use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use odatapath::config::{Config, OutputFormat};
use odatapath::segment::{self, ReverseStrategy};

/// odatapath - parse an OData resource path and reverse its segments
#[derive(Parser)]
#[command(name = "odatapath")]
#[command(version)]
#[command(about = "Parse an OData resource path and reverse its segments", long_about = None)]
struct Cli {
    /// Resource path, e.g. "Customers/Orders(Id=5)/$count"
    path: String,

    /// Print segments as JSON
    #[arg(long)]
    json: bool,

    /// Reverse without recursion
    #[arg(long)]
    iterative: bool,

    /// Print the parsed path without reversing it
    #[arg(long)]
    no_reverse: bool,

    /// Config file (default: ~/.config/odatapath/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };
    if cli.json {
        config.output = OutputFormat::Json;
    }
    if cli.iterative {
        config.strategy = ReverseStrategy::Iterative;
    }

    odatapath::init_tracing(&config.log_filter);

    let options = config.reverse_options();
    let parsed = segment::Parser::parse_with(&cli.path, &options)
        .with_context(|| format!("Failed to parse path '{}'", cli.path))?;

    let result = if cli.no_reverse {
        parsed
    } else {
        segment::reverse_with(Some(&parsed), &options)?
    };

    match config.output {
        OutputFormat::Text => println!("{}", result),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&result).context("Failed to serialize path")?
        ),
    }

    Ok(())
}
