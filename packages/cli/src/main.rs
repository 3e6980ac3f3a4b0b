mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    check, parse, preview, serialize, CheckArgs, ParseArgs, PreviewArgs, SerializeArgs,
};
use config::Config;
use std::path::PathBuf;

/// Blockpress CLI - Inspect and normalize block-delimited documents
#[derive(Parser, Debug)]
#[command(name = "blockpress")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ./blockpress.config.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the blocks in a document
    Parse(ParseArgs),

    /// Print a document in canonical form
    Serialize(SerializeArgs),

    /// Verify documents survive a parse/serialize round trip
    Check(CheckArgs),

    /// Print the edit-time view of every block
    Preview(PreviewArgs),
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    if let Err(err) = run(cli) {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = Config::resolve(cli.config.as_ref(), &cwd)?;

    match cli.command {
        Command::Parse(args) => parse(args, &config),
        Command::Serialize(args) => serialize(args, &config),
        Command::Check(args) => check(args, &config),
        Command::Preview(args) => preview(args, &config),
    }
}
