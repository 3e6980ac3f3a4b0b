use super::read_source;
use crate::config::Config;
use anyhow::Result;
use blockpress_blocks::{BlockInstance, BlockTypeRegistry, Lookup, Parser};
use clap::Args;
use colored::Colorize;
use serde_json::{json, Value};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ParseArgs {
    /// Markup file to parse
    pub file: PathBuf,

    /// Print the block sequence as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn parse(args: ParseArgs, config: &Config) -> Result<()> {
    let registry = config.registry()?;
    let source = read_source(&args.file)?;
    let blocks = Parser::new(&registry).parse(&source);

    if args.json {
        let listing: Vec<Value> = blocks.iter().map(|b| block_json(b, &registry)).collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!(
        "{} {} ({} blocks)",
        "📄".bright_blue(),
        args.file.display(),
        blocks.len()
    );
    for (index, block) in blocks.iter().enumerate() {
        println!("  {:>3} {}", index, describe(block, &registry));
    }
    Ok(())
}

fn block_json(block: &BlockInstance, registry: &BlockTypeRegistry) -> Value {
    match &block.raw_content {
        Some(raw) => json!({
            "clientId": block.client_id,
            "name": block.name,
            "rawLength": raw.len(),
        }),
        None => json!({
            "clientId": block.client_id,
            "name": block.name,
            "attributes": block.effective_attributes(registry),
        }),
    }
}

fn describe(block: &BlockInstance, registry: &BlockTypeRegistry) -> String {
    match (&block.raw_content, registry.lookup(&block.name)) {
        (Some(raw), _) if block.is_freeform() => {
            format!("{} {}", "freeform".dimmed(), format!("{} bytes", raw.len()).dimmed())
        }
        (Some(raw), _) => format!(
            "{} {} {}",
            block.name.yellow(),
            "(unknown type, kept raw)".yellow(),
            format!("{} bytes", raw.len()).dimmed()
        ),
        (None, Lookup::Found(_)) => format!(
            "{} {} {}",
            block.name.green(),
            block.client_id.to_string().dimmed(),
            json!(block.effective_attributes(registry))
        ),
        (None, Lookup::Unknown) => format!("{} {}", block.name.yellow(), "(unregistered)".yellow()),
    }
}
