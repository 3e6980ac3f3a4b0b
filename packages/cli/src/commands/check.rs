use super::read_source;
use crate::config::Config;
use anyhow::{bail, Result};
use blockpress_blocks::{parse, serialize, shapes, BlockShape, BlockTypeRegistry};
use clap::Args;
use colored::Colorize;
use serde_json::json;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Markup file, or a directory to scan
    pub path: PathBuf,

    /// File extension scanned inside directories
    #[arg(long, default_value = "html")]
    pub ext: String,
}

/// Outcome of parse → serialize → parse on one document
#[derive(Debug, Clone, PartialEq)]
pub struct RoundTrip {
    pub blocks: usize,
    /// Serialized output equals the input byte for byte
    pub canonical: bool,
    pub differences: Vec<String>,
}

impl RoundTrip {
    pub fn holds(&self) -> bool {
        self.differences.is_empty()
    }
}

pub fn round_trip(source: &str, registry: &BlockTypeRegistry) -> RoundTrip {
    let first = parse(source, registry);
    let markup = serialize(&first, registry);
    let second = parse(&markup, registry);

    RoundTrip {
        blocks: first.len(),
        canonical: markup == source,
        differences: differences(&shapes(&first, registry), &shapes(&second, registry)),
    }
}

fn differences(before: &[BlockShape], after: &[BlockShape]) -> Vec<String> {
    let mut out = Vec::new();
    if before.len() != after.len() {
        out.push(format!("block count {} → {}", before.len(), after.len()));
    }

    for (index, (a, b)) in before.iter().zip(after).enumerate() {
        if a.name != b.name {
            out.push(format!("block {index}: type {} → {}", a.name, b.name));
        } else if a.attributes != b.attributes {
            out.push(format!(
                "block {index} ({}): attributes {} → {}",
                a.name,
                json!(a.attributes),
                json!(b.attributes)
            ));
        } else if a.raw_content != b.raw_content {
            out.push(format!("block {index} ({}): raw content changed", a.name));
        }
    }
    out
}

pub fn check(args: CheckArgs, config: &Config) -> Result<()> {
    let registry = config.registry()?;
    let files = collect_files(&args.path, &args.ext);

    if files.is_empty() {
        println!("{}", "⚠️  No files to check".yellow());
        return Ok(());
    }

    let mut failures = 0;
    for file in &files {
        let source = read_source(file)?;
        let report = round_trip(&source, &registry);

        if report.holds() {
            let note = if report.canonical { "canonical" } else { "normalized" };
            println!(
                "  {} {} ({} blocks, {})",
                "✓".green(),
                file.display(),
                report.blocks,
                note.dimmed()
            );
        } else {
            failures += 1;
            eprintln!("  {} {}", "✗".red(), file.display());
            for difference in &report.differences {
                eprintln!("      {}", difference.red());
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} files do not round-trip", files.len());
    }
    println!("{} {} files round-trip", "✅".green(), files.len());
    Ok(())
}

fn collect_files(path: &Path, ext: &str) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    WalkDir::new(path)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|p| p.is_file() && p.extension().and_then(|s| s.to_str()) == Some(ext))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_report() {
        let registry = BlockTypeRegistry::with_core_blocks().unwrap();

        let canonical = "<!-- wp:core/categories --><!-- /wp:core/categories -->";
        let report = round_trip(canonical, &registry);
        assert!(report.holds());
        assert!(report.canonical);
        assert_eq!(report.blocks, 1);

        let noisy = r#"<!-- wp:core/categories {"showHierarchy":false} --><!-- /wp:core/categories -->"#;
        let report = round_trip(noisy, &registry);
        assert!(report.holds());
        assert!(!report.canonical);
    }

    #[test]
    fn test_differences_are_described() {
        let a = BlockShape {
            name: "core/text".into(),
            attributes: Default::default(),
            raw_content: None,
        };
        let b = BlockShape {
            name: "core/freeform".into(),
            ..a.clone()
        };

        let lines = differences(&[a.clone(), a.clone()], &[b]);
        assert_eq!(
            lines,
            vec![
                "block count 2 → 1".to_string(),
                "block 0: type core/text → core/freeform".to_string(),
            ]
        );
        assert!(differences(&[a.clone()], &[a]).is_empty());
    }
}
