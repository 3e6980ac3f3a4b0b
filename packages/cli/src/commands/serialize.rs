use super::post_from_file;
use crate::config::Config;
use anyhow::Result;
use blockpress_editor::create_editor_instance;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SerializeArgs {
    /// Markup file to normalize
    pub file: PathBuf,
}

/// Load the file into an editor session and print the session's markup
pub fn serialize(args: SerializeArgs, config: &Config) -> Result<()> {
    let registry = config.registry()?;
    let post = post_from_file(&args.file)?;
    let store = create_editor_instance(&registry, post, config.editor.clone());

    print!("{}", store.serialize(&registry));
    Ok(())
}
