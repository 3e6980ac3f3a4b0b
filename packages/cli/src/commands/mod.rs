pub mod check;
pub mod parse;
pub mod preview;
pub mod serialize;

pub use check::{check, CheckArgs};
pub use parse::{parse, ParseArgs};
pub use preview::{preview, PreviewArgs};
pub use serialize::{serialize, SerializeArgs};

use anyhow::{Context, Result};
use blockpress_editor::Post;
use std::path::Path;

fn read_source(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))
}

/// Wrap a markup file as a saved post titled after the file
fn post_from_file(path: &Path) -> Result<Post> {
    let content = read_source(path)?;
    let title = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Post::new(title, content))
}
