use super::{post_from_file, read_source};
use crate::config::Config;
use anyhow::{Context, Result};
use blockpress_blocks::library::categories;
use blockpress_blocks::{BlockTypeRegistry, EditCapability, Identity};
use blockpress_editor::categories::edit_view;
use blockpress_editor::{
    create_editor_instance, BlockController, BlockControllers, RecordSource, StaticRecords,
};
use clap::Args;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Markup file to open
    pub file: PathBuf,

    /// JSON array of records served to blocks that fetch data
    #[arg(long)]
    pub records: Option<PathBuf>,
}

/// Open the file in an editor session and print each block's edit-time view
pub fn preview(args: PreviewArgs, config: &Config) -> Result<()> {
    let registry = config.registry()?;
    let post = post_from_file(&args.file)?;
    let store = create_editor_instance(&registry, post, config.editor.clone());

    let source: Option<Arc<dyn RecordSource>> = match &args.records {
        Some(path) => {
            let records = StaticRecords::from_json(&read_source(path)?)
                .with_context(|| format!("Invalid records file {}", path.display()))?;
            Some(Arc::new(records))
        }
        None => None,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Cannot start async runtime")?;

    let controllers = BlockControllers::attach(&store);
    let mut views = Vec::new();
    for block in store.blocks().iter() {
        let Some(controller) = controllers.controller(&store, &registry, &block.client_id) else {
            continue;
        };

        if let (Some(source), true) = (&source, fetches_data(&controller)) {
            let state = runtime.block_on(controller.load(source.clone()))?;
            debug!(block = %block.client_id, %state, "Loaded records");
        }

        views.push(block_view(&controller, &registry));
    }
    controllers.dispose_all();

    println!("{}", serde_json::to_string_pretty(&Value::Array(views))?);
    Ok(())
}

fn fetches_data(controller: &BlockController) -> bool {
    matches!(
        controller.block_type().map(|t| t.edit()),
        Some(EditCapability::AsyncData { .. })
    )
}

fn block_view(controller: &BlockController, registry: &BlockTypeRegistry) -> Value {
    let attributes = controller.effective_attributes();
    let mut view = json!({
        "clientId": controller.client_id(),
        "name": controller.name(),
        "attributes": attributes,
    });

    if let Some(props) = controller.wrapper_props() {
        view["wrapperProps"] = json!(props);
    }
    if controller.name() == categories::NAME {
        let state = controller.load_state();
        view["state"] = json!(state.to_string());
        view["view"] = json!(edit_view(&attributes, &state, &Identity));
    }
    if !registry.contains(controller.name()) {
        view["registered"] = json!(false);
    }
    view
}
