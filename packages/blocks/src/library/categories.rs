//! `core/categories`: a dynamic listing of the site's categories.
//!
//! Nothing is saved into the document body; the block is rendered from
//! fetched records, so its markup is just the delimiter pair and payload.

use crate::block::Attributes;
use crate::registry::{BlockTypeDefinition, EditCapability, RecordQuery, WrapperProps};
use serde_json::{json, Value};

pub const NAME: &str = "core/categories";

/// Class name of the block's root element
pub const CLASS_NAME: &str = "wp-block-categories";

pub const SHOW_POST_COUNTS: &str = "showPostCounts";
pub const DISPLAY_AS_DROPDOWN: &str = "displayAsDropdown";
pub const SHOW_HIERARCHY: &str = "showHierarchy";
pub const ALIGN: &str = "align";

/// Alignments offered by the block toolbar
pub const ALIGNMENT_CONTROLS: [&str; 4] = ["left", "center", "right", "full"];

pub fn query() -> RecordQuery {
    RecordQuery::new("categories")
}

pub fn definition() -> BlockTypeDefinition {
    BlockTypeDefinition::new("Categories")
        .icon("list-view")
        .category("widgets")
        .attribute_defaults(Attributes::from([
            (SHOW_POST_COUNTS.to_string(), json!(false)),
            (DISPLAY_AS_DROPDOWN.to_string(), json!(false)),
            (SHOW_HIERARCHY.to_string(), json!(false)),
        ]))
        .edit(EditCapability::AsyncData { query: query() })
        .edit_wrapper_props(edit_wrapper_props)
        .save(|_| String::new())
}

/// Floated and full-width alignments are exposed to the wrapper as `data-align`
pub fn edit_wrapper_props(attributes: &Attributes) -> Option<WrapperProps> {
    match attributes.get(ALIGN).and_then(Value::as_str) {
        Some(align @ ("left" | "right" | "full")) => Some(WrapperProps::from([(
            "data-align".to_string(),
            align.to_string(),
        )])),
        _ => None,
    }
}
