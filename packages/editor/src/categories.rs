//! Edit-time presentation of `core/categories`.
//!
//! Produces a host-neutral view model; hosts map it onto their own widgets.

use crate::controller::BlockController;
use crate::hierarchy::{build_tree, walk, RecordNode};
use crate::load::LoadState;
use crate::records::{Record, ROOT_PARENT};
use blockpress_blocks::library::categories::{
    ALIGN, ALIGNMENT_CONTROLS, CLASS_NAME, DISPLAY_AS_DROPDOWN, SHOW_HIERARCHY, SHOW_POST_COUNTS,
};
use blockpress_blocks::{Attributes, Translator};
use serde::Serialize;
use serde_json::Value;

const NBSP: char = '\u{a0}';
const INDENT_PER_LEVEL: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CategoriesView {
    Placeholder {
        icon: String,
        label: String,
        spinner: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        notice: Option<String>,
    },
    List(CategoryList),
    #[serde(rename_all = "camelCase")]
    Dropdown {
        class_name: String,
        options: Vec<DropdownOption>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryList {
    pub class_name: String,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListItem {
    pub id: u64,
    pub label: String,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<CategoryList>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropdownOption {
    pub id: u64,
    pub label: String,
}

/// Inspector toggle description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toggle {
    pub label: String,
    pub attribute: &'static str,
    pub checked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Options {
    show_post_counts: bool,
    show_hierarchy: bool,
}

impl Options {
    fn from_attributes(attributes: &Attributes) -> Self {
        Self {
            show_post_counts: flag(attributes, SHOW_POST_COUNTS),
            show_hierarchy: flag(attributes, SHOW_HIERARCHY),
        }
    }
}

fn flag(attributes: &Attributes, name: &str) -> bool {
    attributes.get(name).and_then(Value::as_bool).unwrap_or(false)
}

/// View for the block given its effective attributes and load state
pub fn edit_view(
    attributes: &Attributes,
    state: &LoadState,
    translator: &dyn Translator,
) -> CategoriesView {
    let records = match state.records() {
        Some(records) if !records.is_empty() => records,
        _ => return placeholder(state, translator),
    };

    let options = Options::from_attributes(attributes);
    let tree = build_tree(records, ROOT_PARENT, !options.show_hierarchy);

    if flag(attributes, DISPLAY_AS_DROPDOWN) {
        CategoriesView::Dropdown {
            class_name: format!("{CLASS_NAME}__dropdown"),
            options: dropdown_options(&tree, options, translator),
        }
    } else {
        CategoriesView::List(category_list(&tree, 0, options, translator))
    }
}

fn placeholder(state: &LoadState, translator: &dyn Translator) -> CategoriesView {
    let notice = match state {
        LoadState::Failed(_) => Some(translator.translate("Unable to load categories.").into_owned()),
        _ => None,
    };
    CategoriesView::Placeholder {
        icon: "admin-post".to_string(),
        label: translator.translate("Categories").into_owned(),
        spinner: matches!(state, LoadState::Idle | LoadState::Loading),
        notice,
    }
}

fn display_name(record: &Record, translator: &dyn Translator) -> String {
    let name = record.name.trim();
    if name.is_empty() {
        translator.translate("(Untitled)").into_owned()
    } else {
        name.to_string()
    }
}

fn list_class_name(level: usize) -> String {
    format!("{CLASS_NAME}__list {CLASS_NAME}__list-level-{level}")
}

fn category_list(
    nodes: &[RecordNode],
    level: usize,
    options: Options,
    translator: &dyn Translator,
) -> CategoryList {
    CategoryList {
        class_name: list_class_name(level),
        items: nodes
            .iter()
            .map(|node| ListItem {
                id: node.record.id,
                label: display_name(&node.record, translator),
                link: node.record.link.clone(),
                post_count: options
                    .show_post_counts
                    .then(|| format!(" ({})", node.record.count)),
                children: (options.show_hierarchy && !node.children.is_empty())
                    .then(|| category_list(&node.children, level + 1, options, translator)),
            })
            .collect(),
    }
}

fn dropdown_options(
    nodes: &[RecordNode],
    options: Options,
    translator: &dyn Translator,
) -> Vec<DropdownOption> {
    let mut out = Vec::new();
    walk(nodes, &mut |node, depth| {
        let mut label: String = std::iter::repeat(NBSP)
            .take(depth * INDENT_PER_LEVEL)
            .collect();
        label.push_str(&display_name(&node.record, translator));
        if options.show_post_counts {
            label.push_str(&format!(" ( {} )", node.record.count));
        }
        out.push(DropdownOption {
            id: node.record.id,
            label,
        });
    });
    out
}

pub fn inspector_toggles(attributes: &Attributes, translator: &dyn Translator) -> Vec<Toggle> {
    [
        ("Display as dropdown", DISPLAY_AS_DROPDOWN),
        ("Show post counts", SHOW_POST_COUNTS),
        ("Show hierarchy", SHOW_HIERARCHY),
    ]
    .into_iter()
    .map(|(label, attribute)| Toggle {
        label: translator.translate(label).into_owned(),
        attribute,
        checked: flag(attributes, attribute),
    })
    .collect()
}

pub fn toggle_display_as_dropdown(controller: &BlockController) -> bool {
    controller.toggle(DISPLAY_AS_DROPDOWN)
}

pub fn toggle_show_post_counts(controller: &BlockController) -> bool {
    controller.toggle(SHOW_POST_COUNTS)
}

pub fn toggle_show_hierarchy(controller: &BlockController) -> bool {
    controller.toggle(SHOW_HIERARCHY)
}

/// Apply a toolbar alignment; `None` clears it. Unsupported values are refused.
pub fn set_alignment(controller: &BlockController, align: Option<&str>) -> bool {
    let value = match align {
        Some(align) if ALIGNMENT_CONTROLS.contains(&align) => Value::String(align.to_string()),
        Some(_) => return false,
        None => Value::Null,
    };
    controller.set_attributes(Attributes::from([(ALIGN.to_string(), value)]))
}
