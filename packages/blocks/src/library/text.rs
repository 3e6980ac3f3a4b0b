//! `core/text`: a run of inline markup whose body is its content.

use crate::block::Attributes;
use crate::registry::BlockTypeDefinition;
use serde_json::{json, Value};

pub const NAME: &str = "core/text";
pub const CONTENT: &str = "content";

pub fn definition() -> BlockTypeDefinition {
    BlockTypeDefinition::new("Text")
        .icon("editor-paragraph")
        .category("common")
        .attribute_defaults(Attributes::from([(CONTENT.to_string(), json!(""))]))
        .attributes_from_body(|body| Attributes::from([(CONTENT.to_string(), json!(body))]))
        .save(|attributes| {
            attributes
                .get(CONTENT)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BlockTypeRegistry;

    #[test]
    fn test_save_emits_content() {
        let mut registry = BlockTypeRegistry::new();
        let text = registry.register(NAME, definition()).unwrap();

        let effective = text.resolve_attributes(&Attributes::new());
        assert_eq!(text.save(&effective), "");

        let effective = text.resolve_attributes(&text.attributes_from_body("<em>hi</em>"));
        assert_eq!(text.save(&effective), "<em>hi</em>");
    }
}
