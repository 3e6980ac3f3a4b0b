//! # Document Parser
//!
//! Turns portable markup into an ordered block sequence.
//!
//! The parser never fails. Text that is not a well-formed delimiter pair
//! (unterminated opener, malformed payload, stray closer, opener without a
//! matching closer) stays in the source span it came from and ends up inside
//! a freeform block. Freeform blocks are the maximal runs of text between
//! delimited blocks, so whitespace next to prose stays with that prose.
//! Runs made only of whitespace are inter-block separators and are not
//! materialized; the serializer regenerates them.

use crate::block::{Attributes, BlockInstance};
use crate::delimiter::{self, OPEN_PREFIX};
use crate::id_generator::IdGenerator;
use crate::registry::{BlockTypeRegistry, Lookup};
use tracing::{debug, instrument};

pub struct Parser<'r> {
    registry: &'r BlockTypeRegistry,
    ids: IdGenerator,
}

impl<'r> Parser<'r> {
    pub fn new(registry: &'r BlockTypeRegistry) -> Self {
        Self::with_ids(registry, IdGenerator::default())
    }

    pub fn with_ids(registry: &'r BlockTypeRegistry, ids: IdGenerator) -> Self {
        Self { registry, ids }
    }

    #[instrument(skip_all, fields(len = source.len()))]
    pub fn parse(&self, source: &str) -> Vec<BlockInstance> {
        let mut blocks = Vec::new();
        let mut text_start = 0;
        let mut cursor = 0;

        while let Some(offset) = source[cursor..].find(OPEN_PREFIX) {
            let start = cursor + offset;

            let opener = match delimiter::read_opener(source, start) {
                Ok(opener) => opener,
                Err(reason) => {
                    debug!(pos = start, ?reason, "Malformed block opener kept as freeform text");
                    cursor = start + OPEN_PREFIX.len();
                    continue;
                }
            };

            let Some((body_end, block_end)) =
                delimiter::find_closer(source, opener.end, opener.name)
            else {
                debug!(pos = start, block = opener.name, "Unmatched block opener kept as freeform text");
                cursor = opener.end;
                continue;
            };

            self.push_freeform(&mut blocks, &source[text_start..start]);

            let body = &source[opener.end..body_end];
            let raw = &source[start..block_end];
            blocks.push(self.build_block(opener.name, opener.attributes, body, raw));

            text_start = block_end;
            cursor = block_end;
        }

        self.push_freeform(&mut blocks, &source[text_start..]);

        debug!(blocks = blocks.len(), "Parsed document");
        blocks
    }

    fn build_block(&self, name: &str, payload: Attributes, body: &str, raw: &str) -> BlockInstance {
        match self.registry.lookup(name) {
            Lookup::Found(block_type) => {
                let mut attributes = block_type.attributes_from_body(body);
                attributes.extend(payload);
                BlockInstance::new(self.ids.new_id(), name, attributes)
            }
            Lookup::Unknown => {
                debug!(block = name, "Unknown block type kept as raw content");
                BlockInstance::unknown(self.ids.new_id(), name, raw)
            }
        }
    }

    fn push_freeform(&self, blocks: &mut Vec<BlockInstance>, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        blocks.push(BlockInstance::freeform(self.ids.new_id(), text));
    }
}

/// Parse markup into blocks using a fresh parser
pub fn parse(source: &str, registry: &BlockTypeRegistry) -> Vec<BlockInstance> {
    Parser::new(registry).parse(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::FREEFORM_BLOCK;
    use crate::registry::BlockTypeDefinition;
    use serde_json::json;

    fn registry() -> BlockTypeRegistry {
        let mut registry = BlockTypeRegistry::new();
        registry
            .register(
                "list/taxonomy",
                BlockTypeDefinition::new("Taxonomy")
                    .attribute_defaults(Attributes::from([
                        ("showCounts".to_string(), json!(false)),
                        ("asDropdown".to_string(), json!(false)),
                        ("showHierarchy".to_string(), json!(false)),
                    ]))
                    .save(|_| String::new()),
            )
            .unwrap();
        registry
            .register(
                "test/text",
                BlockTypeDefinition::new("Text")
                    .attribute_defaults(Attributes::from([("content".to_string(), json!(""))]))
                    .attributes_from_body(|body| {
                        Attributes::from([("content".to_string(), json!(body))])
                    })
                    .save(|attrs| attrs["content"].as_str().unwrap_or_default().to_string()),
            )
            .unwrap();
        registry
    }

    #[test]
    fn test_empty_and_whitespace_documents() {
        let registry = registry();
        assert!(parse("", &registry).is_empty());
        assert!(parse("\n\n  \n", &registry).is_empty());
    }

    #[test]
    fn test_block_without_payload_has_no_stored_attributes() {
        let registry = registry();
        let blocks = parse("<!-- wp:list/taxonomy --><!-- /wp:list/taxonomy -->", &registry);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name, "list/taxonomy");
        assert!(blocks[0].attributes.is_empty());
        assert_eq!(
            blocks[0].effective_attributes(&registry),
            Attributes::from([
                ("asDropdown".to_string(), json!(false)),
                ("showCounts".to_string(), json!(false)),
                ("showHierarchy".to_string(), json!(false)),
            ])
        );
    }

    #[test]
    fn test_payload_overrides_body_attributes() {
        let registry = registry();
        let blocks = parse(
            r#"<!-- wp:test/text {"content":"from payload"} -->from body<!-- /wp:test/text -->"#,
            &registry,
        );
        assert_eq!(blocks[0].attributes["content"], json!("from payload"));

        let blocks = parse("<!-- wp:test/text -->from body<!-- /wp:test/text -->", &registry);
        assert_eq!(blocks[0].attributes["content"], json!("from body"));
    }

    #[test]
    fn test_freeform_runs_keep_exact_text() {
        let registry = registry();
        let source = "<p>intro</p>\n\n<!-- wp:list/taxonomy --><!-- /wp:list/taxonomy -->\n\n<p>outro</p>\n";
        let blocks = parse(source, &registry);

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].name, FREEFORM_BLOCK);
        assert_eq!(blocks[0].raw_content.as_deref(), Some("<p>intro</p>\n\n"));
        assert_eq!(blocks[1].name, "list/taxonomy");
        assert_eq!(blocks[2].raw_content.as_deref(), Some("\n\n<p>outro</p>\n"));
    }

    #[test]
    fn test_whitespace_between_blocks_is_a_separator() {
        let registry = registry();
        let source = "<!-- wp:list/taxonomy --><!-- /wp:list/taxonomy -->\n\n<!-- wp:list/taxonomy --><!-- /wp:list/taxonomy -->";
        let blocks = parse(source, &registry);
        assert_eq!(blocks.len(), 2);
        assert!(blocks.iter().all(|b| !b.is_opaque()));
    }

    #[test]
    fn test_malformed_payload_degrades_to_freeform() {
        let registry = registry();
        let source = "<!-- wp:list/taxonomy {broken -->x<!-- /wp:list/taxonomy -->";
        let blocks = parse(source, &registry);

        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].is_freeform());
        assert_eq!(blocks[0].raw_content.as_deref(), Some(source));
    }

    #[test]
    fn test_unmatched_opener_and_stray_closer_degrade_to_freeform() {
        let registry = registry();

        let unmatched = "before <!-- wp:list/taxonomy --> after";
        let blocks = parse(unmatched, &registry);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].raw_content.as_deref(), Some(unmatched));

        let stray = "text <!-- /wp:list/taxonomy --> more";
        let blocks = parse(stray, &registry);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].raw_content.as_deref(), Some(stray));
    }

    #[test]
    fn test_unknown_type_keeps_full_span() {
        let registry = registry();
        let block_src = r#"<!-- wp:vendor/gallery {"columns":3} --><div>imgs</div><!-- /wp:vendor/gallery -->"#;
        let blocks = parse(block_src, &registry);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].name, "vendor/gallery");
        assert!(blocks[0].attributes.is_empty());
        assert_eq!(blocks[0].raw_content.as_deref(), Some(block_src));
    }

    #[test]
    fn test_malformed_opener_followed_by_valid_block() {
        let registry = registry();
        let source = "<!-- wp:Bad --> text <!-- wp:list/taxonomy --><!-- /wp:list/taxonomy -->";
        let blocks = parse(source, &registry);

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].raw_content.as_deref(), Some("<!-- wp:Bad --> text "));
        assert_eq!(blocks[1].name, "list/taxonomy");
    }

    #[test]
    fn test_client_ids_are_unique() {
        let registry = registry();
        let blocks = parse(
            "a<!-- wp:list/taxonomy --><!-- /wp:list/taxonomy -->b",
            &registry,
        );
        assert_eq!(blocks.len(), 3);
        assert_ne!(blocks[0].client_id, blocks[1].client_id);
        assert_ne!(blocks[1].client_id, blocks[2].client_id);
    }
}
