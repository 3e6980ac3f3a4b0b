use crate::block::{Attributes, BlockInstance};
use crate::delimiter;
use crate::registry::{BlockType, BlockTypeRegistry, Lookup};
use tracing::debug;

/// Separator written between two delimited blocks
const BLOCK_SEPARATOR: &str = "\n\n";

/// Serializer converts a block sequence back to portable markup
///
/// Output is canonical rather than byte-identical to whatever was parsed:
/// payloads carry only attributes that differ from the type defaults, keys
/// are sorted, and delimited blocks are separated by a blank line. Freeform
/// and unknown-type blocks are written back exactly as they were read.
pub struct Serializer<'r> {
    registry: &'r BlockTypeRegistry,
}

impl<'r> Serializer<'r> {
    pub fn new(registry: &'r BlockTypeRegistry) -> Self {
        Self { registry }
    }

    pub fn serialize(&self, blocks: &[BlockInstance]) -> String {
        let mut output = String::new();
        let mut previous_delimited = false;

        for block in blocks {
            let delimited = !block.is_freeform();
            if delimited && previous_delimited {
                output.push_str(BLOCK_SEPARATOR);
            }
            self.serialize_block(block, &mut output);
            previous_delimited = delimited;
        }

        output
    }

    pub fn serialize_block(&self, block: &BlockInstance, output: &mut String) {
        if let Some(raw) = &block.raw_content {
            output.push_str(raw);
            return;
        }

        match self.registry.lookup(&block.name) {
            Lookup::Found(block_type) => {
                let effective = block_type.resolve_attributes(&block.attributes);
                let mut body = block_type.save(&effective);
                if body.contains(&delimiter::closer(&block.name)) {
                    // The body would end the block early; the payload carries everything instead
                    debug!(block = %block.name, "Saved body contains its closer, writing payload only");
                    body.clear();
                }
                let payload = payload_for(&block_type, &effective, &body);
                write_delimited(&block.name, &payload, &body, output);
            }
            // Inserted with a type that is not registered: nothing to diff against
            Lookup::Unknown => write_delimited(&block.name, &block.attributes, "", output),
        }
    }
}

/// Attributes a re-parse of `body` would not reproduce on its own.
///
/// Keys the body hook yields are written when the hook disagrees; other keys
/// are written when they differ from the defaults.
fn payload_for(block_type: &BlockType, effective: &Attributes, body: &str) -> Attributes {
    let from_body = block_type.attributes_from_body(body);
    let minimal = block_type.minimal_attributes(effective);
    effective
        .iter()
        .filter(|(key, value)| match from_body.get(*key) {
            Some(recovered) => recovered != *value,
            None => minimal.contains_key(*key),
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn write_delimited(name: &str, payload: &Attributes, body: &str, output: &mut String) {
    output.push_str(&delimiter::opener(name, payload));
    output.push_str(body);
    output.push_str(&delimiter::closer(name));
}

pub fn serialize(blocks: &[BlockInstance], registry: &BlockTypeRegistry) -> String {
    Serializer::new(registry).serialize(blocks)
}
