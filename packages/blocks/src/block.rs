use crate::id_generator::ClientId;
use crate::registry::{BlockTypeRegistry, Lookup};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute map; ordered so payloads always serialize with sorted keys
pub type Attributes = BTreeMap<String, Value>;

/// Type id of blocks holding raw, unparsed markup
pub const FREEFORM_BLOCK: &str = "core/freeform";

/// One structured content unit in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockInstance {
    pub client_id: ClientId,

    /// Type id; may not resolve against the registry
    pub name: String,

    /// Explicitly set attributes only. Defaults are applied on read.
    #[serde(default)]
    pub attributes: Attributes,

    /// Exact source text for freeform and unknown-type blocks
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

impl BlockInstance {
    pub fn new(client_id: ClientId, name: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            client_id,
            name: name.into(),
            attributes,
            raw_content: None,
        }
    }

    pub fn freeform(client_id: ClientId, raw: impl Into<String>) -> Self {
        Self {
            client_id,
            name: FREEFORM_BLOCK.to_string(),
            attributes: Attributes::new(),
            raw_content: Some(raw.into()),
        }
    }

    /// A delimited block whose type id did not resolve; `raw` is its full source span
    pub fn unknown(client_id: ClientId, name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            client_id,
            name: name.into(),
            attributes: Attributes::new(),
            raw_content: Some(raw.into()),
        }
    }

    pub fn is_freeform(&self) -> bool {
        self.name == FREEFORM_BLOCK && self.raw_content.is_some()
    }

    /// Raw blocks are emitted verbatim and never attribute-parsed
    pub fn is_opaque(&self) -> bool {
        self.raw_content.is_some()
    }

    pub fn effective_attributes(&self, registry: &BlockTypeRegistry) -> Attributes {
        if self.is_opaque() {
            return self.attributes.clone();
        }
        match registry.lookup(&self.name) {
            Lookup::Found(block_type) => block_type.resolve_attributes(&self.attributes),
            Lookup::Unknown => self.attributes.clone(),
        }
    }

    /// Session-independent view used to compare documents structurally
    pub fn shape(&self, registry: &BlockTypeRegistry) -> BlockShape {
        BlockShape {
            name: self.name.clone(),
            attributes: self.effective_attributes(registry),
            raw_content: self.raw_content.clone(),
        }
    }
}

/// A block with its client id stripped and attributes resolved
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockShape {
    pub name: String,
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_content: Option<String>,
}

pub fn shapes(blocks: &[BlockInstance], registry: &BlockTypeRegistry) -> Vec<BlockShape> {
    blocks.iter().map(|block| block.shape(registry)).collect()
}
