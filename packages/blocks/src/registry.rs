//! # Block Type Registry
//!
//! Catalog of block type definitions, created once at startup and passed by
//! reference to the parser, serializer and controllers.
//!
//! Definitions are validated when they are registered: a definition without a
//! `save` function or without an attribute schema never reaches the catalog,
//! so every `BlockType` a lookup returns carries the full capability set.

use crate::block::Attributes;
use crate::error::{RegistrationError, RegistrationResult};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub type SaveFn = Arc<dyn Fn(&Attributes) -> String + Send + Sync>;
pub type WrapperPropsFn = Arc<dyn Fn(&Attributes) -> Option<WrapperProps> + Send + Sync>;
pub type BodyAttributesFn = Arc<dyn Fn(&str) -> Attributes + Send + Sync>;

/// Extra props applied to the element wrapping a block while it is edited
pub type WrapperProps = BTreeMap<String, String>;

/// Abstract query handed to the external data-fetch collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordQuery {
    pub resource: String,
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl RecordQuery {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// How a block behaves while it is being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCapability {
    /// Edit surface depends only on the block's attributes
    Static,
    /// Edit surface depends on externally fetched records
    AsyncData { query: RecordQuery },
}

/// Unvalidated block type definition, as supplied by the caller of `register`
#[derive(Clone)]
pub struct BlockTypeDefinition {
    title: String,
    icon: String,
    category: String,
    attribute_defaults: Option<Attributes>,
    save: Option<SaveFn>,
    edit: EditCapability,
    get_edit_wrapper_props: Option<WrapperPropsFn>,
    attributes_from_body: Option<BodyAttributesFn>,
}

impl BlockTypeDefinition {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            icon: String::new(),
            category: "common".to_string(),
            attribute_defaults: None,
            save: None,
            edit: EditCapability::Static,
            get_edit_wrapper_props: None,
            attributes_from_body: None,
        }
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn attribute_defaults(mut self, defaults: Attributes) -> Self {
        self.attribute_defaults = Some(defaults);
        self
    }

    pub fn save<F>(mut self, save: F) -> Self
    where
        F: Fn(&Attributes) -> String + Send + Sync + 'static,
    {
        self.save = Some(Arc::new(save));
        self
    }

    pub fn edit(mut self, edit: EditCapability) -> Self {
        self.edit = edit;
        self
    }

    pub fn edit_wrapper_props<F>(mut self, props: F) -> Self
    where
        F: Fn(&Attributes) -> Option<WrapperProps> + Send + Sync + 'static,
    {
        self.get_edit_wrapper_props = Some(Arc::new(props));
        self
    }

    /// Hook resolving attributes from a block's inner body at parse time
    pub fn attributes_from_body<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) -> Attributes + Send + Sync + 'static,
    {
        self.attributes_from_body = Some(Arc::new(hook));
        self
    }
}

/// A registered, validated block type
pub struct BlockType {
    name: String,
    title: String,
    icon: String,
    category: String,
    defaults: Attributes,
    save: SaveFn,
    edit: EditCapability,
    get_edit_wrapper_props: Option<WrapperPropsFn>,
    attributes_from_body: Option<BodyAttributesFn>,
}

impl BlockType {
    fn from_definition(name: &str, def: BlockTypeDefinition) -> RegistrationResult<Self> {
        if !is_valid_block_name(name) {
            return Err(RegistrationError::InvalidName(name.to_string()));
        }

        let save = def
            .save
            .ok_or_else(|| RegistrationError::MissingSave(name.to_string()))?;
        let defaults = def
            .attribute_defaults
            .ok_or_else(|| RegistrationError::MissingAttributeSchema(name.to_string()))?;

        if let Some(bad) = defaults
            .keys()
            .find(|key| key.is_empty() || key.chars().any(char::is_whitespace))
        {
            return Err(RegistrationError::invalid_attribute(name, bad.as_str()));
        }

        Ok(Self {
            name: name.to_string(),
            title: def.title,
            icon: def.icon,
            category: def.category,
            defaults,
            save,
            edit: def.edit,
            get_edit_wrapper_props: def.get_edit_wrapper_props,
            attributes_from_body: def.attributes_from_body,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn icon(&self) -> &str {
        &self.icon
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn defaults(&self) -> &Attributes {
        &self.defaults
    }

    pub fn edit(&self) -> &EditCapability {
        &self.edit
    }

    /// Stored attributes merged over the declared defaults
    pub fn resolve_attributes(&self, stored: &Attributes) -> Attributes {
        let mut effective = self.defaults.clone();
        effective.extend(stored.iter().map(|(k, v)| (k.clone(), v.clone())));
        effective
    }

    /// Attributes whose value differs from the declared default
    pub fn minimal_attributes(&self, attributes: &Attributes) -> Attributes {
        attributes
            .iter()
            .filter(|(key, value)| self.defaults.get(*key) != Some(*value))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn attributes_from_body(&self, body: &str) -> Attributes {
        match &self.attributes_from_body {
            Some(hook) => hook(body),
            None => Attributes::new(),
        }
    }

    pub fn save(&self, attributes: &Attributes) -> String {
        (self.save)(attributes)
    }

    pub fn edit_wrapper_props(&self, attributes: &Attributes) -> Option<WrapperProps> {
        self.get_edit_wrapper_props
            .as_ref()
            .and_then(|props| props(attributes))
    }
}

impl fmt::Debug for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockType")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("category", &self.category)
            .field("defaults", &self.defaults)
            .field("edit", &self.edit)
            .finish_non_exhaustive()
    }
}

/// Result of resolving a type id against the registry
#[derive(Debug, Clone)]
pub enum Lookup {
    Found(Arc<BlockType>),
    Unknown,
}

impl Lookup {
    pub fn block_type(&self) -> Option<&Arc<BlockType>> {
        match self {
            Lookup::Found(block_type) => Some(block_type),
            Lookup::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Lookup::Unknown)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegisterOptions {
    /// Replace an existing registration under the same name
    pub allow_override: bool,
}

/// Catalog of block types keyed by type id
#[derive(Debug, Default)]
pub struct BlockTypeRegistry {
    types: HashMap<String, Arc<BlockType>>,
    order: Vec<String>,
}

impl BlockTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in block library registered
    pub fn with_core_blocks() -> RegistrationResult<Self> {
        let mut registry = Self::new();
        crate::library::register_core_blocks(&mut registry)?;
        Ok(registry)
    }

    pub fn register(
        &mut self,
        name: &str,
        definition: BlockTypeDefinition,
    ) -> RegistrationResult<Arc<BlockType>> {
        self.register_with(name, definition, RegisterOptions::default())
    }

    pub fn register_with(
        &mut self,
        name: &str,
        definition: BlockTypeDefinition,
        options: RegisterOptions,
    ) -> RegistrationResult<Arc<BlockType>> {
        if self.types.contains_key(name) && !options.allow_override {
            warn!(block = name, "Rejected duplicate block type registration");
            return Err(RegistrationError::AlreadyRegistered(name.to_string()));
        }

        let block_type = Arc::new(BlockType::from_definition(name, definition)?);

        if self
            .types
            .insert(name.to_string(), Arc::clone(&block_type))
            .is_some()
        {
            debug!(block = name, "Overrode block type registration");
        } else {
            self.order.push(name.to_string());
            debug!(block = name, category = %block_type.category, "Registered block type");
        }

        Ok(block_type)
    }

    pub fn unregister(&mut self, name: &str) -> Option<Arc<BlockType>> {
        let removed = self.types.remove(name)?;
        self.order.retain(|registered| registered != name);
        Some(removed)
    }

    /// Resolve a type id; unknown ids yield `Lookup::Unknown`
    pub fn lookup(&self, name: &str) -> Lookup {
        match self.types.get(name) {
            Some(block_type) => Lookup::Found(Arc::clone(block_type)),
            None => Lookup::Unknown,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<BlockType>> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Block types in a category, in registration order
    pub fn list_by_category(&self, category: &str) -> Vec<Arc<BlockType>> {
        self.iter()
            .filter(|block_type| block_type.category() == category)
            .cloned()
            .collect()
    }

    /// Distinct category tags, in order of first registration
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for block_type in self.iter() {
            if !seen.contains(&block_type.category()) {
                seen.push(block_type.category());
            }
        }
        seen
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<BlockType>> {
        self.order.iter().filter_map(|name| self.types.get(name))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// `namespace/name`, each part lowercase alphanumerics or dashes starting with a letter
pub fn is_valid_block_name(name: &str) -> bool {
    fn valid_part(part: &str) -> bool {
        let mut chars = part.chars();
        matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
            && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    }

    match name.split_once('/') {
        Some((namespace, local)) => valid_part(namespace) && valid_part(local),
        None => false,
    }
}
