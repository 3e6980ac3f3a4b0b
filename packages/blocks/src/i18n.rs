//! String lookup used for user-facing labels.

use std::borrow::Cow;
use std::collections::HashMap;

pub trait Translator: Send + Sync {
    fn translate<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// Returns every string unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Translator for Identity {
    fn translate<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }
}

/// Fixed lookup table; strings without an entry pass through
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: HashMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl Into<String>, translated: impl Into<String>) -> Self {
        self.entries.insert(source.into(), translated.into());
        self
    }
}

impl Translator for Catalog {
    fn translate<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self.entries.get(text) {
            Some(translated) => Cow::Owned(translated.clone()),
            None => Cow::Borrowed(text),
        }
    }
}
