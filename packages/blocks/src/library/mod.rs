//! Built-in block types.

pub mod categories;
pub mod text;

use crate::error::RegistrationResult;
use crate::registry::BlockTypeRegistry;

pub fn register_core_blocks(registry: &mut BlockTypeRegistry) -> RegistrationResult<()> {
    registry.register(categories::NAME, categories::definition())?;
    registry.register(text::NAME, text::definition())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_blocks_register_once() {
        let mut registry = BlockTypeRegistry::new();
        register_core_blocks(&mut registry).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.categories(), vec!["widgets", "common"]);
        assert!(register_core_blocks(&mut registry).is_err());
    }
}
