pub mod block;
pub mod delimiter;
pub mod error;
pub mod i18n;
pub mod id_generator;
pub mod library;
pub mod parser;
pub mod registry;
pub mod serializer;

pub use block::{shapes, Attributes, BlockInstance, BlockShape, FREEFORM_BLOCK};
pub use error::{RegistrationError, RegistrationResult};
pub use i18n::{Catalog, Identity, Translator};
pub use id_generator::{ClientId, IdGenerator};
pub use parser::{parse, Parser};
pub use registry::{
    BlockType, BlockTypeDefinition, BlockTypeRegistry, EditCapability, Lookup, RecordQuery,
    RegisterOptions, WrapperProps,
};
pub use serializer::{serialize, Serializer};
