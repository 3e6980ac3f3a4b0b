use thiserror::Error;

pub type RegistrationResult<T> = Result<T, RegistrationError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Block type '{0}' is already registered")]
    AlreadyRegistered(String),

    #[error("Invalid block type name '{0}': expected 'namespace/name'")]
    InvalidName(String),

    #[error("Block type '{0}' must define a save function")]
    MissingSave(String),

    #[error("Block type '{0}' must define an attribute schema")]
    MissingAttributeSchema(String),

    #[error("Block type '{name}' declares an invalid attribute name '{attribute}'")]
    InvalidAttributeName { name: String, attribute: String },
}

impl RegistrationError {
    pub fn invalid_attribute(name: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::InvalidAttributeName {
            name: name.into(),
            attribute: attribute.into(),
        }
    }
}
