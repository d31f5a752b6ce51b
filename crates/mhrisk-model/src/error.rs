use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("duplicate patient status category: {0}")]
    DuplicateStatusCategory(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
