
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegisterError {
    #[error("Invalid element: {0}")]
    InvalidElement(String),
    #[error("No matching element: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, RegisterError>;

// Helper conversions
impl From<serde_json::Error> for RegisterError {
    fn from(e: serde_json::Error) -> Self { Self::InvalidElement(e.to_string()) }
}
