pub mod error;
pub mod extract;
pub mod generate;
pub mod session;
pub mod speech;
pub mod tutor;
pub mod validate;

pub use error::{ExtractionError, ProviderError, ValidationError};
