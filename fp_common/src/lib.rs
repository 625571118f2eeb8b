mod cents;
pub mod helpers;
mod secret;

pub use cents::{Cents, CentsConversionError};
pub use secret::Secret;
