// Application layer - the presentation-facing contract over the store:
// pre-validation, recipient resolution, and display-ready history.

pub mod error;
pub mod service;

pub use error::*;
pub use service::*;
