// Utility functions
pub mod error;
pub mod tls;

pub use error::*;
