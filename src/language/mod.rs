// Types representing measured cross sections and their uncertainties

mod error;
mod types;

// Re-export all public symbols
pub use error::*;
pub use types::*;
