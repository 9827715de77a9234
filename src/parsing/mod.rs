//! parser for HepData cross-section tables

use std::path::Path;
use tracing::debug;

use crate::language::LoadingError;

pub mod parser;
mod scope;

pub use parser::ParsingError;
pub use scope::{Builder, Parsed, ParsingWarning, Scope};

/// Read a file and return an owned String. Errors carry the filename so they
/// can be reported without further context.
pub fn load(filename: &Path) -> Result<String, LoadingError<'_>> {
    match std::fs::read_to_string(filename) {
        Ok(content) => Ok(content),
        Err(error) => {
            debug!(?error);
            match error.kind() {
                std::io::ErrorKind::NotFound => Err(LoadingError {
                    problem: "File not found".to_string(),
                    details: String::new(),
                    filename,
                }),
                _ => Err(LoadingError {
                    problem: "Failed reading".to_string(),
                    details: error
                        .kind()
                        .to_string(),
                    filename,
                }),
            }
        }
    }
}

/// Parse text into a Dataset, stopping at the first malformed bin line.
/// Repeated variables are reported as warnings alongside the result.
pub fn parse(content: &str) -> Result<Parsed, ParsingError> {
    let mut builder = Builder::new();

    for (i, line) in content
        .lines()
        .enumerate()
    {
        if let Err(error) = builder.feed(i + 1, line) {
            debug!("error: {:?}", error);
            return Err(error);
        }
    }

    let parsed = builder.finish();

    let count = parsed
        .dataset
        .len();
    debug!(
        "Found {} variable{}",
        count,
        if count == 1 { "" } else { "s" }
    );
    if !parsed
        .warnings
        .is_empty()
    {
        debug!("warnings: {}", parsed.warnings.len());
    }

    Ok(parsed)
}
