//! Templates for rendering band sets into text

mod dat;
mod json;
mod table;

pub use dat::Dat;
pub use json::Json;
pub use table::Table;

use std::fmt;

use crate::language::BandSet;

#[derive(Debug)]
pub enum TemplateError {
    Json(serde_json::Error),
    Template(tinytemplate::error::Error),
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Json(error) => write!(f, "failed writing JSON: {}", error),
            TemplateError::Template(error) => write!(f, "failed filling template: {}", error),
        }
    }
}

impl std::error::Error for TemplateError {}

/// Trait for templates that transform band sets into a textual document
pub trait Template {
    /// Render the given band sets, in order, as one document
    fn render(&self, sets: &[BandSet]) -> Result<String, TemplateError>;

    /// File extension used when the document is written to disk
    fn extension(&self) -> &'static str;
}

/// Render band sets using the specified template
pub fn fill(template: &dyn Template, sets: &[BandSet]) -> Result<String, TemplateError> {
    template.render(sets)
}
