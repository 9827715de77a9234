use crate::language::BandSet;

use super::{Template, TemplateError};

/// Band sets as a JSON array, for consumption by plotting scripts.
pub struct Json;

impl Template for Json {
    fn render(&self, sets: &[BandSet]) -> Result<String, TemplateError> {
        let mut output = serde_json::to_string_pretty(sets).map_err(TemplateError::Json)?;
        output.push('\n');
        Ok(output)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}
