use crate::formatting::{render_to_string, Render, Syntax};
use crate::language::BandSet;

use super::{Template, TemplateError};

const PRECISION: usize = 5;

/// A human readable table per variable, styled by the given renderer.
pub struct Table<R: Render>(pub R);

fn column_width(label: &str) -> usize {
    label
        .chars()
        .count()
        .max(PRECISION + 5)
}

fn format_set(set: &BandSet) -> Vec<(Syntax, String)> {
    let mut fragments = Vec::new();

    fragments.push((Syntax::Variable, set.name.clone()));
    fragments.push((Syntax::Newline, "\n".to_string()));

    let ranges: Vec<String> = (0..set.bin_count())
        .map(|j| format!("[{}, {})", set.edges[j], set.edges[j + 1]))
        .collect();
    let first = ranges
        .iter()
        .map(|range| range.len())
        .max()
        .unwrap_or(0)
        .max(3);

    fragments.push((Syntax::Label, format!("{:<first$}", "bin")));
    for label in &set.components {
        let width = column_width(label);
        fragments.push((Syntax::Structure, "  ".to_string()));
        fragments.push((Syntax::Label, format!("{:>width$}", label)));
    }
    fragments.push((Syntax::Newline, "\n".to_string()));

    for (j, range) in ranges
        .iter()
        .enumerate()
    {
        fragments.push((Syntax::Edge, format!("{:<first$}", range)));
        for (label, band) in set
            .components
            .iter()
            .zip(&set.bands)
        {
            let width = column_width(label);
            let precision = PRECISION;
            fragments.push((Syntax::Structure, "  ".to_string()));
            fragments.push((Syntax::Numeric, format!("{:>width$.precision$}", band[j])));
        }
        fragments.push((Syntax::Newline, "\n".to_string()));
    }

    fragments
}

impl<R: Render> Template for Table<R> {
    fn render(&self, sets: &[BandSet]) -> Result<String, TemplateError> {
        let mut fragments = Vec::new();

        for (i, set) in sets
            .iter()
            .enumerate()
        {
            if i > 0 {
                fragments.push((Syntax::Newline, "\n".to_string()));
            }
            fragments.extend(format_set(set));
        }

        Ok(render_to_string(&self.0, fragments))
    }

    fn extension(&self) -> &'static str {
        "txt"
    }
}
