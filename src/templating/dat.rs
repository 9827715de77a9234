use serde::Serialize;
use tinytemplate::TinyTemplate;

use crate::language::BandSet;

use super::{Template, TemplateError};

/// One block per variable: the lower edge of every bin followed by its band
/// values from the outermost (total) inwards, then a closing row holding the
/// upper edge and zeros.
static TEMPLATE: &str = "{{ for variable in variables }}var {variable.name}
{{ for row in variable.rows }}{row.edge}{{ for value in row.values }} {value}{{ endfor }}
{{ endfor }}
{{ endfor }}";

#[derive(Serialize)]
struct Context {
    variables: Vec<Block>,
}

#[derive(Serialize)]
struct Block {
    name: String,
    rows: Vec<Row>,
}

#[derive(Serialize)]
struct Row {
    edge: String,
    values: Vec<String>,
}

/// The whitespace separated table understood by gnuplot style tools.
pub struct Dat;

fn block(set: &BandSet) -> Block {
    let width = set
        .bands
        .len();

    let mut rows: Vec<Row> = (0..set.bin_count())
        .map(|j| Row {
            edge: set.edges[j].to_string(),
            values: set
                .bands
                .iter()
                .rev()
                .map(|band| band[j].to_string())
                .collect(),
        })
        .collect();

    if let Some(last) = set
        .edges
        .last()
    {
        rows.push(Row {
            edge: last.to_string(),
            values: vec!["0".to_string(); width],
        });
    }

    Block {
        name: set
            .name
            .clone(),
        rows,
    }
}

impl Template for Dat {
    fn render(&self, sets: &[BandSet]) -> Result<String, TemplateError> {
        let mut tt = TinyTemplate::new();
        tt.set_default_formatter(&tinytemplate::format_unescaped);
        tt.add_template("dat", TEMPLATE)
            .map_err(TemplateError::Template)?;

        let context = Context {
            variables: sets
                .iter()
                .map(block)
                .collect(),
        };

        tt.render("dat", &context)
            .map_err(TemplateError::Template)
    }

    fn extension(&self) -> &'static str {
        "dat"
    }
}
