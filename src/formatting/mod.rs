//! Styling of textual output

mod syntax;
mod terminal;

pub use syntax::*;
pub use terminal::Terminal;

/// Output is produced in two passes. First the content is broken into
/// fragments tagged with their Syntax, then the given renderer embellishes
/// each fragment and the results are joined.
pub fn render_to_string(renderer: &impl Render, fragments: Vec<(Syntax, String)>) -> String {
    let mut output = String::new();

    for (syntax, content) in fragments {
        let rendered = renderer.style(syntax, &content);
        output.push_str(&rendered);
    }

    if !output.is_empty() && !output.ends_with('\n') {
        output.push('\n');
    }

    output
}
