use super::messages::generate_error_message;
use hepbands::{language::LoadingError, parsing::ParsingError, parsing::ParsingWarning};
use owo_colors::OwoColorize;
use std::path::Path;

/// Format a parsing error with full details including source code context
pub fn full_parsing_error(error: &ParsingError, filename: &Path, source: &str) -> String {
    let (problem, details) = generate_error_message(error);

    let line = error.line();
    let code = source
        .lines()
        .nth(line.saturating_sub(1))
        .unwrap_or("?");
    let column = calculate_column_number(code, error.column()) + 1;
    let width = 3.max(
        line.to_string()
            .len(),
    );

    format!(
        r#"
{}: {}:{}:{} {}

{:width$} {}
{:width$} {} {}
{:width$} {} {:>column$}

{}
        "#,
        "error".bright_red(),
        filename.to_string_lossy(),
        line,
        column,
        problem.bold(),
        ' ',
        '|'.bright_blue(),
        line.bright_blue(),
        '|'.bright_blue(),
        code,
        ' ',
        '|'.bright_blue(),
        '^'.bright_red(),
        details
    )
    .trim_ascii()
    .to_string()
}

/// Format a LoadingError with concise single-line output
pub fn concise_loading_error<'i>(error: &LoadingError<'i>) -> String {
    format!(
        "{}: {}: {}",
        "error".bright_red(),
        error
            .filename
            .display(),
        error
            .problem
            .bold()
    )
}

/// Format any other fatal problem concerning the given file
pub fn concise_error(filename: &Path, problem: &str) -> String {
    format!(
        "{}: {}: {}",
        "error".bright_red(),
        filename.to_string_lossy(),
        problem.bold()
    )
}

pub fn concise_warning(warning: &ParsingWarning, filename: &Path) -> String {
    format!(
        "{}: {}:{} {}",
        "warning".bright_yellow(),
        filename.to_string_lossy(),
        warning.line(),
        warning.message()
    )
}

/// Errors carry byte offsets; humans count characters.
fn calculate_column_number(code: &str, offset: usize) -> usize {
    let offset = offset.min(code.len());
    match code.get(..offset) {
        Some(before) => before
            .chars()
            .count(),
        None => offset,
    }
}
