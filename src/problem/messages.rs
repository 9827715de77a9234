use hepbands::parsing::ParsingError;

/// Generate problem and detail messages for parsing errors
pub fn generate_error_message(error: &ParsingError) -> (String, String) {
    match error {
        ParsingError::Expected(_, _, value) => (
            format!("Expected {}", value),
            r#"
Bin lines have the form

    min TO max;xsec +- stat(DSYS=value:name,DSYS=up,down:name)

where the range may also be a single value, or an open-ended >=min.
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::InvalidNumber(_, _, token) => (
            format!("Invalid number '{}'", token),
            "Bin edges, cross sections and uncertainties must all be decimal numbers.".to_string(),
        ),
        ParsingError::MissingPlusMinus(_, _) => (
            "Missing +- in bin line".to_string(),
            r#"
The measured cross section and its statistical uncertainty must be separated
by the token +- surrounded by whitespace, for example 0.75 +- 0.12
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::MissingDsys(_, _) => (
            "Missing DSYS in bin line".to_string(),
            r#"
Every uncertainty source inside the parenthesis must start with DSYS=, as in
DSYS=0.014:lumi, and sources are separated by commas.
            "#
            .trim_ascii()
            .to_string(),
        ),
        ParsingError::DuplicateSource(_, _, name) => (
            format!("Duplicate uncertainty source '{}'", name),
            format!(
                "The source '{}' was already given for this bin. Each source may appear only once per bin.",
                name
            ),
        ),
    }
}
