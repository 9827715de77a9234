#[cfg(test)]
mod syntax {
    use hepbands::parsing::{self, ParsingError};

    /// Wrap a single bin line in a block so that it lands on line 2.
    fn expect_error(line: &str, expected: ParsingError) {
        let content = format!("*dataset: a/pT_yy\n{}\n*dataend:\n", line);

        match parsing::parse(&content) {
            Ok(_) => panic!(
                "Expected parsing to fail, but it succeeded for input: {}",
                line
            ),
            Err(error) => {
                assert_eq!(error, expected, "for input '{}'", line);
            }
        }
    }

    fn expect_kind(line: &str, expected: ParsingError) {
        let content = format!("*dataset: a/pT_yy\n{}\n*dataend:\n", line);

        match parsing::parse(&content) {
            Ok(_) => panic!(
                "Expected parsing to fail, but it succeeded for input: {}",
                line
            ),
            Err(error) => {
                if std::mem::discriminant(&error) != std::mem::discriminant(&expected) {
                    panic!(
                        "Expected error type like {:?} but got: {:?} for input '{}'",
                        expected, error, line
                    );
                }
                assert_eq!(error.line(), 2);
            }
        }
    }

    #[test]
    fn missing_plus_minus() {
        expect_error(
            "0 TO 20;0.42 0.05(DSYS=0.012:lumi)",
            ParsingError::MissingPlusMinus(2, 13),
        );
        expect_kind(
            "0 TO 20;0.42 -+ 0.05(DSYS=0.012:lumi)",
            ParsingError::MissingPlusMinus(0, 0),
        );
        expect_kind(
            "0 TO 20;0.42(DSYS=0.012:lumi)",
            ParsingError::MissingPlusMinus(0, 0),
        );
        expect_error(
            "0 TO 20;0.42+-0.05(DSYS=0.012:lumi)",
            ParsingError::MissingPlusMinus(2, 12),
        );
    }

    #[test]
    fn missing_dsys() {
        expect_error(
            "0 TO 20;0.42 +- 0.05(SYS=0.012:lumi)",
            ParsingError::MissingDsys(2, 21),
        );
        expect_kind(
            "0 TO 20;0.42 +- 0.05(DSYS=0.012:lumi,0.1:jes)",
            ParsingError::MissingDsys(0, 0),
        );
        expect_kind("1;1 +- 0.1()", ParsingError::MissingDsys(0, 0));
    }

    #[test]
    fn duplicate_source() {
        expect_error(
            "0 TO 20;0.42 +- 0.05(DSYS=0.012:lumi,DSYS=0.012:lumi)",
            ParsingError::DuplicateSource(2, 37, "lumi".to_string()),
        );
        expect_kind(
            "0 TO 20;1 +- 0.1(DSYS=1:x,DSYS=2:x)",
            ParsingError::DuplicateSource(0, 0, String::new()),
        );
    }

    #[test]
    fn duplicate_source_message() {
        let error = ParsingError::DuplicateSource(7, 0, "jes".to_string());
        assert_eq!(error.message(), "duplicate uncert source 'jes' on line 7");
    }

    #[test]
    fn invalid_numbers() {
        expect_error(
            "0 TO twenty;0.42 +- 0.05(DSYS=0.012:lumi)",
            ParsingError::InvalidNumber(2, 5, "twenty".to_string()),
        );
        expect_kind(
            "0 TO 20;lots +- 0.05(DSYS=0.012:lumi)",
            ParsingError::InvalidNumber(0, 0, String::new()),
        );
        expect_kind(
            "0 TO 20;0.42 +- 0.05(DSYS=big:lumi)",
            ParsingError::InvalidNumber(0, 0, String::new()),
        );
    }

    #[test]
    fn missing_delimiters() {
        expect_kind(
            "0 TO 20 0.42 +- 0.05(DSYS=0.012:lumi)",
            ParsingError::Expected(0, 0, ""),
        );
        expect_kind(
            "0 TO 20;0.42 +- 0.05 DSYS=0.012:lumi",
            ParsingError::Expected(0, 0, ""),
        );
        expect_kind(
            "0 TO 20;0.42 +- 0.05(DSYS 0.012:lumi)",
            ParsingError::Expected(0, 0, ""),
        );
    }

    #[test]
    fn first_error_stops_parsing() {
        let content = r#"*dataset: a/pT_yy
0 TO 20;0.42 +- 0.05(DSYS=0.012:lumi)
20 TO 45;0.31 0.04(DSYS=0.009:lumi)
45 TO 120;0.12 +- 0.02(SYS=0.0035:lumi)
*dataend:
"#;

        let error = parsing::parse(content).unwrap_err();
        assert_eq!(error.line(), 3);
        assert!(matches!(error, ParsingError::MissingPlusMinus(..)));
    }
}
