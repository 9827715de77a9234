use std::fmt;

use crate::language::*;

macro_rules! regex {
    ($pattern:expr) => {{
        use std::sync::OnceLock;
        static REGEX: OnceLock<regex::Regex> = OnceLock::new();
        REGEX.get_or_init(|| regex::Regex::new($pattern).unwrap_or_else(|e| panic!("{}", e)))
    }};
}

/// Problems that stop a bin line from being read. Every variant carries the
/// one-origin line number and the zero-origin byte column of the problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    Expected(usize, usize, &'static str),
    InvalidNumber(usize, usize, String),
    MissingPlusMinus(usize, usize),
    MissingDsys(usize, usize),
    DuplicateSource(usize, usize, String),
}

impl ParsingError {
    pub fn line(&self) -> usize {
        match self {
            ParsingError::Expected(line, _, _) => *line,
            ParsingError::InvalidNumber(line, _, _) => *line,
            ParsingError::MissingPlusMinus(line, _) => *line,
            ParsingError::MissingDsys(line, _) => *line,
            ParsingError::DuplicateSource(line, _, _) => *line,
        }
    }

    pub fn column(&self) -> usize {
        match self {
            ParsingError::Expected(_, column, _) => *column,
            ParsingError::InvalidNumber(_, column, _) => *column,
            ParsingError::MissingPlusMinus(_, column) => *column,
            ParsingError::MissingDsys(_, column) => *column,
            ParsingError::DuplicateSource(_, column, _) => *column,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParsingError::Expected(_, _, value) => format!("expected {}", value),
            ParsingError::InvalidNumber(_, _, token) => format!("invalid number '{}'", token),
            ParsingError::MissingPlusMinus(_, _) => "missing +- in bin line".to_string(),
            ParsingError::MissingDsys(_, _) => "missing DSYS in bin line".to_string(),
            ParsingError::DuplicateSource(line, _, name) => {
                format!("duplicate uncert source '{}' on line {}", name, line)
            }
        }
    }
}

impl fmt::Display for ParsingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// What a single line of input turned out to be, decided once up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'i> {
    Header(&'i str),
    Marker,
    Blank,
    Content(&'i str),
}

pub fn classify(content: &str) -> Line<'_> {
    if is_header_line(content) {
        Line::Header(header_name(content))
    } else if is_marker_line(content) {
        Line::Marker
    } else if content
        .trim()
        .is_empty()
    {
        Line::Blank
    } else {
        Line::Content(content)
    }
}

/// Read one bin line. The line number is only used for reporting.
pub fn parse_bin(number: usize, content: &str) -> Result<Bin, ParsingError> {
    let mut input = Parser::new();
    input.initialize(number, content);
    input.read_bin()
}

#[derive(Debug)]
pub struct Parser<'i> {
    source: &'i str,
    offset: usize,
    number: usize,
}

impl<'i> Parser<'i> {
    pub fn new() -> Parser<'i> {
        Parser {
            source: "",
            offset: 0,
            number: 0,
        }
    }

    pub fn initialize(&mut self, number: usize, content: &'i str) {
        self.source = content;
        self.offset = 0;
        self.number = number;
    }

    fn advance(&mut self, width: usize) {
        self.source = &self.source[width..];
        self.offset += width;
    }

    fn entire(&self) -> &'i str {
        self.source
    }

    fn is_finished(&self) -> bool {
        self.source
            .is_empty()
    }

    fn peek_next_char(&self) -> Option<char> {
        self.source
            .chars()
            .next()
    }

    /// Fork a parser over part of the current line. Does NOT advance the
    /// parent; the take_*() methods do that.
    fn subparser(&self, indent: usize, content: &'i str) -> Parser<'i> {
        Parser {
            source: content,
            offset: indent + self.offset,
            number: self.number,
        }
    }

    /// Hand everything up to (but not including) the first of the given
    /// characters to a nested parser, then move past it.
    fn take_until<A, F>(&mut self, pattern: &[char], function: F) -> Result<A, ParsingError>
    where
        F: Fn(&mut Parser<'i>) -> Result<A, ParsingError>,
    {
        let content = self.source;
        let end_pos = content
            .find(pattern)
            .unwrap_or(content.len());

        let block = &content[..end_pos];
        let mut parser = self.subparser(0, block);

        let result = function(&mut parser)?;

        self.advance(end_pos);

        Ok(result)
    }

    fn require_char(&mut self, c: char, value: &'static str) -> Result<(), ParsingError> {
        if self.peek_next_char() == Some(c) {
            self.advance(c.len_utf8());
            Ok(())
        } else {
            Err(ParsingError::Expected(self.number, self.offset, value))
        }
    }

    fn trim_whitespace(&mut self) {
        let content = self.source;
        let trimmed = content.trim_start();
        self.advance(content.len() - trimmed.len());
    }

    /// Convert a token found at `start` bytes into the current source.
    fn parse_number(&self, start: usize, token: &str) -> Result<f64, ParsingError> {
        let trimmed = token.trim_start();
        let column = self.offset + start + (token.len() - trimmed.len());
        let trimmed = trimmed.trim_end();

        if trimmed.is_empty() {
            return Err(ParsingError::Expected(self.number, column, "a number"));
        }

        trimmed
            .parse::<f64>()
            .map_err(|_| ParsingError::InvalidNumber(self.number, column, trimmed.to_string()))
    }

    pub fn read_bin(&mut self) -> Result<Bin, ParsingError> {
        let (min, max) = self.take_until(&[';'], |inner| inner.read_range())?;
        self.require_char(';', "a ';' after the bin range")?;

        let (xsec, stat) = self.take_until(&['('], |inner| inner.read_measurement())?;
        self.require_char('(', "a '(' opening the uncertainty sources")?;

        let mut bin = Bin::new(min, max, xsec, stat);
        self.read_sources(&mut bin)?;

        Ok(bin)
    }

    /// The bin range is one of
    ///
    /// min
    /// min TO max
    /// >=min
    ///
    /// where an open-ended bin is given a nominal width of one.
    fn read_range(&mut self) -> Result<(f64, f64), ParsingError> {
        let re = regex!(r"^\s*(>=)?\s*(\S+)(?:\s+(\S+)(?:\s+(\S+))?)?");

        let cap = re
            .captures(self.source)
            .ok_or(ParsingError::Expected(
                self.number,
                self.offset,
                "a lower bin edge",
            ))?;

        let one = cap
            .get(2)
            .ok_or(ParsingError::Expected(
                self.number,
                self.offset,
                "a lower bin edge",
            ))?;
        let min = self.parse_number(one.start(), one.as_str())?;

        if cap
            .get(1)
            .is_some()
        {
            return Ok((min, min + 1.0));
        }

        match cap.get(3) {
            Some(token) if token.as_str() == "TO" => {
                let four = cap
                    .get(4)
                    .ok_or(ParsingError::Expected(
                        self.number,
                        self.offset + token.end(),
                        "an upper bin edge after TO",
                    ))?;
                let max = self.parse_number(four.start(), four.as_str())?;
                Ok((min, max))
            }
            _ => Ok((min, min)),
        }
    }

    /// xsec +- stat
    fn read_measurement(&mut self) -> Result<(f64, f64), ParsingError> {
        let re = regex!(r"^\s*(\S+)(?:\s+(\S+))?(?:\s+(\S+))?");

        let cap = re
            .captures(self.source)
            .ok_or(ParsingError::Expected(
                self.number,
                self.offset,
                "a cross section",
            ))?;

        let one = cap
            .get(1)
            .ok_or(ParsingError::Expected(
                self.number,
                self.offset,
                "a cross section",
            ))?;

        // 1+-0.1 arrives as a single token
        if let Some(i) = one
            .as_str()
            .find("+-")
        {
            return Err(ParsingError::MissingPlusMinus(
                self.number,
                self.offset + one.start() + i,
            ));
        }
        let xsec = self.parse_number(one.start(), one.as_str())?;

        match cap.get(2) {
            Some(two) if two.as_str() == "+-" => {}
            Some(two) => {
                return Err(ParsingError::MissingPlusMinus(
                    self.number,
                    self.offset + two.start(),
                ))
            }
            None => {
                return Err(ParsingError::MissingPlusMinus(
                    self.number,
                    self.offset + one.end(),
                ))
            }
        }

        let three = cap
            .get(3)
            .ok_or(ParsingError::Expected(
                self.number,
                self.offset + self.source.len(),
                "a statistical uncertainty after +-",
            ))?;
        let stat = self.parse_number(three.start(), three.as_str())?;

        Ok((xsec, stat))
    }

    /// Sources run from just after the '(' to the terminating ';' or the end
    /// of the line. There has to be at least one.
    fn read_sources(&mut self, bin: &mut Bin) -> Result<(), ParsingError> {
        let mut first = true;

        loop {
            self.trim_whitespace();

            if !first && (self.is_finished() || self.peek_next_char() == Some(';')) {
                return Ok(());
            }
            first = false;

            let column = self.offset;
            let (name, value) = self.read_source()?;

            if bin
                .sources
                .contains_key(name)
            {
                return Err(ParsingError::DuplicateSource(
                    self.number,
                    column,
                    name.to_string(),
                ));
            }

            bin.sources
                .insert(name.to_string(), value);
        }
    }

    /// DSYS=value:name or DSYS=value,value:name, followed by ',' if more
    /// sources follow or ')' if this is the last one.
    fn read_source(&mut self) -> Result<(&'i str, f64), ParsingError> {
        if !self
            .source
            .starts_with("DSYS")
        {
            return Err(ParsingError::MissingDsys(self.number, self.offset));
        }
        self.advance(4);
        self.trim_whitespace();
        self.require_char('=', "'=' after DSYS")?;

        let value = self.take_until(&[':'], |inner| inner.read_magnitude())?;
        self.require_char(':', "':' before the source name")?;

        let name = self.take_until(&[',', ')'], |inner| inner.read_source_name())?;

        match self.peek_next_char() {
            Some(',') | Some(')') => self.advance(1),
            _ => {
                return Err(ParsingError::Expected(
                    self.number,
                    self.offset,
                    "',' or ')' after the source name",
                ))
            }
        }

        Ok((name, value))
    }

    /// Asymmetric uncertainties are symmetrized by taking the larger of the
    /// two magnitudes. A single value is kept exactly as written.
    fn read_magnitude(&mut self) -> Result<f64, ParsingError> {
        let content = self.entire();

        match content.find(',') {
            None => self.parse_number(0, content),
            Some(i) => {
                let up = self.parse_number(0, &content[..i])?;
                let down = self.parse_number(i + 1, &content[i + 1..])?;
                Ok(up
                    .abs()
                    .max(down.abs()))
            }
        }
    }

    fn read_source_name(&mut self) -> Result<&'i str, ParsingError> {
        let name = self
            .entire()
            .trim();

        if name.is_empty() {
            return Err(ParsingError::Expected(
                self.number,
                self.offset,
                "an uncertainty source name",
            ));
        }

        Ok(name)
    }
}

fn is_header_line(content: &str) -> bool {
    content.starts_with("*dataset:")
}

fn is_marker_line(content: &str) -> bool {
    content.starts_with('*')
}

/// The variable name is whatever follows the last '/' of the dataset path.
fn header_name(content: &str) -> &str {
    let path = &content["*dataset:".len()..];

    match path.rfind('/') {
        Some(i) => path[i + 1..].trim(),
        None => path.trim(),
    }
}
