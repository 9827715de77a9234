//! Grouping of bin lines into variable blocks

use std::fmt;

use tracing::{debug, warn};

use crate::language::*;

use super::parser::{self, Line, ParsingError};

/// Where the builder is relative to a `*dataset:` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Outside,
    Inside(String),
}

/// Problems that are reported but don't stop ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsingWarning {
    /// A `*dataset:` header named a variable that was already read. The
    /// first definition is kept and the block that follows is ignored.
    RepeatedVariable(usize, String),
}

impl ParsingWarning {
    pub fn line(&self) -> usize {
        match self {
            ParsingWarning::RepeatedVariable(line, _) => *line,
        }
    }

    pub fn message(&self) -> String {
        match self {
            ParsingWarning::RepeatedVariable(_, name) => format!("repeated variable: {}", name),
        }
    }
}

impl fmt::Display for ParsingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// The outcome of reading one input file.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub dataset: Dataset,
    pub warnings: Vec<ParsingWarning>,
}

#[derive(Debug)]
pub struct Builder {
    dataset: Dataset,
    scope: Scope,
    warnings: Vec<ParsingWarning>,
}

impl Builder {
    pub fn new() -> Builder {
        Builder {
            dataset: Dataset::new(),
            scope: Scope::Outside,
            warnings: Vec::new(),
        }
    }

    pub fn current(&self) -> &Scope {
        &self.scope
    }

    /// Feed the next line of input. `number` is one-origin.
    pub fn feed(&mut self, number: usize, content: &str) -> Result<(), ParsingError> {
        let line = parser::classify(content);

        match self
            .scope
            .clone()
        {
            Scope::Outside => {
                if let Line::Header(name) = line {
                    self.open(number, name);
                }
            }
            Scope::Inside(name) => {
                match line {
                    Line::Content(content) => {
                        let bin = parser::parse_bin(number, content)?;
                        self.variable(&name)
                            .bins
                            .push(bin);
                    }
                    Line::Header(_) | Line::Marker => {
                        // markers before the first bin are preamble
                        if !self
                            .variable(&name)
                            .bins
                            .is_empty()
                        {
                            debug!("Closing {} at line {}", name, number);
                            self.scope = Scope::Outside;
                        }
                    }
                    Line::Blank => {}
                }
            }
        }

        Ok(())
    }

    pub fn finish(self) -> Parsed {
        Parsed {
            dataset: self.dataset,
            warnings: self.warnings,
        }
    }

    fn open(&mut self, number: usize, name: &str) {
        if self
            .dataset
            .contains(name)
        {
            warn!("repeated variable: {}", name);
            self.warnings
                .push(ParsingWarning::RepeatedVariable(number, name.to_string()));
            return;
        }

        debug!("Opening {} at line {}", name, number);
        self.dataset
            .variables
            .insert(name.to_string(), Variable::new(name));
        self.scope = Scope::Inside(name.to_string());
    }

    fn variable(&mut self, name: &str) -> &mut Variable {
        self.dataset
            .variables
            .entry(name.to_string())
            .or_insert_with(|| Variable::new(name))
    }
}

impl Default for Builder {
    fn default() -> Self {
        Builder::new()
    }
}
