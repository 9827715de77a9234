//! Reference cross sections replacing the measured ones
//!
//! The table is whitespace separated, one variable per line:
//!
//! ```text
//! pT_yy 0.42 0.31 0.12
//! N_j_30 1.1 0.6 0.2 0.05
//! ```

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::language::Dataset;

pub type ReferenceTable = BTreeMap<String, Vec<f64>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    MissingVariable(String),
    BinCountMismatch {
        variable: String,
        expected: usize,
        found: usize,
    },
    InvalidValue(usize, String),
    RepeatedVariable(usize, String),
}

impl MergeError {
    pub fn message(&self) -> String {
        match self {
            MergeError::MissingVariable(name) => {
                format!("no reference cross section for variable {}", name)
            }
            MergeError::BinCountMismatch {
                variable,
                expected,
                found,
            } => format!(
                "unequal binning in reference cross sections for {}: {} bins, {} values",
                variable, expected, found
            ),
            MergeError::InvalidValue(line, token) => {
                format!("invalid number '{}' on line {}", token, line)
            }
            MergeError::RepeatedVariable(line, name) => {
                format!("repeated variable {} on line {}", name, line)
            }
        }
    }
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Read a reference table. Blank lines are ignored.
pub fn parse(content: &str) -> Result<ReferenceTable, MergeError> {
    let mut table = ReferenceTable::new();

    for (i, line) in content
        .lines()
        .enumerate()
    {
        let mut tokens = line.split_whitespace();

        let name = match tokens.next() {
            Some(name) => name,
            None => continue,
        };

        let values = tokens
            .map(|token| {
                token
                    .parse::<f64>()
                    .map_err(|_| MergeError::InvalidValue(i + 1, token.to_string()))
            })
            .collect::<Result<Vec<f64>, MergeError>>()?;

        if table.contains_key(name) {
            return Err(MergeError::RepeatedVariable(i + 1, name.to_string()));
        }
        table.insert(name.to_string(), values);
    }

    debug!("Read {} reference cross sections", table.len());

    Ok(table)
}

/// Replace the cross section of every bin with the reference value at the
/// same index. Every variable in the dataset must be present in the table
/// with exactly as many values as it has bins.
pub fn apply(dataset: &Dataset, table: &ReferenceTable) -> Result<Dataset, MergeError> {
    let mut result = dataset.clone();

    for variable in result
        .variables
        .values_mut()
    {
        let values = table
            .get(&variable.name)
            .ok_or_else(|| MergeError::MissingVariable(variable.name.clone()))?;

        if values.len() != variable.bins.len() {
            return Err(MergeError::BinCountMismatch {
                variable: variable
                    .name
                    .clone(),
                expected: variable
                    .bins
                    .len(),
                found: values.len(),
            });
        }

        for (bin, value) in variable
            .bins
            .iter_mut()
            .zip(values)
        {
            bin.xsec = *value;
        }
    }

    Ok(result)
}
