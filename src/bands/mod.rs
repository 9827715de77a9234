//! Cumulative, normalized uncertainty bands

use std::fmt;

use tracing::{info, warn};

use crate::language::{BandSet, Dataset, Mode};

mod aggregate;
mod select;

pub use aggregate::*;
pub use select::*;

#[derive(Debug, Clone, PartialEq)]
pub enum AggregationError {
    /// A bin lacks a source the current mode needs. `bin` is the zero-origin
    /// index of the bin within its variable, `context` its range.
    MissingSource {
        variable: String,
        source: String,
        bin: usize,
        context: String,
    },
    ZeroCrossSection {
        variable: String,
        bin: usize,
    },
    NoBins(String),
}

impl AggregationError {
    pub fn message(&self) -> String {
        match self {
            AggregationError::MissingSource {
                variable,
                source,
                bin,
                context,
            } => format!(
                "no uncertainty source '{}' in {} of {} (bin {})",
                source,
                context,
                variable,
                bin + 1
            ),
            AggregationError::ZeroCrossSection { variable, bin } => {
                format!("zero cross section in bin {} of {}", bin + 1, variable)
            }
            AggregationError::NoBins(variable) => format!("variable {} has no bins", variable),
        }
    }
}

impl fmt::Display for AggregationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Compute bands for every variable in the dataset, in name order. Variables
/// without any bins have nothing to draw and are skipped with a warning; any
/// other problem aborts the whole run.
pub fn aggregate_dataset(dataset: &Dataset, mode: Mode) -> Result<Vec<BandSet>, AggregationError> {
    let mut result = Vec::with_capacity(dataset.len());

    for variable in dataset.iter() {
        info!("Aggregating {}", variable.name);

        match aggregate(variable, mode) {
            Ok(bands) => result.push(bands),
            Err(AggregationError::NoBins(name)) => {
                warn!("variable {} has no bins, skipping", name);
            }
            Err(error) => return Err(error),
        }
    }

    Ok(result)
}
