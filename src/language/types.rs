//! Types representing a parsed HepData cross-section table

use std::collections::BTreeMap;

use serde::Serialize;

use super::LookupError;

/// Uncertainty sources with dedicated places in the band stack. They never
/// take part in ranking correlated sources.
pub const LUMINOSITY: &str = "lumi";
pub const SIGNAL_EXTRACTION: &str = "fit";
pub const BACKGROUND_MODEL: &str = "bkg_model_uncorr";

pub fn is_dedicated_source(name: &str) -> bool {
    name == LUMINOSITY || name == SIGNAL_EXTRACTION || name == BACKGROUND_MODEL
}

/// One measurement interval of a variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub min: f64,
    pub max: f64,
    pub xsec: f64,
    pub stat: f64,
    pub sources: BTreeMap<String, f64>,
}

impl Bin {
    pub fn new(min: f64, max: f64, xsec: f64, stat: f64) -> Bin {
        Bin {
            min,
            max,
            xsec,
            stat,
            sources: BTreeMap::new(),
        }
    }

    /// Look up the magnitude of a named uncertainty source in this bin.
    pub fn source(&self, name: &str) -> Result<f64, LookupError> {
        self.sources
            .get(name)
            .copied()
            .ok_or_else(|| LookupError {
                key: name.to_string(),
                context: format!("bin [{}, {})", self.min, self.max),
            })
    }
}

/// A measured observable and its bins, in the order they appeared in the
/// file. The last bin's upper bound closes the binning.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub bins: Vec<Bin>,
}

impl Variable {
    pub fn new(name: &str) -> Variable {
        Variable {
            name: name.to_string(),
            bins: Vec::new(),
        }
    }

    /// All lower bin edges followed by the upper edge of the last bin.
    pub fn edges(&self) -> Vec<f64> {
        let mut edges: Vec<f64> = self
            .bins
            .iter()
            .map(|bin| bin.min)
            .collect();

        if let Some(last) = self
            .bins
            .last()
        {
            edges.push(last.max);
        }

        edges
    }
}

/// Every variable found in one input file, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub variables: BTreeMap<String, Variable>,
}

impl Dataset {
    pub fn new() -> Dataset {
        Dataset::default()
    }

    pub fn get(&self, name: &str) -> Result<&Variable, LookupError> {
        self.variables
            .get(name)
            .ok_or_else(|| LookupError {
                key: name.to_string(),
                context: "dataset".to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables
            .contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.variables
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables
            .is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables
            .values()
    }
}

/// How the non-statistical uncertainty sources get grouped into bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Luminosity, everything else, signal extraction, statistics.
    Plain,
    /// The most significant individual sources, then the remainder.
    Correlated,
}

/// Fractional, cumulative uncertainty bands for one variable, ready to be
/// drawn. `bands[i][j]` is component `i` in bin `j`; each component already
/// includes all of the ones before it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandSet {
    pub name: String,
    pub components: Vec<String>,
    pub edges: Vec<f64>,
    pub bands: Vec<Vec<f64>>,
}

impl BandSet {
    pub fn bin_count(&self) -> usize {
        self.edges
            .len()
            .saturating_sub(1)
    }
}
