use tracing::debug;

use crate::language::*;

use super::select::{select, Selection};
use super::AggregationError;

/// Band labels for the fixed stack used in plain mode, innermost first.
pub const PLAIN_COMPONENTS: [&str; 4] = [
    "Luminosity",
    "Correction factor",
    "Signal extraction",
    "Statistics",
];

/// Label of the band that merges the sources not selected individually.
pub const OTHERS_COMPONENT: &str = "Others";

/// Descriptive label for a correlated source. Names without one are used as
/// they are.
pub fn source_label(name: &str) -> &str {
    match name {
        "jes_pu_rho" => "Jet pileup suppression",
        "gen_model" => "Theoretical modelling",
        "jes_flav_comp" => "Jet flavour dependence",
        "JER" => "Jet energy resolution",
        "iso" => "Isolation",
        "pileup" => "Pileup",
        "trig" => "Trigger",
        "PID" => "Photon identification",
        "prw" => "Pileup modelling",
        "PES" => "Photon energy scale",
        _ => name,
    }
}

fn sq(x: f64) -> f64 {
    x * x
}

fn qadd(a: f64, b: f64) -> f64 {
    (sq(a) + sq(b)).sqrt()
}

/// Turn one variable's bins into transposed, cumulative fractional bands.
pub fn aggregate(variable: &Variable, mode: Mode) -> Result<BandSet, AggregationError> {
    if variable
        .bins
        .is_empty()
    {
        return Err(AggregationError::NoBins(
            variable
                .name
                .clone(),
        ));
    }

    if let Some(i) = variable
        .bins
        .iter()
        .position(|bin| bin.xsec == 0.0)
    {
        return Err(AggregationError::ZeroCrossSection {
            variable: variable
                .name
                .clone(),
            bin: i,
        });
    }

    let missing = |i: usize, error: LookupError| AggregationError::MissingSource {
        variable: variable
            .name
            .clone(),
        source: error.key,
        bin: i,
        context: error.context,
    };

    let mut rows = Vec::with_capacity(
        variable
            .bins
            .len(),
    );

    let components: Vec<String> = match mode {
        Mode::Plain => {
            for (i, bin) in variable
                .bins
                .iter()
                .enumerate()
            {
                rows.push(plain_components(bin).map_err(|error| missing(i, error))?);
            }

            PLAIN_COMPONENTS
                .iter()
                .map(|label| label.to_string())
                .collect()
        }
        Mode::Correlated => {
            let selection = select(&variable.bins);
            debug!(
                "{}: selected {:?}, other {:?}",
                variable.name, selection.selected, selection.other
            );

            for (i, bin) in variable
                .bins
                .iter()
                .enumerate()
            {
                rows.push(correlated_components(bin, &selection).map_err(|error| missing(i, error))?);
            }

            selection
                .selected
                .iter()
                .map(|name| source_label(name).to_string())
                .chain(std::iter::once(OTHERS_COMPONENT.to_string()))
                .collect()
        }
    };

    for (row, bin) in rows
        .iter_mut()
        .zip(&variable.bins)
    {
        accumulate(row);
        normalize(row, bin.xsec);
    }

    Ok(BandSet {
        name: variable
            .name
            .clone(),
        components,
        edges: variable.edges(),
        bands: transpose(&rows),
    })
}

/// [lumi, everything else, fit ⊕ bkg_model_uncorr, stat]
pub fn plain_components(bin: &Bin) -> Result<Vec<f64>, LookupError> {
    let lumi = bin.source(LUMINOSITY)?;

    let rest = bin
        .sources
        .iter()
        .filter(|(name, _)| !is_dedicated_source(name))
        .map(|(_, value)| sq(*value))
        .sum::<f64>()
        .sqrt();

    let extraction = qadd(bin.source(SIGNAL_EXTRACTION)?, bin.source(BACKGROUND_MODEL)?);

    Ok(vec![lumi, rest, extraction, bin.stat])
}

/// The selected sources in order, then the others added in quadrature.
pub fn correlated_components(bin: &Bin, selection: &Selection) -> Result<Vec<f64>, LookupError> {
    let mut values = Vec::with_capacity(
        selection
            .selected
            .len()
            + 1,
    );

    debug!("{}", bin.min);
    for name in &selection.selected {
        let value = bin.source(name)?;
        debug!("  {} {}", name, value);
        values.push(value);
    }

    let mut total = 0.0;
    for name in &selection.other {
        total += sq(bin.source(name)?);
    }
    values.push(total.sqrt());

    Ok(values)
}

/// Stack in quadrature, so that each element includes all those before it.
pub fn accumulate(values: &mut [f64]) {
    for i in 1..values.len() {
        values[i] = qadd(values[i], values[i - 1]);
    }
}

/// Convert absolute uncertainties into fractions of the cross section.
pub fn normalize(values: &mut [f64], xsec: f64) {
    for value in values.iter_mut() {
        *value /= xsec;
    }
}

/// Rows of per-bin vectors into one sequence per component.
pub fn transpose(rows: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let width = rows
        .first()
        .map(|row| row.len())
        .unwrap_or(0);

    (0..width)
        .map(|i| {
            rows.iter()
                .map(|row| row[i])
                .collect()
        })
        .collect()
}
