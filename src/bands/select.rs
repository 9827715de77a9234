use std::collections::BTreeMap;

use crate::language::{is_dedicated_source, Bin};

/// How many individual sources get their own band in correlated mode.
pub const SELECTED_LIMIT: usize = 4;

/// A source and its summed squared fractional magnitude over all bins.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedSource {
    pub name: String,
    pub score: f64,
}

/// Sources with their own band, least significant first, and the ones that
/// get merged into the remainder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub selected: Vec<String>,
    pub other: Vec<String>,
}

/// Rank every source other than the dedicated ones by Σ (value / xsec)²,
/// most significant first. Bins lacking a source don't contribute to it.
/// Equal scores are ordered by name.
pub fn rank(bins: &[Bin]) -> Vec<RankedSource> {
    let mut scores: BTreeMap<&str, f64> = BTreeMap::new();

    for bin in bins {
        for (name, value) in &bin.sources {
            if is_dedicated_source(name) {
                continue;
            }
            let fraction = value / bin.xsec;
            *scores
                .entry(name.as_str())
                .or_insert(0.0) += fraction * fraction;
        }
    }

    let mut ranked: Vec<RankedSource> = scores
        .into_iter()
        .map(|(name, score)| RankedSource {
            name: name.to_string(),
            score,
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| {
                a.name
                    .cmp(&b.name)
            })
    });

    ranked
}

pub fn select(bins: &[Bin]) -> Selection {
    let ranked = rank(bins);
    let n = ranked
        .len()
        .min(SELECTED_LIMIT);

    // the most significant goes last so that it is stacked outermost
    let selected = ranked[..n]
        .iter()
        .rev()
        .map(|source| {
            source
                .name
                .clone()
        })
        .collect();

    let other = ranked[n..]
        .iter()
        .map(|source| {
            source
                .name
                .clone()
        })
        .collect();

    Selection { selected, other }
}
