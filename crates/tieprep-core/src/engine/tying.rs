use crate::core::models::structure::Structure;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Weight applied to a pairing when none is given.
pub const DEFAULT_TIE_WEIGHT: f64 = 1.0;

/// A rule tying two equal-length chains together during sequence design.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainPairing {
    pub first: char,
    pub second: char,
    pub weight: f64,
}

impl ChainPairing {
    pub fn new(first: char, second: char) -> Self {
        Self {
            first,
            second,
            weight: DEFAULT_TIE_WEIGHT,
        }
    }

    pub fn with_weight(first: char, second: char, weight: f64) -> Self {
        Self {
            first,
            second,
            weight,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PairingRow {
    chain_1: String,
    chain_2: String,
    #[serde(default)]
    weight: Option<f64>,
}

#[derive(Debug, Error)]
pub enum PairingLoadError {
    #[error("CSV parsing error for '{path}': {source}", path = path.display())]
    Csv { path: PathBuf, source: csv::Error },
    #[error("Invalid chain name '{value}' in '{path}': chain names are single letters", path = path.display())]
    InvalidChainName { path: PathBuf, value: String },
}

/// Loads pairing rules from a CSV file with header `chain_1,chain_2,weight`.
/// The weight column may be omitted or left blank per row; it defaults to 1.0.
pub fn load_pairing_rules(path: &Path) -> Result<Vec<ChainPairing>, PairingLoadError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| PairingLoadError::Csv {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut rules = Vec::new();
    for result in reader.deserialize::<PairingRow>() {
        let row = result.map_err(|e| PairingLoadError::Csv {
            path: path.to_path_buf(),
            source: e,
        })?;
        let first = single_letter(&row.chain_1).ok_or_else(|| PairingLoadError::InvalidChainName {
            path: path.to_path_buf(),
            value: row.chain_1.clone(),
        })?;
        let second =
            single_letter(&row.chain_2).ok_or_else(|| PairingLoadError::InvalidChainName {
                path: path.to_path_buf(),
                value: row.chain_2.clone(),
            })?;
        rules.push(ChainPairing::with_weight(
            first,
            second,
            row.weight.unwrap_or(DEFAULT_TIE_WEIGHT),
        ));
    }
    Ok(rules)
}

fn single_letter(value: &str) -> Option<char> {
    let mut chars = value.trim().chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_uppercase()),
        _ => None,
    }
}

/// Positions and weights for one chain's side of a tied-residue record.
/// Serializes as `[[positions], [weights]]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiedPosition(pub Vec<usize>, pub Vec<f64>);

/// One tied-residue correspondence: chain name to positions and weights.
pub type TiedResidueRecord = BTreeMap<String, TiedPosition>;

/// Chain name to 1-based chain-local residue offsets held fixed.
pub type FixedResidueMap = BTreeMap<String, Vec<usize>>;

/// The tied and fixed residue sets built for one design.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TiedFixedSets {
    pub tied_residues_by_chain: Vec<TiedResidueRecord>,
    pub fixed_residues_by_chain: FixedResidueMap,
}

#[derive(Debug, Error, PartialEq)]
pub enum TyingError {
    #[error("Invalid chain names: {first}, {second}")]
    UnknownChains { first: char, second: char },
    #[error("Chains {first} ({first_len}) and {second} ({second_len}) must have the same length")]
    LengthMismatch {
        first: char,
        first_len: usize,
        second: char,
        second_len: usize,
    },
}

/// Builds the tied-residue records (and the fixed-residue map) for a combined
/// multi-chain structure, typically the `all` result of the chain partitioner.
///
/// Chain lengths and 1-based start indices come from a single forward scan
/// over the combined structure. For every pairing rule and every offset
/// `1..=len`, one record ties offset `i` of both chains at the rule's weight.
/// Records keep rule order with offsets ascending within a rule; rules that
/// reference overlapping chains are simply concatenated, with no dedup or
/// cross-rule consistency check.
pub fn create_tied_and_fixed_residue_sets(
    combined: &Structure,
    designed_residues: &[usize],
    pairings: &[ChainPairing],
) -> Result<TiedFixedSets, TyingError> {
    let mut chain_lengths: BTreeMap<char, usize> = BTreeMap::new();
    let mut chain_starts: BTreeMap<char, usize> = BTreeMap::new();

    for (i, residue) in combined.iter().enumerate() {
        chain_starts.entry(residue.chain).or_insert(i + 1);
        *chain_lengths.entry(residue.chain).or_insert(0) += 1;
    }

    debug!(?chain_lengths, ?chain_starts, "Scanned combined structure");

    let mut tied_residues_by_chain = Vec::new();
    for pairing in pairings {
        let (Some(&first_len), Some(&second_len)) = (
            chain_lengths.get(&pairing.first),
            chain_lengths.get(&pairing.second),
        ) else {
            return Err(TyingError::UnknownChains {
                first: pairing.first,
                second: pairing.second,
            });
        };

        if first_len != second_len {
            return Err(TyingError::LengthMismatch {
                first: pairing.first,
                first_len,
                second: pairing.second,
                second_len,
            });
        }

        for i in 1..=first_len {
            let mut record = TiedResidueRecord::new();
            record.insert(
                pairing.first.to_string(),
                TiedPosition(vec![i], vec![pairing.weight]),
            );
            record.insert(
                pairing.second.to_string(),
                TiedPosition(vec![i], vec![pairing.weight]),
            );
            tied_residues_by_chain.push(record);
        }
    }

    // Fixed-residue selection (skip designed residues, keep only chains named
    // by some pairing, translate to chain-local offsets) is disabled: the
    // last implementation produced wrong offsets and nothing downstream
    // consumes fixed positions yet. The designed-residue set is still built
    // so the call shape survives a future re-enable.
    let _designed_residue_set: HashSet<usize> = designed_residues.iter().copied().collect();
    let fixed_residues_by_chain = FixedResidueMap::new();

    Ok(TiedFixedSets {
        tied_residues_by_chain,
        fixed_residues_by_chain,
    })
}
