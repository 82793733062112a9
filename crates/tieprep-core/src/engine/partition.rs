use crate::core::models::residue::Residue;
use crate::core::models::structure::Structure;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Distance in Angstroms between consecutive alpha-carbons above which a new
/// chain starts.
pub const DEFAULT_CHAIN_BREAK_DISTANCE: f64 = 10.0;

/// Consecutive-residue distances above this are reported as suspect geometry.
const CONTACT_WARNING_DISTANCE: f64 = 4.0;

const ALPHA_CARBON: &str = "CA";
const CHAIN_NAMES: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Debug, Error, PartialEq)]
pub enum SplitError {
    #[error("Residue {index} has no '{atom}' atom to measure chain breaks from")]
    MissingAlphaCarbon { index: usize, atom: &'static str },
    #[error("Structure splits into more than {max} chains; chain names exhausted")]
    ChainNamesExhausted { max: usize },
}

/// A structure partitioned into distance-separated chains.
///
/// Chains are keyed by their assigned letter; [`ChainPartition::all`] is the
/// combined structure holding every residue in original order, with each
/// residue carrying its assigned chain letter.
#[derive(Debug, Clone, Default)]
pub struct ChainPartition {
    chains: BTreeMap<char, Structure>,
    all: Structure,
}

impl ChainPartition {
    pub fn chain(&self, id: char) -> Option<&Structure> {
        self.chains.get(&id)
    }

    /// Iterates over the chains in discovery order (letters are assigned
    /// sequentially, so key order and discovery order coincide).
    pub fn chains(&self) -> impl Iterator<Item = (char, &Structure)> {
        self.chains.iter().map(|(&id, chain)| (id, chain))
    }

    pub fn num_chains(&self) -> usize {
        self.chains.len()
    }

    /// The combined structure with every residue in original order.
    pub fn all(&self) -> &Structure {
        &self.all
    }
}

// Accumulator state threaded through the walk: the next chain letter to
// assign, the residues of the currently open chain, and the combined result.
#[derive(Debug, Default)]
struct SplitState {
    next_chain: usize,
    current: Vec<Residue>,
    chains: BTreeMap<char, Structure>,
    all: Structure,
}

impl SplitState {
    fn close_chain(&mut self) -> Result<(), SplitError> {
        let letter = CHAIN_NAMES
            .as_bytes()
            .get(self.next_chain)
            .map(|&b| b as char)
            .ok_or(SplitError::ChainNamesExhausted {
                max: CHAIN_NAMES.len(),
            })?;
        self.next_chain += 1;

        let mut chain = Structure::new();
        for mut residue in self.current.drain(..) {
            residue.chain = letter;
            self.all.append_residue(residue.clone());
            chain.append_residue(residue);
        }
        self.chains.insert(letter, chain);
        Ok(())
    }
}

/// Splits `structure` into chains wherever the distance between consecutive
/// alpha-carbons exceeds `distance_threshold` (strictly greater; a distance
/// exactly equal to the threshold does not split).
///
/// Chain letters are assigned `A..Z` strictly in discovery order; whatever
/// chain the input residues claim to belong to is ignored. The final residue
/// always joins the chain that is open when the walk ends, with no distance
/// test of its own.
pub fn split_by_residue_distance(
    structure: &Structure,
    distance_threshold: f64,
) -> Result<ChainPartition, SplitError> {
    let mut state = SplitState::default();
    let residues = structure.residues();

    for (i, residue) in residues.iter().enumerate() {
        state.current.push(residue.clone());

        if let Some(next) = residues.get(i + 1) {
            let ca1 = residue.atom_position(ALPHA_CARBON).ok_or(
                SplitError::MissingAlphaCarbon {
                    index: residue.index,
                    atom: ALPHA_CARBON,
                },
            )?;
            let ca2 = next
                .atom_position(ALPHA_CARBON)
                .ok_or(SplitError::MissingAlphaCarbon {
                    index: next.index,
                    atom: ALPHA_CARBON,
                })?;
            let distance = (ca2 - ca1).norm();

            if distance > CONTACT_WARNING_DISTANCE {
                warn!(
                    distance,
                    from = residue.index,
                    to = next.index,
                    "Consecutive residues are unusually far apart"
                );
            }
            if distance > distance_threshold {
                state.close_chain()?;
            }
        }
    }

    if !state.current.is_empty() {
        state.close_chain()?;
    }

    debug!(
        chains = state.chains.len(),
        residues = state.all.len(),
        "Split structure into chains"
    );

    Ok(ChainPartition {
        chains: state.chains,
        all: state.all,
    })
}
