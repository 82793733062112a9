use crate::core::models::structure::Structure;
use crate::engine::partition::{self, SplitError};
use crate::engine::records::{self, DEFAULT_RECORD_ATOMS, RecordError};
use crate::engine::store::{RecordStore, StoreError};
use crate::engine::tying::{self, ChainPairing, TyingError};
use thiserror::Error;
use tracing::{info, instrument};

#[derive(Debug, Error)]
pub enum PrepareError {
    #[error("Chain splitting failed: {0}")]
    Split(#[from] SplitError),
    #[error("Record conversion failed: {0}")]
    Record(#[from] RecordError),
    #[error("Tied-residue construction failed: {0}")]
    Tying(#[from] TyingError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Knobs for preparing one design.
#[derive(Debug, Clone)]
pub struct PrepareOptions {
    /// Distance in Angstroms between consecutive alpha-carbons that starts a
    /// new chain.
    pub chain_break_distance: f64,
    /// Atoms recorded per residue.
    pub record_atoms: Vec<String>,
}

impl Default for PrepareOptions {
    fn default() -> Self {
        Self {
            chain_break_distance: partition::DEFAULT_CHAIN_BREAK_DISTANCE,
            record_atoms: DEFAULT_RECORD_ATOMS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Summary of one prepared design.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDesign {
    pub name: String,
    pub num_chains: usize,
    pub num_residues: usize,
    pub tied_records: usize,
    /// Per-chain one-letter sequences, in chain order.
    pub chain_sequences: Vec<(char, String)>,
}

/// Prepares one design: splits the structure into chains, converts it to a
/// parsed record, builds the tied/fixed residue sets, and stages everything
/// in the store.
///
/// The store is not flushed here; callers decide when to persist. A design
/// name the store already knows fails before any work is done.
#[instrument(skip_all, name = "prepare_design", fields(design = name))]
pub fn run(
    name: &str,
    structure: &Structure,
    designed_residues: &[usize],
    pairings: &[ChainPairing],
    options: &PrepareOptions,
    store: &mut RecordStore,
) -> Result<PreparedDesign, PrepareError> {
    if store.contains(name) {
        return Err(StoreError::DuplicateDesign(name.to_string()).into());
    }

    let chains = partition::split_by_residue_distance(structure, options.chain_break_distance)?;
    info!(
        chains = chains.num_chains(),
        residues = chains.all().len(),
        "Partitioned structure into chains"
    );

    let atom_names: Vec<&str> = options.record_atoms.iter().map(String::as_str).collect();
    let record = records::make_design_record(name, chains.all(), &atom_names)?;

    let sets = tying::create_tied_and_fixed_residue_sets(chains.all(), designed_residues, pairings)?;
    info!(
        tied = sets.tied_residues_by_chain.len(),
        "Built tied-residue records"
    );

    let summary = PreparedDesign {
        name: name.to_string(),
        num_chains: chains.num_chains(),
        num_residues: chains.all().len(),
        tied_records: sets.tied_residues_by_chain.len(),
        chain_sequences: chains
            .chains()
            .map(|(id, chain)| (id, chain.sequence()))
            .collect(),
    };

    store.add(
        name,
        record,
        sets.tied_residues_by_chain,
        sets.fixed_residues_by_chain,
    )?;

    Ok(summary)
}
