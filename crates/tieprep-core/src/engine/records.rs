use crate::core::models::structure::Structure;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Backbone atoms recorded for each residue, in output order.
pub const DEFAULT_RECORD_ATOMS: [&str; 4] = ["N", "CA", "C", "O"];

#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("Residue {index} ({name}) in chain {chain} is missing requested atom '{atom}'")]
    MissingAtom {
        index: usize,
        name: String,
        chain: char,
        atom: String,
    },
}

/// Per-chain coordinate lists, keyed `<atom>_chain_<X>`, one `[x, y, z]`
/// triple per residue in chain order.
pub type ChainCoords = BTreeMap<String, Vec<[f64; 3]>>;

/// One design structure in the flat shape the sequence-design tool ingests
/// from its `parsed_pdbs.jsonl` file.
///
/// The flattened maps contribute the dynamic `seq_chain_<X>` and
/// `coords_chain_<X>` keys. The record is write-only; loading a store back
/// from disk only ever reads the `name` field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedRecord {
    pub name: String,
    pub num_of_chains: usize,
    /// The full one-letter sequence of all chains, in original residue order.
    pub seq: String,
    #[serde(flatten)]
    pub chain_sequences: BTreeMap<String, String>,
    #[serde(flatten)]
    pub chain_coords: BTreeMap<String, ChainCoords>,
}

/// Converts a chain-labeled structure into a [`ParsedRecord`].
///
/// Residues are visited in source order; each requested atom's coordinates
/// are appended to that chain's `<atom>_chain_<X>` list. A residue missing a
/// requested atom fails the whole conversion; no partial record is emitted.
pub fn make_design_record(
    name: &str,
    structure: &Structure,
    atoms: &[&str],
) -> Result<ParsedRecord, RecordError> {
    let mut chain_sequences: BTreeMap<String, String> = BTreeMap::new();
    let mut chain_coords: BTreeMap<String, ChainCoords> = BTreeMap::new();

    for residue in structure.iter() {
        chain_sequences
            .entry(format!("seq_chain_{}", residue.chain))
            .or_default()
            .push(residue.code);

        let coords = chain_coords
            .entry(format!("coords_chain_{}", residue.chain))
            .or_default();
        for &atom_name in atoms {
            let atom = residue
                .atom(atom_name)
                .ok_or_else(|| RecordError::MissingAtom {
                    index: residue.index,
                    name: residue.name.clone(),
                    chain: residue.chain,
                    atom: atom_name.to_string(),
                })?;
            let position = atom.position;
            coords
                .entry(format!("{}_chain_{}", atom_name, residue.chain))
                .or_default()
                .push([position.x, position.y, position.z]);
        }
    }

    Ok(ParsedRecord {
        name: name.to_string(),
        num_of_chains: chain_sequences.len(),
        seq: structure.sequence(),
        chain_sequences,
        chain_coords,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use crate::core::models::residue::Residue;
    use nalgebra::Point3;

    fn backbone_residue(index: usize, code: char, chain: char, x: f64) -> Residue {
        let mut residue = Residue::from_one_letter(index, code, chain);
        residue.add_atom(Atom::new("N", Point3::new(x - 1.0, 0.0, 0.0)));
        residue.add_atom(Atom::new("CA", Point3::new(x, 0.0, 0.0)));
        residue.add_atom(Atom::new("C", Point3::new(x + 1.0, 0.0, 0.0)));
        residue.add_atom(Atom::new("O", Point3::new(x + 1.0, 1.0, 0.0)));
        residue
    }

    fn two_chain_structure() -> Structure {
        let mut structure = Structure::new();
        structure.append_residue(backbone_residue(1, 'G', 'A', 0.0));
        structure.append_residue(backbone_residue(2, 'A', 'A', 3.8));
        structure.append_residue(backbone_residue(3, 'V', 'B', 20.0));
        structure
    }

    #[test]
    fn record_collects_sequences_and_coordinates_per_chain() {
        let record =
            make_design_record("design1", &two_chain_structure(), &DEFAULT_RECORD_ATOMS).unwrap();

        assert_eq!(record.name, "design1");
        assert_eq!(record.num_of_chains, 2);
        assert_eq!(record.seq, "GAV");
        assert_eq!(record.chain_sequences["seq_chain_A"], "GA");
        assert_eq!(record.chain_sequences["seq_chain_B"], "V");

        let coords_a = &record.chain_coords["coords_chain_A"];
        assert_eq!(coords_a["CA_chain_A"], vec![[0.0, 0.0, 0.0], [3.8, 0.0, 0.0]]);
        assert_eq!(coords_a["N_chain_A"].len(), 2);
        assert_eq!(coords_a["O_chain_A"][1], [4.8, 1.0, 0.0]);

        let coords_b = &record.chain_coords["coords_chain_B"];
        assert_eq!(coords_b["CA_chain_B"], vec![[20.0, 0.0, 0.0]]);
    }

    #[test]
    fn full_sequence_matches_concatenated_chain_sequences() {
        let record =
            make_design_record("design1", &two_chain_structure(), &DEFAULT_RECORD_ATOMS).unwrap();
        let concatenated: String = record.chain_sequences.values().cloned().collect();
        assert_eq!(record.seq, concatenated);
    }

    #[test]
    fn missing_requested_atom_fails_the_conversion() {
        let mut structure = two_chain_structure();
        let mut bare = Residue::from_one_letter(4, 'L', 'B');
        bare.add_atom(Atom::new("CA", Point3::new(24.0, 0.0, 0.0)));
        structure.append_residue(bare);

        let err = make_design_record("design1", &structure, &DEFAULT_RECORD_ATOMS).unwrap_err();
        assert_eq!(
            err,
            RecordError::MissingAtom {
                index: 4,
                name: "LEU".to_string(),
                chain: 'B',
                atom: "N".to_string(),
            }
        );
    }

    #[test]
    fn record_serializes_with_flattened_chain_keys() {
        let record =
            make_design_record("design1", &two_chain_structure(), &DEFAULT_RECORD_ATOMS).unwrap();
        let value = serde_json::to_value(&record).unwrap();

        assert_eq!(value["name"], "design1");
        assert_eq!(value["num_of_chains"], 2);
        assert_eq!(value["seq"], "GAV");
        assert_eq!(value["seq_chain_A"], "GA");
        assert_eq!(value["coords_chain_B"]["CA_chain_B"][0][0], 20.0);
    }
}
