use super::atom::Atom;
use crate::core::utils::identifiers;
use nalgebra::Point3;
use std::collections::HashMap;

const UNKNOWN_ONE_LETTER_CODE: char = 'X';
const UNKNOWN_RESIDUE_NAME: &str = "UNK";

/// A single residue read from a source structure.
///
/// Residues are immutable once read, except for the chain letter, which the
/// chain partitioner reassigns when it splits a structure.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    /// 1-based position of the residue in the source structure.
    pub index: usize,
    /// Three-letter residue name (e.g., "ALA", "GLY").
    pub name: String,
    /// One-letter identity code (e.g., 'A', 'G'); 'X' for unknown names.
    pub code: char,
    /// Chain letter this residue belongs to.
    pub chain: char,
    atoms: Vec<Atom>,
    atom_name_map: HashMap<String, usize>, // Map from atom name to index in `atoms`
}

impl Residue {
    pub fn new(index: usize, name: &str, chain: char) -> Self {
        Self {
            index,
            name: name.to_string(),
            code: identifiers::one_letter_code(name).unwrap_or(UNKNOWN_ONE_LETTER_CODE),
            chain,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    /// Builds a residue from a one-letter code, for structures whose source
    /// only carries sequence identity.
    pub fn from_one_letter(index: usize, code: char, chain: char) -> Self {
        let name = identifiers::three_letter_name(code).unwrap_or(UNKNOWN_RESIDUE_NAME);
        Self {
            index,
            name: name.to_string(),
            code,
            chain,
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    /// Adds an atom to the residue. The first atom seen under a given name
    /// wins; later duplicates (e.g., alternate locations) are ignored.
    pub fn add_atom(&mut self, atom: Atom) {
        if self.atom_name_map.contains_key(&atom.name) {
            return;
        }
        self.atom_name_map.insert(atom.name.clone(), self.atoms.len());
        self.atoms.push(atom);
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atom_name_map.get(name).map(|&i| &self.atoms[i])
    }

    pub fn atom_position(&self, name: &str) -> Option<Point3<f64>> {
        self.atom(name).map(|atom| atom.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_residue_derives_one_letter_code() {
        let residue = Residue::new(1, "GLY", 'A');
        assert_eq!(residue.index, 1);
        assert_eq!(residue.name, "GLY");
        assert_eq!(residue.code, 'G');
        assert_eq!(residue.chain, 'A');
        assert!(residue.atoms().is_empty());
    }

    #[test]
    fn new_residue_with_unknown_name_gets_placeholder_code() {
        let residue = Residue::new(5, "LIG", 'B');
        assert_eq!(residue.code, 'X');
    }

    #[test]
    fn from_one_letter_derives_three_letter_name() {
        let residue = Residue::from_one_letter(3, 'W', 'A');
        assert_eq!(residue.name, "TRP");
        assert_eq!(residue.code, 'W');
    }

    #[test]
    fn from_one_letter_with_unknown_code_gets_placeholder_name() {
        let residue = Residue::from_one_letter(3, 'Z', 'A');
        assert_eq!(residue.name, "UNK");
    }

    #[test]
    fn add_atom_maps_name_to_atom() {
        let mut residue = Residue::new(1, "ALA", 'A');
        residue.add_atom(Atom::new("CA", Point3::new(1.0, 0.0, 0.0)));
        residue.add_atom(Atom::new("CB", Point3::new(2.0, 0.0, 0.0)));

        assert_eq!(residue.atoms().len(), 2);
        assert_eq!(residue.atom("CA").unwrap().position.x, 1.0);
        assert_eq!(residue.atom_position("CB"), Some(Point3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn add_atom_keeps_first_occurrence_of_duplicate_name() {
        let mut residue = Residue::new(1, "SER", 'A');
        residue.add_atom(Atom::new("OG", Point3::new(1.0, 0.0, 0.0)));
        residue.add_atom(Atom::new("OG", Point3::new(9.0, 0.0, 0.0)));

        assert_eq!(residue.atoms().len(), 1);
        assert_eq!(residue.atom("OG").unwrap().position.x, 1.0);
    }

    #[test]
    fn atom_lookup_returns_none_for_unknown_name() {
        let mut residue = Residue::new(1, "LEU", 'A');
        residue.add_atom(Atom::new("CD1", Point3::origin()));
        assert!(residue.atom("CD2").is_none());
        assert!(residue.atom_position("CD2").is_none());
    }
}
