//! Data structures for representing protein structures.
//!
//! A [`structure::Structure`] is an ordered sequence of [`residue::Residue`]s,
//! each of which owns its [`atom::Atom`]s and carries a 1-based position, a
//! one-letter identity code, and a chain letter. Structures are read from
//! source files once and treated as read-only afterwards; chain letters are
//! (re)assigned by the partitioner in the `engine` layer.

pub mod atom;
pub mod residue;
pub mod structure;
