//! Provides input/output functionality for structure and record files.
//!
//! This module contains the PDB reader that turns coordinate files into
//! [`Structure`](crate::core::models::structure::Structure)s, a trait-based
//! interface for structure-file parsing, and helpers for the JSON-lines
//! record files the sequence-design tool consumes.

pub mod jsonl;
pub mod pdb;
pub mod traits;
