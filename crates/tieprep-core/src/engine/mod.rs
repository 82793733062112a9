//! # Engine Module
//!
//! This module implements the transforming layer of the library: it takes
//! read-only structures from [`crate::core`] and turns them into the record
//! shapes the external sequence-design tool expects.
//!
//! ## Architecture
//!
//! - **Chain Partitioning** ([`partition`]) - Splits a structure into chains by
//!   consecutive alpha-carbon distance and assigns chain letters.
//! - **Record Conversion** ([`records`]) - Flattens a chain-labeled structure
//!   into a parsed design record (sequences and per-chain coordinates).
//! - **Residue Tying** ([`tying`]) - Builds tied-residue constraints across
//!   paired chains, with pairing rules loadable from CSV.
//! - **Record Store** ([`store`]) - Accumulates design records and persists
//!   them to the three JSON-lines files.
//! - **Run Command** ([`command`]) - Builds the shell command line that runs
//!   the external tool against a prepared store.

pub mod command;
pub mod partition;
pub mod records;
pub mod store;
pub mod tying;
