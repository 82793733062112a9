//! # tieprep Core Library
//!
//! A library for turning protein structures ("poses") into the flat-file inputs
//! consumed by the ProteinMPNN sequence-design tool: parsed structure records,
//! tied-residue constraints across paired chains, and fixed-residue maps.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict three-layer architecture to ensure a clear
//! separation of concerns, making it modular, testable, and extensible.
//!
//! - **[`core`]: The Foundation.** Contains stateless data models (`Structure`,
//!   `Residue`, `Atom`), structure-file parsing, JSON-lines helpers, and residue
//!   identifier tables.
//!
//! - **[`engine`]: The Logic Core.** The transforming layer: the distance-based
//!   chain partitioner, the pose-to-record converter, the tied/fixed residue-set
//!   builder, the accumulating record store, and the external run-command builder.
//!
//! - **[`workflows`]: The Public API.** This is the highest-level, user-facing layer.
//!   It ties the `engine` and `core` together to prepare complete design inputs,
//!   providing a simple entry point for end-users of the library.

pub mod core;
pub mod engine;
pub mod workflows;
