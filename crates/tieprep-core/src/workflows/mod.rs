//! # Workflows Module
//!
//! High-level entry points that orchestrate the full input-preparation
//! pipeline for one design: chain partitioning, record conversion,
//! tied/fixed residue-set construction, and staging into the record store.
//!
//! - **Prepare Workflow** ([`prepare`]) - Complete preparation of one
//!   design's records from a raw structure.

pub mod prepare;
