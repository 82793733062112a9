use crate::core::io::jsonl::{self, JsonlError};
use crate::engine::records::ParsedRecord;
use crate::engine::tying::{FixedResidueMap, TiedResidueRecord};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const PARSED_RECORDS_FILE: &str = "parsed_pdbs.jsonl";
pub const TIED_RECORDS_FILE: &str = "tied_pdbs.jsonl";
pub const FIXED_RECORDS_FILE: &str = "fixed_pdbs.jsonl";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Design '{0}' already exists in records")]
    DuplicateDesign(String),
    #[error(transparent)]
    Jsonl(#[from] JsonlError),
    #[error("File I/O error for '{path}': {source}", path = path.display())]
    Io { path: PathBuf, source: io::Error },
}

// Only the design name is read back from parsed records; the rest of the
// record never needs deserializing.
#[derive(Debug, Deserialize)]
struct RecordName {
    name: String,
}

/// Accumulates design records and persists them to the three JSON-lines
/// files the sequence-design tool expects: `parsed_pdbs.jsonl` (append-only,
/// one record per line), `tied_pdbs.jsonl` and `fixed_pdbs.jsonl` (one line
/// each holding the full design-name map, rewritten on every flush).
///
/// Opening a directory that already holds these files loads the existing
/// records, and new designs accumulate on top of them. The store assumes
/// exclusive single-process access to its directory.
#[derive(Debug)]
pub struct RecordStore {
    dir: PathBuf,
    tied_records: BTreeMap<String, Vec<TiedResidueRecord>>,
    fixed_records: BTreeMap<String, FixedResidueMap>,
    known_names: HashSet<String>,
    staged_parsed: Vec<ParsedRecord>,
}

impl RecordStore {
    /// Opens a store at `dir`, creating the directory when missing and
    /// loading any existing record files otherwise.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        let existed = dir.exists();

        if !existed {
            fs::create_dir_all(&dir).map_err(|e| StoreError::Io {
                path: dir.clone(),
                source: e,
            })?;
        }

        let mut store = Self {
            dir,
            tied_records: BTreeMap::new(),
            fixed_records: BTreeMap::new(),
            known_names: HashSet::new(),
            staged_parsed: Vec::new(),
        };
        if existed {
            store.load_existing_records()?;
        }
        Ok(store)
    }

    pub fn directory(&self) -> &Path {
        &self.dir
    }

    pub fn tied_records_path(&self) -> PathBuf {
        self.dir.join(TIED_RECORDS_FILE)
    }

    pub fn fixed_records_path(&self) -> PathBuf {
        self.dir.join(FIXED_RECORDS_FILE)
    }

    pub fn parsed_records_path(&self) -> PathBuf {
        self.dir.join(PARSED_RECORDS_FILE)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.known_names.contains(name)
    }

    /// Number of known designs, loaded and staged alike.
    pub fn len(&self) -> usize {
        self.known_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known_names.is_empty()
    }

    pub fn tied_records(&self) -> &BTreeMap<String, Vec<TiedResidueRecord>> {
        &self.tied_records
    }

    pub fn fixed_records(&self) -> &BTreeMap<String, FixedResidueMap> {
        &self.fixed_records
    }

    fn load_existing_records(&mut self) -> Result<(), StoreError> {
        self.tied_records = jsonl::load_merged_records(&self.tied_records_path())?;
        self.fixed_records = jsonl::load_merged_records(&self.fixed_records_path())?;

        let names: Vec<RecordName> = jsonl::load_record_lines(&self.parsed_records_path())?;
        self.known_names = names.into_iter().map(|record| record.name).collect();

        debug!(designs = self.known_names.len(), "Loaded existing records");
        Ok(())
    }

    /// Stages one design's records in memory.
    ///
    /// Fails without mutating the store when `name` was already loaded from
    /// disk or added during this session.
    pub fn add(
        &mut self,
        name: &str,
        parsed: ParsedRecord,
        tied: Vec<TiedResidueRecord>,
        fixed: FixedResidueMap,
    ) -> Result<(), StoreError> {
        if self.known_names.contains(name) {
            return Err(StoreError::DuplicateDesign(name.to_string()));
        }

        self.tied_records.insert(name.to_string(), tied);
        self.fixed_records.insert(name.to_string(), fixed);
        self.staged_parsed.push(parsed);
        self.known_names.insert(name.to_string());
        Ok(())
    }

    /// Persists the store: rewrites the tied and fixed maps wholesale as
    /// single JSON lines, then appends the newly staged parsed records. The
    /// staging buffer is cleared once the write succeeds, so repeated flushes
    /// never append a record twice.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        jsonl::write_single_line(&self.tied_records_path(), &self.tied_records)?;
        jsonl::write_single_line(&self.fixed_records_path(), &self.fixed_records)?;
        jsonl::append_records(&self.parsed_records_path(), self.staged_parsed.iter())?;
        self.staged_parsed.clear();

        info!(
            designs = self.known_names.len(),
            dir = %self.dir.display(),
            "Flushed record store"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::tying::TiedPosition;
    use std::fs;
    use tempfile::tempdir;

    fn parsed_record(name: &str) -> ParsedRecord {
        ParsedRecord {
            name: name.to_string(),
            num_of_chains: 1,
            seq: "G".to_string(),
            chain_sequences: BTreeMap::from([("seq_chain_A".to_string(), "G".to_string())]),
            chain_coords: BTreeMap::new(),
        }
    }

    fn tied_records(weight: f64) -> Vec<TiedResidueRecord> {
        vec![BTreeMap::from([
            ("A".to_string(), TiedPosition(vec![1], vec![weight])),
            ("B".to_string(), TiedPosition(vec![1], vec![weight])),
        ])]
    }

    #[test]
    fn open_creates_missing_directory() {
        let dir = tempdir().unwrap();
        let store_dir = dir.path().join("records");

        let store = RecordStore::open(&store_dir).unwrap();
        assert!(store_dir.is_dir());
        assert!(store.is_empty());
    }

    #[test]
    fn add_rejects_duplicate_design_names_in_session() {
        let dir = tempdir().unwrap();
        let mut store = RecordStore::open(dir.path().join("records")).unwrap();

        store
            .add("D1", parsed_record("D1"), tied_records(1.0), FixedResidueMap::new())
            .unwrap();
        let err = store
            .add("D1", parsed_record("D1"), tied_records(1.0), FixedResidueMap::new())
            .unwrap_err();

        assert!(matches!(err, StoreError::DuplicateDesign(name) if name == "D1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn flush_and_reopen_round_trips_records() {
        let dir = tempdir().unwrap();
        let store_dir = dir.path().join("records");

        let mut store = RecordStore::open(&store_dir).unwrap();
        store
            .add("D1", parsed_record("D1"), tied_records(0.5), FixedResidueMap::new())
            .unwrap();
        store.flush().unwrap();

        let reopened = RecordStore::open(&store_dir).unwrap();
        assert!(reopened.contains("D1"));
        assert_eq!(reopened.tied_records()["D1"], tied_records(0.5));
        assert_eq!(reopened.fixed_records()["D1"], FixedResidueMap::new());

        let mut reopened = reopened;
        let err = reopened
            .add("D1", parsed_record("D1"), tied_records(0.5), FixedResidueMap::new())
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateDesign(_)));
    }

    #[test]
    fn repeated_flush_appends_each_parsed_record_once() {
        let dir = tempdir().unwrap();
        let store_dir = dir.path().join("records");

        let mut store = RecordStore::open(&store_dir).unwrap();
        store
            .add("D1", parsed_record("D1"), Vec::new(), FixedResidueMap::new())
            .unwrap();
        store.flush().unwrap();
        store.flush().unwrap();

        store
            .add("D2", parsed_record("D2"), Vec::new(), FixedResidueMap::new())
            .unwrap();
        store.flush().unwrap();

        let content = fs::read_to_string(store.parsed_records_path()).unwrap();
        let names: Vec<&str> = content.lines().collect();
        assert_eq!(names.len(), 2);
        assert!(names[0].contains("\"name\":\"D1\""));
        assert!(names[1].contains("\"name\":\"D2\""));
    }

    #[test]
    fn tied_and_fixed_files_hold_one_line_with_the_full_map() {
        let dir = tempdir().unwrap();
        let store_dir = dir.path().join("records");

        let mut store = RecordStore::open(&store_dir).unwrap();
        store
            .add("D1", parsed_record("D1"), tied_records(1.0), FixedResidueMap::new())
            .unwrap();
        store.flush().unwrap();
        store
            .add("D2", parsed_record("D2"), tied_records(1.0), FixedResidueMap::new())
            .unwrap();
        store.flush().unwrap();

        let tied = fs::read_to_string(store.tied_records_path()).unwrap();
        assert_eq!(tied.lines().count(), 1);
        assert!(tied.contains("\"D1\""));
        assert!(tied.contains("\"D2\""));

        let fixed = fs::read_to_string(store.fixed_records_path()).unwrap();
        assert_eq!(fixed.lines().count(), 1);
        assert!(fixed.contains("\"D2\":{}"));
    }

    #[test]
    fn load_tolerates_blank_lines_in_existing_files() {
        let dir = tempdir().unwrap();
        let store_dir = dir.path().join("records");
        fs::create_dir_all(&store_dir).unwrap();
        fs::write(store_dir.join(TIED_RECORDS_FILE), "\n{\"D1\": []}\n\n").unwrap();
        fs::write(
            store_dir.join(PARSED_RECORDS_FILE),
            "\n{\"name\": \"D1\", \"num_of_chains\": 1, \"seq\": \"G\"}\n",
        )
        .unwrap();

        let store = RecordStore::open(&store_dir).unwrap();
        assert!(store.contains("D1"));
        assert_eq!(store.tied_records()["D1"], Vec::new());
    }
}
