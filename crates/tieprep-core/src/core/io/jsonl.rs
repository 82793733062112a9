use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonlError {
    #[error("File I/O error for '{path}': {source}", path = path.display())]
    Io { path: PathBuf, source: io::Error },
    #[error("Invalid JSON on line {line} of '{path}': {source}", path = path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },
    #[error("Failed to serialize records for '{path}': {source}", path = path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Loads a JSON-lines file where every non-blank line is a JSON object, and
/// merges all lines into a single map. A missing file is an empty map, not
/// an error.
pub fn load_merged_records<T: DeserializeOwned>(
    path: &Path,
) -> Result<BTreeMap<String, T>, JsonlError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
        Err(e) => {
            return Err(JsonlError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let mut merged = BTreeMap::new();
    for (line_num, line_res) in BufReader::new(file).lines().enumerate() {
        let line = line_res.map_err(|e| JsonlError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let records: BTreeMap<String, T> =
            serde_json::from_str(&line).map_err(|e| JsonlError::Parse {
                path: path.to_path_buf(),
                line: line_num + 1,
                source: e,
            })?;
        merged.extend(records);
    }
    Ok(merged)
}

/// Loads a JSON-lines file where every non-blank line is one record.
/// A missing file is an empty list.
pub fn load_record_lines<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, JsonlError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(JsonlError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    let mut records = Vec::new();
    for (line_num, line_res) in BufReader::new(file).lines().enumerate() {
        let line = line_res.map_err(|e| JsonlError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record: T = serde_json::from_str(&line).map_err(|e| JsonlError::Parse {
            path: path.to_path_buf(),
            line: line_num + 1,
            source: e,
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Rewrites `path` with the full map as a single JSON line, replacing any
/// previous content.
pub fn write_single_line<T: Serialize>(
    path: &Path,
    records: &BTreeMap<String, T>,
) -> Result<(), JsonlError> {
    let json = serde_json::to_string(records).map_err(|e| JsonlError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;
    let mut file = File::create(path).map_err(|e| JsonlError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    writeln!(file, "{}", json).map_err(|e| JsonlError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Appends each record to `path` as its own JSON line.
pub fn append_records<'a, T: Serialize + 'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a T>,
) -> Result<(), JsonlError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| JsonlError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

    for record in records {
        let json = serde_json::to_string(record).map_err(|e| JsonlError::Serialize {
            path: path.to_path_buf(),
            source: e,
        })?;
        writeln!(file, "{}", json).map_err(|e| JsonlError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_as_empty_collections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.jsonl");

        let merged: BTreeMap<String, usize> = load_merged_records(&path).unwrap();
        assert!(merged.is_empty());

        let lines: Vec<usize> = load_record_lines(&path).unwrap();
        assert!(lines.is_empty());
    }

    #[test]
    fn merges_all_lines_and_skips_blank_ones() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        fs::write(&path, "{\"a\": 1, \"b\": 2}\n\n   \n{\"c\": 3}\n").unwrap();

        let merged: BTreeMap<String, usize> = load_merged_records(&path).unwrap();
        assert_eq!(merged.len(), 3);
        assert_eq!(merged["a"], 1);
        assert_eq!(merged["c"], 3);
    }

    #[test]
    fn invalid_json_reports_line_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("records.jsonl");
        fs::write(&path, "{\"a\": 1}\nnot json\n").unwrap();

        let err = load_merged_records::<usize>(&path).unwrap_err();
        assert!(matches!(err, JsonlError::Parse { line: 2, .. }));
    }

    #[test]
    fn write_single_line_overwrites_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("map.jsonl");

        let mut records = BTreeMap::new();
        records.insert("a".to_string(), 1);
        write_single_line(&path, &records).unwrap();

        records.insert("b".to_string(), 2);
        write_single_line(&path, &records).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 1);

        let reloaded: BTreeMap<String, usize> = load_merged_records(&path).unwrap();
        assert_eq!(reloaded, records);
    }

    #[test]
    fn append_records_adds_one_line_per_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("lines.jsonl");

        append_records(&path, &[1, 2]).unwrap();
        append_records(&path, &[3]).unwrap();

        let reloaded: Vec<usize> = load_record_lines(&path).unwrap();
        assert_eq!(reloaded, vec![1, 2, 3]);
    }
}
