use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::residue::Residue;
use crate::core::models::structure::Structure;
use nalgebra::Point3;
use std::io::{self, BufRead};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for an ATOM record (must be at least 54 chars)")]
    LineTooShort,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

/// Reader for PDB coordinate files.
///
/// Only `ATOM` records of the first model are consumed: polymer residues are
/// what the downstream partitioner and record converter work on, so `HETATM`
/// entries (ligands, waters) are skipped. Atoms are grouped into residues on
/// every change of the (chain identifier, residue sequence number) pair, and
/// residues are numbered 1..N in file order. Alternate locations keep the
/// first occurrence of each atom name.
pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error> {
        let mut structure = Structure::new();
        let mut open_residue: Option<Residue> = None;
        let mut current_key: Option<(char, isize)> = None;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let record_type = slice_and_trim(&line, 0, 6);
            match record_type {
                "ATOM" => {
                    if line.len() < 54 {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::LineTooShort,
                        });
                    }

                    let name_str = slice_and_trim(&line, 12, 16);
                    let res_name_str = slice_and_trim(&line, 17, 20);
                    let chain_id = slice_and_trim(&line, 21, 22).chars().next().unwrap_or('A');
                    let res_seq_str = slice_and_trim(&line, 22, 26);
                    let x_str = slice_and_trim(&line, 30, 38);
                    let y_str = slice_and_trim(&line, 38, 46);
                    let z_str = slice_and_trim(&line, 46, 54);

                    if name_str.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "13-16".into(),
                            },
                        });
                    }
                    if res_name_str.is_empty() {
                        return Err(PdbError::Parse {
                            line: line_num,
                            kind: PdbParseErrorKind::MissingRequiredField {
                                columns: "18-20".into(),
                            },
                        });
                    }
                    let res_seq: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidInt {
                            columns: "23-26".into(),
                            value: res_seq_str.into(),
                        },
                    })?;
                    let x: f64 = x_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidFloat {
                            columns: "31-38".into(),
                            value: x_str.into(),
                        },
                    })?;
                    let y: f64 = y_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidFloat {
                            columns: "39-46".into(),
                            value: y_str.into(),
                        },
                    })?;
                    let z: f64 = z_str.parse().map_err(|_| PdbError::Parse {
                        line: line_num,
                        kind: PdbParseErrorKind::InvalidFloat {
                            columns: "47-54".into(),
                            value: z_str.into(),
                        },
                    })?;

                    let key = (chain_id, res_seq);
                    if current_key != Some(key) {
                        if let Some(done) = open_residue.take() {
                            structure.append_residue(done);
                        }
                        open_residue = Some(Residue::new(
                            structure.len() + 1,
                            res_name_str,
                            chain_id,
                        ));
                        current_key = Some(key);
                    }
                    if let Some(residue) = open_residue.as_mut() {
                        residue.add_atom(Atom::new(name_str, Point3::new(x, y, z)));
                    }
                }
                "END" | "ENDMDL" => break,
                // HETATM, TER, REMARK and friends carry nothing we need
                _ => {}
            }
        }

        if let Some(done) = open_residue.take() {
            structure.append_residue(done);
        }

        if structure.is_empty() {
            return Err(PdbError::MissingRecord("ATOM records".into()));
        }
        Ok(structure)
    }
}
