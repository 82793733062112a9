use crate::engine::store::{FIXED_RECORDS_FILE, PARSED_RECORDS_FILE, TIED_RECORDS_FILE};
use std::path::PathBuf;
use thiserror::Error;

const RUN_SCRIPT_NAME: &str = "protein_mpnn_run.py";

pub const DEFAULT_NUM_SEQ_PER_TARGET: usize = 2;
pub const DEFAULT_SAMPLING_TEMP: f64 = 0.2;
pub const DEFAULT_BATCH_SIZE: usize = 1;
pub const DEFAULT_PYTHON_COMMAND: &str = "python";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
}

/// A fully resolved ProteinMPNN invocation.
///
/// Only the command-line string is built here; nothing is executed or
/// monitored. The input directory is expected to be a flushed
/// [`RecordStore`](crate::engine::store::RecordStore) directory.
#[derive(Debug, Clone, PartialEq)]
pub struct RunCommand {
    pub python_command: String,
    pub install_dir: PathBuf,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub num_seq_per_target: usize,
    pub sampling_temp: f64,
    pub batch_size: usize,
    pub seed: Option<u64>,
}

impl RunCommand {
    /// Renders the space-joined shell command.
    pub fn to_command_line(&self) -> String {
        let input_file = |file: &str| self.input_dir.join(file).display().to_string();

        let mut parts = vec![
            self.python_command.clone(),
            self.install_dir.join(RUN_SCRIPT_NAME).display().to_string(),
            "--jsonl_path".to_string(),
            input_file(PARSED_RECORDS_FILE),
            "--tied_positions_jsonl".to_string(),
            input_file(TIED_RECORDS_FILE),
            "--fixed_positions_jsonl".to_string(),
            input_file(FIXED_RECORDS_FILE),
            "--out_folder".to_string(),
            self.output_dir.display().to_string(),
            "--num_seq_per_target".to_string(),
            self.num_seq_per_target.to_string(),
            "--sampling_temp".to_string(),
            self.sampling_temp.to_string(),
            "--batch_size".to_string(),
            self.batch_size.to_string(),
        ];

        if let Some(seed) = self.seed {
            parts.push("--seed".to_string());
            parts.push(seed.to_string());
        }

        parts.join(" ")
    }
}

/// Builder for [`RunCommand`]; the three directories are required, everything
/// else falls back to the documented defaults.
#[derive(Debug, Default)]
pub struct RunCommandBuilder {
    python_command: Option<String>,
    install_dir: Option<PathBuf>,
    input_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    num_seq_per_target: Option<usize>,
    sampling_temp: Option<f64>,
    batch_size: Option<usize>,
    seed: Option<u64>,
}

impl RunCommandBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn python_command(mut self, command: &str) -> Self {
        self.python_command = Some(command.to_string());
        self
    }
    pub fn install_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.install_dir = Some(path.into());
        self
    }
    pub fn input_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.input_dir = Some(path.into());
        self
    }
    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(path.into());
        self
    }
    pub fn num_seq_per_target(mut self, n: usize) -> Self {
        self.num_seq_per_target = Some(n);
        self
    }
    pub fn sampling_temp(mut self, temp: f64) -> Self {
        self.sampling_temp = Some(temp);
        self
    }
    pub fn batch_size(mut self, n: usize) -> Self {
        self.batch_size = Some(n);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn build(self) -> Result<RunCommand, CommandError> {
        Ok(RunCommand {
            python_command: self
                .python_command
                .unwrap_or_else(|| DEFAULT_PYTHON_COMMAND.to_string()),
            install_dir: self
                .install_dir
                .ok_or(CommandError::MissingParameter("install_dir"))?,
            input_dir: self
                .input_dir
                .ok_or(CommandError::MissingParameter("input_dir"))?,
            output_dir: self
                .output_dir
                .ok_or(CommandError::MissingParameter("output_dir"))?,
            num_seq_per_target: self.num_seq_per_target.unwrap_or(DEFAULT_NUM_SEQ_PER_TARGET),
            sampling_temp: self.sampling_temp.unwrap_or(DEFAULT_SAMPLING_TEMP),
            batch_size: self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
            seed: self.seed,
        })
    }
}
