use crate::cli::RunCommandArgs;
use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tieprep::engine::command::{RunCommand, RunCommandBuilder};
use tracing::debug;

/// Run parameters as they appear in the TOML config file. Every field is
/// optional; CLI flags override file values.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialRunConfig {
    #[serde(rename = "mpnn-dir")]
    pub mpnn_dir: Option<PathBuf>,
    #[serde(rename = "input-dir")]
    pub input_dir: Option<PathBuf>,
    #[serde(rename = "out-folder")]
    pub out_folder: Option<PathBuf>,
    #[serde(rename = "num-seq-per-target")]
    pub num_seq_per_target: Option<usize>,
    #[serde(rename = "sampling-temp")]
    pub sampling_temp: Option<f64>,
    #[serde(rename = "batch-size")]
    pub batch_size: Option<usize>,
    pub seed: Option<u64>,
    pub python: Option<String>,
}

impl PartialRunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: anyhow::Error::new(e),
        })?;
        debug!(?config, "Loaded run-command config file");
        Ok(config)
    }

    /// Merges file values with CLI overrides (CLI wins) into a final command.
    pub fn merge_with_cli(self, args: &RunCommandArgs) -> Result<RunCommand> {
        let mut builder = RunCommandBuilder::new();

        if let Some(dir) = args.mpnn_dir.clone().or(self.mpnn_dir) {
            builder = builder.install_dir(dir);
        }
        if let Some(dir) = args.input_dir.clone().or(self.input_dir) {
            builder = builder.input_dir(dir);
        }
        if let Some(dir) = args.out_folder.clone().or(self.out_folder) {
            builder = builder.output_dir(dir);
        }
        if let Some(n) = args.num_seq_per_target.or(self.num_seq_per_target) {
            builder = builder.num_seq_per_target(n);
        }
        if let Some(temp) = args.sampling_temp.or(self.sampling_temp) {
            builder = builder.sampling_temp(temp);
        }
        if let Some(n) = args.batch_size.or(self.batch_size) {
            builder = builder.batch_size(n);
        }
        if let Some(python) = args.python.clone().or(self.python) {
            builder = builder.python_command(&python);
        }
        builder = builder.seed(args.seed.or(self.seed));

        builder.build().map_err(|e| {
            CliError::Argument(format!(
                "{e} (set it in the config file or via command-line flags)"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn from_file_parses_all_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tieprep.toml");
        fs::write(
            &path,
            r#"
mpnn-dir = "/opt/mpnn"
input-dir = "/work/inputs"
out-folder = "/work/outputs"
num-seq-per-target = 4
sampling-temp = 0.1
batch-size = 2
seed = 7
python = "python3"
"#,
        )
        .unwrap();

        let config = PartialRunConfig::from_file(&path).unwrap();
        assert_eq!(config.mpnn_dir, Some(PathBuf::from("/opt/mpnn")));
        assert_eq!(config.num_seq_per_target, Some(4));
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.python.as_deref(), Some("python3"));
    }

    #[test]
    fn from_file_rejects_unknown_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tieprep.toml");
        fs::write(&path, "unknown-key = 1\n").unwrap();

        let err = PartialRunConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { .. }));
    }

    #[test]
    fn cli_flags_override_file_values() {
        let config = PartialRunConfig {
            mpnn_dir: Some(PathBuf::from("/opt/mpnn")),
            input_dir: Some(PathBuf::from("/from-file")),
            out_folder: Some(PathBuf::from("/work/outputs")),
            sampling_temp: Some(0.3),
            ..PartialRunConfig::default()
        };
        let args = RunCommandArgs {
            input_dir: Some(PathBuf::from("/from-cli")),
            ..RunCommandArgs::default()
        };

        let command = config.merge_with_cli(&args).unwrap();
        assert_eq!(command.input_dir, PathBuf::from("/from-cli"));
        assert_eq!(command.sampling_temp, 0.3);
    }

    #[test]
    fn missing_required_directory_is_an_argument_error() {
        let config = PartialRunConfig::default();
        let err = config.merge_with_cli(&RunCommandArgs::default()).unwrap_err();
        assert!(matches!(err, CliError::Argument(msg) if msg.contains("install_dir")));
    }
}
