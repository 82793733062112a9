use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tieprep::engine::partition::DEFAULT_CHAIN_BREAK_DISTANCE;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "tieprep CLI - Converts protein structures into the tied/fixed residue input files consumed by ProteinMPNN sequence design.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert structure files into parsed/tied/fixed record files.
    Prepare(PrepareArgs),
    /// Print the shell command that runs ProteinMPNN against a prepared store.
    RunCommand(RunCommandArgs),
}

/// Arguments for the `prepare` subcommand.
#[derive(Args, Debug)]
pub struct PrepareArgs {
    /// Input structure files in PDB format.
    #[arg(short, long, required = true, num_args(1..), value_name = "PATH")]
    pub input: Vec<PathBuf>,

    /// Directory holding the record files; created when missing.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Design name override. Only valid with a single input file; otherwise
    /// names derive from the file stems.
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// CSV file of chain pairing rules (columns: chain_1,chain_2,weight).
    #[arg(long, value_name = "PATH")]
    pub tied_chains: Option<PathBuf>,

    /// Inline chain pairing rule, e.g. 'A:C' or 'A:C:0.5'.
    /// Can be used multiple times; appended after --tied-chains rules.
    #[arg(long = "tie", value_name = "RULE")]
    pub ties: Vec<String>,

    /// 1-based global index of a designed residue. Can be used multiple times.
    #[arg(long = "designed-residue", value_name = "INDEX")]
    pub designed_residues: Vec<usize>,

    /// Distance in Angstroms between consecutive alpha-carbons that starts a
    /// new chain.
    #[arg(long, value_name = "FLOAT", default_value_t = DEFAULT_CHAIN_BREAK_DISTANCE)]
    pub chain_break_distance: f64,
}

/// Arguments for the `run-command` subcommand.
#[derive(Args, Debug, Default)]
pub struct RunCommandArgs {
    /// TOML configuration file with run parameters.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// ProteinMPNN installation directory (contains protein_mpnn_run.py).
    #[arg(long, value_name = "DIR")]
    pub mpnn_dir: Option<PathBuf>,

    /// Directory with the prepared record files.
    #[arg(short, long, value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory ProteinMPNN should write designed sequences to.
    #[arg(short, long, value_name = "DIR")]
    pub out_folder: Option<PathBuf>,

    /// Number of sequences to sample per target.
    #[arg(long, value_name = "INT")]
    pub num_seq_per_target: Option<usize>,

    /// Sampling temperature.
    #[arg(long, value_name = "FLOAT")]
    pub sampling_temp: Option<f64>,

    /// Batch size.
    #[arg(long, value_name = "INT")]
    pub batch_size: Option<usize>,

    /// Random seed passed to ProteinMPNN.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Python interpreter or path used to launch ProteinMPNN.
    #[arg(long, value_name = "CMD")]
    pub python: Option<String>,
}
