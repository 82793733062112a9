use crate::cli::PrepareArgs;
use crate::error::{CliError, Result};
use crate::utils::parser::parse_tie_rule;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tieprep::core::io::pdb::PdbFile;
use tieprep::core::io::traits::StructureFile;
use tieprep::engine::store::RecordStore;
use tieprep::engine::tying::{self, ChainPairing};
use tieprep::workflows::prepare::{self, PrepareOptions};
use tracing::info;

pub fn run(args: PrepareArgs) -> Result<()> {
    if args.name.is_some() && args.input.len() > 1 {
        return Err(CliError::Argument(
            "--name can only be used with a single input file".to_string(),
        ));
    }

    let pairings = collect_pairings(&args)?;
    info!(rules = pairings.len(), "Collected chain pairing rules");

    let mut store = RecordStore::open(&args.output_dir)?;

    let options = PrepareOptions {
        chain_break_distance: args.chain_break_distance,
        ..PrepareOptions::default()
    };

    let pb = ProgressBar::new(args.input.len() as u64);
    pb.set_style(
        ProgressStyle::with_template("{msg:<20} [{bar:40.cyan/blue}] {pos}/{len}")
            .expect("Failed to create bar style template")
            .progress_chars("##-"),
    );
    pb.set_draw_target(indicatif::ProgressDrawTarget::stderr());

    for input in &args.input {
        let name = match &args.name {
            Some(name) => name.clone(),
            None => design_name_from_path(input),
        };
        pb.set_message(name.clone());

        info!("Loading input structure from {:?}", input);
        let structure = PdbFile::read_from_path(input).map_err(|e| CliError::FileParsing {
            path: input.clone(),
            source: e.into(),
        })?;

        let summary = prepare::run(
            &name,
            &structure,
            &args.designed_residues,
            &pairings,
            &options,
            &mut store,
        )?;

        pb.println(format!(
            "✓ {}: {} chains, {} residues, {} tied records",
            summary.name, summary.num_chains, summary.num_residues, summary.tied_records
        ));
        for (chain, sequence) in &summary.chain_sequences {
            pb.println(format!("    {}: {}", chain, sequence));
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    store.flush()?;
    println!(
        "✓ Stored {} design(s) in {}",
        args.input.len(),
        args.output_dir.display()
    );

    Ok(())
}

fn collect_pairings(args: &PrepareArgs) -> Result<Vec<ChainPairing>> {
    let mut pairings = Vec::new();
    if let Some(path) = &args.tied_chains {
        pairings.extend(tying::load_pairing_rules(path)?);
    }
    for rule in &args.ties {
        pairings.push(parse_tie_rule(rule)?);
    }
    Ok(pairings)
}

/// Derives a design name from a file path: `D` plus the file stem with
/// underscores removed (`design_2_1.pdb` becomes `Ddesign21`).
fn design_name_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("design");
    format!("D{}", stem.replace('_', ""))
}
