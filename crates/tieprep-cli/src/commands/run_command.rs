use crate::cli::RunCommandArgs;
use crate::config::PartialRunConfig;
use crate::error::Result;
use tracing::info;

pub fn run(args: RunCommandArgs) -> Result<()> {
    let file_config = match &args.config {
        Some(path) => PartialRunConfig::from_file(path)?,
        None => PartialRunConfig::default(),
    };

    let command = file_config.merge_with_cli(&args)?;
    info!(?command, "Resolved ProteinMPNN run command");

    println!("{}", command.to_command_line());
    Ok(())
}
