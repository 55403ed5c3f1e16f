//! SPARC v8/v9 simulator CLI.
//!
//! A single `run` subcommand: load a raw boot image (and optionally a
//! TOML topology file overriding the default machine layout), dispatch
//! until trap, stop request, or instruction limit, then print counters.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use sparc_core::core::config::MachineConfig;
use sparc_core::Machine;

#[derive(Parser, Debug)]
#[command(name = "sparc-sim", author, version, about = "SPARC v8/v9 system simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a raw binary image against a machine topology.
    Run {
        /// Raw instruction image loaded at the start of guest RAM.
        #[arg(long)]
        image: PathBuf,
        /// TOML topology file overriding the default machine layout.
        #[arg(long)]
        topology: Option<PathBuf>,
        /// Maximum guest instructions to dispatch, overriding any limit
        /// set in the topology file.
        #[arg(long)]
        max_instructions: Option<u64>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    match Cli::parse().command {
        Commands::Run {
            image,
            topology,
            max_instructions,
        } => cmd_run(&image, topology.as_deref(), max_instructions),
    }
}

fn cmd_run(image_path: &Path, topology: Option<&Path>, max_instructions: Option<u64>) -> ExitCode {
    let config = match load_config(topology) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let image = match std::fs::read(image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("failed to read image {}: {e}", image_path.display());
            return ExitCode::FAILURE;
        }
    };

    let mut machine = Machine::new(&config);
    machine.load_image(&image);

    let limit = max_instructions.or(config.general.max_instructions);
    match machine.run(limit) {
        Ok(()) => {
            log::info!(
                "halted at pc={:#018x}, {} instructions dispatched",
                machine.cpu.pc,
                machine.cpu.n_translated_instrs,
            );
            println!("{}", machine.cpu.stats);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("fault at pc={:#018x}: {e}", machine.cpu.pc);
            ExitCode::FAILURE
        }
    }
}

fn load_config(topology: Option<&Path>) -> Result<MachineConfig, String> {
    let Some(path) = topology else {
        return Ok(MachineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("failed to read topology file {}: {e}", path.display()))?;
    MachineConfig::from_toml_str(&text)
        .map_err(|e| format!("failed to parse topology file {}: {e}", path.display()))
}
