//! omnilab CLI - console front end for the prototyping lab
//!
//! Typed lines stand in for voice transcripts; stdout stands in for the
//! HUD panels and text-to-speech of a graphical host.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use omnilab::LabConfig;
use std::fs;
use std::path::{Path, PathBuf};

mod console;

#[derive(Parser)]
#[command(name = "omnilab")]
#[command(about = "Voice-driven 3D prototyping lab", long_about = None)]
struct Cli {
    /// Path to a TOML config file overriding session defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open an interactive console session (each line is a transcript)
    Run,
    /// Play a scripted demo session in real time
    Demo,
    /// Run the demo script headless and export a metrics snapshot as JSON
    Export {
        /// Output file (stdout when omitted)
        output: Option<PathBuf>,
    },
    /// Print the resolved configuration as TOML
    Info,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Run) | None => console::run(config)?,
        Some(Commands::Demo) => console::demo(config),
        Some(Commands::Export { output }) => {
            let json = console::export(config)?;
            match output {
                Some(path) => {
                    fs::write(&path, json)
                        .with_context(|| format!("writing snapshot to {}", path.display()))?;
                    eprintln!("snapshot written to {}", path.display());
                }
                None => println!("{json}"),
            }
        }
        Some(Commands::Info) => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<LabConfig> {
    match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let config = LabConfig::from_toml_str(&text)
                .with_context(|| format!("parsing config {}", path.display()))?;
            log::debug!("config loaded from {}", path.display());
            Ok(config)
        }
        None => Ok(LabConfig::default()),
    }
}
