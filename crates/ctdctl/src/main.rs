use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ctdctl::cmd_args;
use ctdctl::cmd_check;
use ctdctl::cmd_get;
use ctdctl::cmd_normalize;
use ctdctl::cmd_relocate::{self, RelocateArgs};
use ctdctl::cmd_set;
use ctdctl::cmd_show;

#[derive(Parser, Debug)]
#[command(name = "ctdctl", version, about = "Common Tool Descriptor CLI")]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Output JSON where applicable
    #[arg(long)]
    json: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List tool metadata and parameters
    Show {
        path: PathBuf,
        /// Include advanced parameters
        #[arg(long)]
        advanced: bool,
    },
    /// Print one parameter value
    Get {
        path: PathBuf,
        #[arg(long)]
        key: String,
    },
    /// Assign a parameter value and write the descriptor back
    Set {
        path: PathBuf,
        #[arg(long)]
        key: String,
        #[arg(long)]
        value: String,
        /// Write to this file instead of updating `path` in place
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Re-emit the descriptor in canonical form
    Normalize {
        path: PathBuf,
        /// Destination file; stdout when omitted
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the command-line arguments built from the CLI mapping
    Args { path: PathBuf },
    /// Validate references and required values
    Check { path: PathBuf },
    /// Move tool outputs to their expected locations
    Relocate {
        path: PathBuf,
        #[arg(long, default_value = ".")]
        work_dir: PathBuf,
        #[arg(long)]
        temp_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let Cli { verbose, json, cmd } = Cli::parse();

    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.into()),
        ))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cmd {
        Cmd::Show { path, advanced } => cmd_show::run(&path, advanced, json)?,
        Cmd::Get { path, key } => cmd_get::run(&path, &key, json)?,
        Cmd::Set {
            path,
            key,
            value,
            output,
        } => cmd_set::run(&path, &key, &value, output.as_deref(), json)?,
        Cmd::Normalize { path, output } => cmd_normalize::run(&path, output.as_deref())?,
        Cmd::Args { path } => cmd_args::run(&path, json)?,
        Cmd::Check { path } => cmd_check::run(&path, json)?,
        Cmd::Relocate {
            path,
            work_dir,
            temp_dir,
        } => {
            let args = RelocateArgs {
                path,
                work_dir,
                temp_dir,
            };
            cmd_relocate::run(args, json)?
        }
    };

    Ok(())
}
