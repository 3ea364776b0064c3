mod convert;
mod info;
mod validate;

use anyhow::Result;
use clap::{Parser, Subcommand};
use errl_ir::ChipType;
use ffdc_pel::{AggregateOptions, SeverityMerge};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "sbe-ffdc",
    about = "Decode SBE chip-op responses and their FFDC into error log entries"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Command {
    /// Convert response buffers into error log entries (JSON)
    Convert {
        /// Raw chip-op response files
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output file, or output directory when several inputs are given.
        /// A single input is written to stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Target tree (YAML) used to resolve callout targets
        #[arg(long)]
        targets: Option<PathBuf>,

        /// Position of the chip that returned the responses
        #[arg(long, default_value_t = 0)]
        chip_pos: u32,

        /// Chip type (proc, ocmb)
        #[arg(long, default_value = "proc")]
        chip_type: ChipType,

        /// Message id of the produced entries
        #[arg(long)]
        message: Option<String>,

        /// Only take a package severity when it is numerically lower than
        /// the running one
        #[arg(long)]
        legacy_severity_merge: bool,

        /// Attach the raw FFDC packages to each entry
        #[arg(long)]
        attach_raw: bool,

        /// Write each entry's raw FFDC to a file in this directory
        #[arg(long)]
        attachments_dir: Option<PathBuf>,
    },

    /// Show the framing and FFDC packages of a response buffer
    Info {
        /// Raw chip-op response file
        input: PathBuf,
    },

    /// Validate a target tree file
    Validate {
        /// Target tree (.yml/.yaml)
        input: PathBuf,

        /// Suppress individual error output
        #[arg(short, long)]
        quiet: bool,

        /// Print summary count only
        #[arg(short, long)]
        summary: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&cli.log_level))
        .init();

    match cli.command {
        Command::Convert {
            inputs,
            output,
            targets,
            chip_pos,
            chip_type,
            message,
            legacy_severity_merge,
            attach_raw,
            attachments_dir,
        } => {
            let defaults = AggregateOptions::default();
            // Attachment files need the raw packages on the entry.
            let attach_raw_ffdc = attach_raw || attachments_dir.is_some();
            let options = convert::ConvertOptions {
                targets,
                attachments_dir,
                aggregate: AggregateOptions {
                    message: message.unwrap_or(defaults.message),
                    chip_position: chip_pos,
                    chip_type,
                    severity_merge: if legacy_severity_merge {
                        SeverityMerge::Legacy
                    } else {
                        SeverityMerge::Worst
                    },
                    attach_raw_ffdc,
                },
            };
            convert::run_convert(&inputs, output.as_deref(), &options)
        }

        Command::Info { input } => info::run_info(&input),

        Command::Validate {
            input,
            quiet,
            summary,
        } => validate::run_validate(&input, quiet, summary),
    }
}
