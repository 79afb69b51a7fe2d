use std::path::PathBuf;

use clap::Subcommand;

use crate::args::*;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run a benchmark batch against one or more vendors.
    Run {
        /// Vendor ids (repeatable). Resolved against ECHOBENCH_* env presets.
        #[arg(long = "vendor", required = true)]
        vendors: Vec<String>,
        /// Synthesis input text (repeatable).
        #[arg(long)]
        text: Vec<String>,
        /// Recognition input audio file (repeatable).
        #[arg(long)]
        audio: Vec<PathBuf>,
        #[arg(long, default_value_t = 1)]
        repetitions: u32,
        #[command(flatten)]
        job: JobArgs,
        /// Extra template definitions to import before the run (JSON array).
        #[arg(long)]
        templates: Option<PathBuf>,
        /// Directory to write synthesized audio artifacts into.
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Inspect, export, or fetch provider templates.
    Templates {
        #[command(subcommand)]
        command: TemplatesCommand,
    },
    /// List vendor configurations provisioned from the environment.
    Vendors {
        #[arg(long)]
        templates: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Debug, Subcommand)]
pub enum TemplatesCommand {
    List {
        /// Extra template definitions to import first (JSON array).
        #[arg(long)]
        templates: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Validate a template file and report what would import.
    Import {
        path: PathBuf,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Export user-defined templates as a JSON array.
    Export {
        #[arg(long)]
        templates: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Fetch a template catalog from a URL and report what imported.
    Fetch {
        url: String,
        #[command(flatten)]
        output: OutputArgs,
    },
}
