use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Args, Clone)]
pub struct JobArgs {
    /// In-flight calls within the batch. 1 means strictly sequential.
    #[arg(long, default_value_t = 1)]
    pub concurrency: usize,
    /// Per-call timeout in milliseconds.
    #[arg(long, default_value_t = 30_000)]
    pub timeout: u64,
    #[arg(long)]
    pub language: Option<String>,
    /// Audio container format hint (wav, mp3, ...).
    #[arg(long)]
    pub audio_format: Option<String>,
    #[arg(long)]
    pub speed: Option<f64>,
}
