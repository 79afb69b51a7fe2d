use clap::Parser;

mod args;
mod cmd;
mod commands;
mod exit_codes;
mod output;

pub use args::*;
use commands::Command;

#[derive(Debug, Parser)]
#[command(name = "echobench", version, about = "Speech vendor benchmark runner")]
struct Cli {
    /// Emit progress and diagnostics on stderr (RUST_LOG overrides).
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to create tokio runtime: {e}");
            std::process::exit(exit_codes::RUNTIME_ERROR);
        }
    };

    let exit_code = rt.block_on(run_command(cli.command));
    std::process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "echobench=debug" } else { "echobench=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_command(command: Command) -> i32 {
    match command {
        Command::Run {
            vendors,
            text,
            audio,
            repetitions,
            job,
            templates,
            out_dir,
            output,
        } => {
            cmd::run::run_cmd(
                &vendors,
                &text,
                &audio,
                repetitions,
                job,
                templates.as_deref(),
                out_dir.as_deref(),
                output,
            )
            .await
        }
        Command::Templates { command } => match command {
            commands::TemplatesCommand::List { templates, output } => {
                cmd::templates::list_cmd(templates.as_deref(), output).await
            }
            commands::TemplatesCommand::Import { path, output } => {
                cmd::templates::import_cmd(&path, output).await
            }
            commands::TemplatesCommand::Export { templates, output } => {
                cmd::templates::export_cmd(templates.as_deref(), output).await
            }
            commands::TemplatesCommand::Fetch { url, output } => {
                cmd::templates::fetch_cmd(&url, output).await
            }
        },
        Command::Vendors { templates, output } => {
            cmd::vendors::vendors_cmd(templates.as_deref(), output).await
        }
    }
}
