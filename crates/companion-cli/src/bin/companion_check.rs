#![allow(clippy::print_stderr)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::Path;

use companion_cli::args::{CliArgs, OutputFormat};
use companion_cli::driver;
use companion_cli::reporter::{Reporter, render_json};
use companion_cli::tracing_config::init_tracing;

const EXIT_SUCCESS: i32 = 0;
const EXIT_ERRORS_REPORTED: i32 = 1;

fn main() -> Result<()> {
    // Initialize tracing if COMPANION_LOG or RUST_LOG is set.
    init_tracing();

    let args = CliArgs::parse();
    let cwd = std::env::current_dir().context("failed to resolve current directory")?;

    if args.list_files_only {
        return handle_list_files_only(&args, &cwd);
    }

    let run = driver::run(&args, &cwd)?;

    match args.format {
        OutputFormat::Json => {
            let report = render_json(run.files.len(), &run.output)
                .context("failed to serialize report")?;
            println!("{report}");
        }
        OutputFormat::Text => {
            if !run.output.diagnostics.is_empty() {
                let pretty = args
                    .pretty()
                    .unwrap_or_else(|| std::io::stderr().is_terminal());
                let mut reporter = Reporter::with_sources(pretty, run.sources);
                // render() ends every diagnostic with a newline
                eprint!("{}", reporter.render(&run.output.diagnostics));
                if let Some(summary) = reporter.format_summary(&run.output.diagnostics) {
                    eprintln!("\n{summary}");
                }
            }
        }
    }

    if run.output.error_count() > 0 {
        std::process::exit(EXIT_ERRORS_REPORTED);
    }
    std::process::exit(EXIT_SUCCESS);
}

fn handle_list_files_only(args: &CliArgs, cwd: &Path) -> Result<()> {
    let inputs = driver::resolve_inputs(args, cwd)?;
    for file in &inputs.files {
        println!("{}", file.display());
    }
    Ok(())
}
