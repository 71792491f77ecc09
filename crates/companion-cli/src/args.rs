use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the companion-check binary.
#[derive(Parser, Debug)]
#[command(
    name = "companion-check",
    version,
    about = "Check companion-type access restrictions in program snapshots"
)]
pub struct CliArgs {
    /// Path to companion.json or a directory containing it.
    #[arg(short = 'p', long = "project")]
    pub project: Option<PathBuf>,

    /// Print names of the snapshot files that would be checked and then stop.
    #[arg(long = "listFilesOnly", alias = "list-files-only")]
    pub list_files_only: bool,

    // ==================== Checking ====================
    /// Warn about companion names that match no declared type.
    #[arg(long = "reportUnresolvedNames", alias = "report-unresolved-names")]
    pub report_unresolved_names: bool,

    /// Check reference sites on the current thread only.
    #[arg(long = "singleThreaded", alias = "single-threaded")]
    pub single_threaded: bool,

    // ==================== Output Formatting ====================
    /// Output format for diagnostics.
    #[arg(long, value_enum, ignore_case = true, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable color and source snippets in text output.
    #[arg(long, overrides_with = "no_pretty")]
    pub pretty: bool,

    /// Disable color and source snippets in text output.
    #[arg(long = "noPretty", alias = "no-pretty", overrides_with = "pretty")]
    pub no_pretty: bool,

    /// Snapshot files or directories to check. Defaults to the project directory.
    pub paths: Vec<PathBuf>,
}

impl CliArgs {
    /// Explicit `--pretty` / `--noPretty` choice; `None` defers to the terminal.
    #[must_use]
    pub fn pretty(&self) -> Option<bool> {
        if self.pretty {
            Some(true)
        } else if self.no_pretty {
            Some(false)
        } else {
            None
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable diagnostics on stderr.
    #[default]
    Text,
    /// One JSON report on stdout.
    Json,
}
