//! Snapshot discovery, loading and checking.

use anyhow::{Context, Result};
use companion_checker::{CheckOutput, CheckerOptions, Program, check_program, sort_diagnostics};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};
use walkdir::WalkDir;

use crate::args::CliArgs;
use crate::config::{
    CONFIG_FILE_NAME, FileFilter, apply_cli_overrides, find_config, load_config,
    resolve_checker_options,
};

/// Everything a run needs once the config and command line are combined.
#[derive(Debug, Clone)]
pub struct ResolvedInputs {
    pub config_path: Option<PathBuf>,
    pub base_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub options: CheckerOptions,
}

/// Result of checking every discovered snapshot.
#[derive(Debug, Default)]
pub struct CheckRun {
    pub files: Vec<PathBuf>,
    pub output: CheckOutput,
    /// Source text per unit file name, for snippets.
    pub sources: FxHashMap<String, String>,
}

pub fn resolve_inputs(args: &CliArgs, cwd: &Path) -> Result<ResolvedInputs> {
    let config_path = find_config(args.project.as_deref(), cwd)?;
    let config = config_path
        .as_deref()
        .map(load_config)
        .transpose()?
        .unwrap_or_default();

    let base_dir = config_path
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or(cwd)
        .to_path_buf();

    let mut options = resolve_checker_options(config.checker_options.as_ref());
    apply_cli_overrides(&mut options, args);

    let filter = FileFilter::from_config(&config)?;
    let roots: Vec<PathBuf> = if args.paths.is_empty() {
        vec![base_dir.clone()]
    } else {
        args.paths
            .iter()
            .map(|path| {
                if path.is_absolute() {
                    path.clone()
                } else {
                    cwd.join(path)
                }
            })
            .collect()
    };
    let files = discover_snapshots(&roots, &base_dir, &filter)?;

    Ok(ResolvedInputs {
        config_path,
        base_dir,
        files,
        options,
    })
}

/// Collect snapshot files under `roots`.
///
/// Files named explicitly are always kept. Directories are walked for
/// `*.json` files other than `companion.json`, filtered by `filter` relative
/// to `base_dir`. The result is sorted and free of duplicates.
pub fn discover_snapshots(
    roots: &[PathBuf],
    base_dir: &Path,
    filter: &FileFilter,
) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for root in roots {
        if root.is_file() {
            files.push(root.clone());
            continue;
        }
        if !root.is_dir() {
            anyhow::bail!("path not found: {}", root.display());
        }

        for entry in WalkDir::new(root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            if path
                .file_name()
                .is_some_and(|name| name == CONFIG_FILE_NAME)
            {
                continue;
            }
            let relative = path.strip_prefix(base_dir).unwrap_or(path);
            if !filter.is_match(relative) {
                debug!(path = %path.display(), "excluded by config");
                continue;
            }
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

pub fn load_program(path: &Path) -> Result<Program> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot: {}", path.display()))?;
    Program::from_json(&text)
        .with_context(|| format!("failed to load snapshot: {}", path.display()))
}

fn check_file(
    path: &Path,
    options: &CheckerOptions,
) -> Result<(CheckOutput, Vec<(String, String)>)> {
    let program = load_program(path)?;
    let output = check_program(&program, options.clone());
    let sources = program
        .units()
        .iter()
        .filter_map(|unit| {
            unit.source_text
                .as_ref()
                .map(|text| (unit.file_name.clone(), text.clone()))
        })
        .collect();
    Ok((output, sources))
}

/// Load and check every file. Snapshots are processed in parallel unless
/// `options.parallel` is off.
pub fn check_files(files: &[PathBuf], options: &CheckerOptions) -> Result<CheckRun> {
    let _span = info_span!("check_files", files = files.len()).entered();

    let checked: Vec<(CheckOutput, Vec<(String, String)>)> = if options.parallel {
        files
            .par_iter()
            .map(|path| check_file(path, options))
            .collect::<Result<_>>()?
    } else {
        files
            .iter()
            .map(|path| check_file(path, options))
            .collect::<Result<_>>()?
    };

    let mut run = CheckRun {
        files: files.to_vec(),
        ..CheckRun::default()
    };
    for (output, sources) in checked {
        run.output = std::mem::take(&mut run.output).merge(output);
        run.sources.extend(sources);
    }
    sort_diagnostics(&mut run.output.diagnostics);
    Ok(run)
}

pub fn run(args: &CliArgs, cwd: &Path) -> Result<CheckRun> {
    let inputs = resolve_inputs(args, cwd)?;
    debug!(
        config = ?inputs.config_path,
        files = inputs.files.len(),
        parallel = inputs.options.parallel,
        "resolved inputs"
    );
    check_files(&inputs.files, &inputs.options)
}
