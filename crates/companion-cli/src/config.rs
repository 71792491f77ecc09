//! `companion.json` loading and option resolution.
//!
//! ```json
//! {
//!   "include": ["snapshots/**/*.json"],
//!   "exclude": ["**/fixtures/**"],
//!   "checkerOptions": { "reportUnresolvedCompanionNames": "true" }
//! }
//! ```

use anyhow::{Context, Result, bail};
use companion_checker::CheckerOptions;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};

use crate::args::CliArgs;

pub const CONFIG_FILE_NAME: &str = "companion.json";

/// Deserialize a boolean that might be specified as a string ("true"/"false").
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match Option::<BoolOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(BoolOrString::Bool(b)) => Ok(Some(b)),
        Some(BoolOrString::String(s)) => {
            let normalized = s.trim().to_lowercase();
            match normalized.as_str() {
                "true" | "1" | "yes" | "on" => Ok(Some(true)),
                "false" | "0" | "no" | "off" => Ok(Some(false)),
                _ => Err(Error::custom(format!(
                    "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
                ))),
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CompanionConfig {
    #[serde(default)]
    pub include: Option<Vec<String>>,
    #[serde(default)]
    pub exclude: Option<Vec<String>>,
    #[serde(default)]
    pub checker_options: Option<CheckerOptionsConfig>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CheckerOptionsConfig {
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub parallel: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_bool_or_string")]
    pub report_unresolved_companion_names: Option<bool>,
}

pub fn parse_config(source: &str) -> Result<CompanionConfig> {
    serde_json::from_str(source).context("failed to parse companion.json")
}

pub fn load_config(path: &Path) -> Result<CompanionConfig> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    parse_config(&source).with_context(|| format!("failed to load config: {}", path.display()))
}

/// Locate the config file for this run.
///
/// `--project` may name the file or its directory; without it, a
/// `companion.json` in `cwd` is used when present.
pub fn find_config(project: Option<&Path>, cwd: &Path) -> Result<Option<PathBuf>> {
    let Some(project) = project else {
        let default_path = cwd.join(CONFIG_FILE_NAME);
        return Ok(default_path.is_file().then_some(default_path));
    };

    let project = if project.is_absolute() {
        project.to_path_buf()
    } else {
        cwd.join(project)
    };
    let path = if project.is_dir() {
        project.join(CONFIG_FILE_NAME)
    } else {
        project
    };
    if !path.is_file() {
        bail!("cannot find a config file at '{}'", path.display());
    }
    Ok(Some(path))
}

/// Library options from the config file, defaults for anything unset.
#[must_use]
pub fn resolve_checker_options(config: Option<&CheckerOptionsConfig>) -> CheckerOptions {
    let mut options = CheckerOptions::default();
    if let Some(config) = config {
        if let Some(parallel) = config.parallel {
            options.parallel = parallel;
        }
        if let Some(report) = config.report_unresolved_companion_names {
            options.report_unresolved_companion_names = report;
        }
    }
    options
}

/// Command-line flags win over the config file.
pub fn apply_cli_overrides(options: &mut CheckerOptions, args: &CliArgs) {
    if args.single_threaded {
        options.parallel = false;
    }
    if args.report_unresolved_names {
        options.report_unresolved_companion_names = true;
    }
}

// =============================================================================
// File filter
// =============================================================================

/// `include` / `exclude` globs, matched against paths relative to the
/// config directory with `/` separators.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl FileFilter {
    pub fn new(include: Option<&[String]>, exclude: Option<&[String]>) -> Result<Self> {
        Ok(Self {
            include: include.map(build_glob_set).transpose()?,
            exclude: exclude.map(build_glob_set).transpose()?,
        })
    }

    pub fn from_config(config: &CompanionConfig) -> Result<Self> {
        Self::new(config.include.as_deref(), config.exclude.as_deref())
    }

    #[must_use]
    pub fn is_match(&self, relative_path: &Path) -> bool {
        let normalized = relative_path.to_string_lossy().replace('\\', "/");
        if let Some(include) = &self.include
            && !include.is_match(&normalized)
        {
            return false;
        }
        !self
            .exclude
            .as_ref()
            .is_some_and(|exclude| exclude.is_match(&normalized))
    }
}

fn build_glob_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.trim_start_matches("./");
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid glob pattern '{pattern}'"))?;
        builder.add(glob);
    }
    builder.build().context("failed to compile glob patterns")
}
