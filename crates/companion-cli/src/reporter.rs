use colored::Colorize;
use companion_checker::CheckOutput;
use companion_common::{Diagnostic, DiagnosticCategory};
use rustc_hash::FxHashMap;
use serde::Serialize;

pub struct Reporter {
    color: bool,
    sources: FxHashMap<String, String>,
    line_starts: FxHashMap<String, Vec<u32>>,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter {
            color,
            sources: FxHashMap::default(),
            line_starts: FxHashMap::default(),
        }
    }

    /// Reporter that can render snippets for the given `file -> text` map.
    pub fn with_sources(color: bool, sources: FxHashMap<String, String>) -> Self {
        Reporter {
            sources,
            ..Self::new(color)
        }
    }

    pub fn add_source(&mut self, file: impl Into<String>, text: impl Into<String>) {
        let file = file.into();
        self.line_starts.remove(&file);
        self.sources.insert(file, text.into());
    }

    pub fn render(&mut self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            out.push_str(&self.format_diagnostic(diagnostic));
            out.push('\n');
        }
        out
    }

    pub fn format_diagnostic(&mut self, diagnostic: &Diagnostic) -> String {
        let location = self.format_location(&diagnostic.file, diagnostic.start);
        let category = self.format_category(diagnostic.category);
        let code = self.format_code(diagnostic);

        let mut output = String::new();
        if let Some(location) = location {
            output.push_str(&location);
        } else if !diagnostic.file.is_empty() {
            output.push_str(&diagnostic.file);
        } else {
            output.push_str("<unknown>");
        }

        output.push_str(" - ");
        output.push_str(&category);
        output.push(' ');
        output.push_str(&code);
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);

        if self.color
            && let Some(snippet) =
                self.format_snippet(&diagnostic.file, diagnostic.start, diagnostic.length)
        {
            output.push_str(&snippet);
        }

        output
    }

    /// `Found 2 errors and 1 warning.`, or `None` when there is nothing to report.
    pub fn format_summary(&self, diagnostics: &[Diagnostic]) -> Option<String> {
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        let warnings = diagnostics
            .iter()
            .filter(|d| d.category == DiagnosticCategory::Warning)
            .count();
        if errors == 0 && warnings == 0 {
            return None;
        }

        let plural = |count: usize, noun: &str| {
            if count == 1 {
                format!("1 {noun}")
            } else {
                format!("{count} {noun}s")
            }
        };
        let text = match (errors, warnings) {
            (0, w) => format!("Found {}.", plural(w, "warning")),
            (e, 0) => format!("Found {}.", plural(e, "error")),
            (e, w) => format!("Found {} and {}.", plural(e, "error"), plural(w, "warning")),
        };
        Some(if self.color && errors > 0 {
            text.red().bold().to_string()
        } else {
            text
        })
    }

    /// Source line with the span underlined.
    ///
    /// ```text
    ///     3   scheduler.Enqueue(job);
    ///                   ~~~~~~~
    /// ```
    fn format_snippet(&mut self, file: &str, start: u32, length: u32) -> Option<String> {
        if file.is_empty() || length == 0 {
            return None;
        }

        let (line_num, _) = self.position_for(file, start)?;
        let line_start = *self.line_starts.get(file)?.get((line_num - 1) as usize)? as usize;
        let source = self.sources.get(file)?;
        let start = start as usize;
        let rest = source.get(line_start..)?;
        let line_text = rest.lines().next().unwrap_or_default();
        let line_end = line_start + line_text.len();

        // Tabs stay tabs so the underline lines up with the source.
        let mut underline: String = source
            .get(line_start..start)?
            .chars()
            .map(|ch| if ch == '\t' { '\t' } else { ' ' })
            .collect();
        let span_end = (start + length as usize).min(line_end);
        let marked = source.get(start..span_end).map_or(0, |s| s.chars().count());
        underline.push_str(&"~".repeat(marked.max(1)));

        let underline_display = if self.color {
            underline.red().to_string()
        } else {
            underline
        };
        Some(format!(
            "\n  {line_num:>3}   {line_text}\n        {underline_display}"
        ))
    }

    fn format_location(&mut self, file: &str, offset: u32) -> Option<String> {
        if file.is_empty() {
            return None;
        }

        let (line, column) = self.position_for(file, offset)?;
        Some(format!("{file}:{line}:{column}"))
    }

    /// One-based line and column (in characters) of `offset`.
    fn position_for(&mut self, file: &str, offset: u32) -> Option<(u32, u32)> {
        let source = self.sources.get(file)?;
        if offset as usize > source.len() {
            return None;
        }
        let starts = self
            .line_starts
            .entry(file.to_string())
            .or_insert_with(|| compute_line_starts(source));

        let line_index = starts.partition_point(|&start| start <= offset) - 1;
        let line_start = starts[line_index];
        let column = source
            .get(line_start as usize..offset as usize)
            .map_or(offset - line_start, |prefix| prefix.chars().count() as u32);
        Some((line_index as u32 + 1, column + 1))
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = category.label();

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
        }
    }

    fn format_code(&self, diagnostic: &Diagnostic) -> String {
        let label = diagnostic.display_code();
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}

fn compute_line_starts(source: &str) -> Vec<u32> {
    std::iter::once(0)
        .chain(
            source
                .bytes()
                .enumerate()
                .filter(|&(_, byte)| byte == b'\n')
                .map(|(index, _)| index as u32 + 1),
        )
        .collect()
}

// =============================================================================
// JSON output
// =============================================================================

#[derive(Serialize)]
struct JsonReport<'a> {
    files_checked: usize,
    sites_checked: usize,
    sites_skipped: usize,
    error_count: usize,
    diagnostics: Vec<JsonDiagnostic<'a>>,
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    #[serde(flatten)]
    diagnostic: &'a Diagnostic,
    display_code: String,
}

/// Machine-readable report of a whole run.
pub fn render_json(files_checked: usize, output: &CheckOutput) -> serde_json::Result<String> {
    let report = JsonReport {
        files_checked,
        sites_checked: output.sites_checked,
        sites_skipped: output.sites_skipped,
        error_count: output.error_count(),
        diagnostics: output
            .diagnostics
            .iter()
            .map(|diagnostic| JsonDiagnostic {
                diagnostic,
                display_code: diagnostic.display_code(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&report)
}
