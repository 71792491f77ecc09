//! The companion pass.
//!
//! Every reference site is an independent, pure evaluation against the
//! read-only model, so sites are fanned out on the rayon pool (within a unit
//! and across units) and their diagnostics collected afterwards. Nothing is
//! shared between evaluations except the model.

use crate::authorization::authorize;
use crate::context::{CancellationToken, CheckerOptions};
use crate::error_reporter::report_decision;
use crate::model::SemanticModel;
use crate::reference::{CompilationUnit, ReferenceSite};
use crate::unresolved_names::check_unresolved_companion_names;
use companion_common::Diagnostic;
use rayon::prelude::*;
use tracing::{debug, info_span};

/// Result of checking one or more compilation units.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CheckOutput {
    pub diagnostics: Vec<Diagnostic>,
    /// Sites evaluated before completion or cancellation.
    pub sites_checked: usize,
    /// Sites abandoned because the pass was cancelled.
    pub sites_skipped: usize,
}

impl CheckOutput {
    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.sites_skipped > 0
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Combine the results of two independent passes. Call
    /// [`sort_diagnostics`] afterwards to restore the canonical order.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.diagnostics.extend(other.diagnostics);
        self.sites_checked += other.sites_checked;
        self.sites_skipped += other.sites_skipped;
        self
    }
}

enum SiteOutcome {
    Skipped,
    Checked(Option<Diagnostic>),
}

pub struct CompanionChecker<'a> {
    model: &'a dyn SemanticModel,
    options: CheckerOptions,
    cancellation: Option<CancellationToken>,
}

impl<'a> CompanionChecker<'a> {
    #[must_use]
    pub fn new(model: &'a dyn SemanticModel, options: CheckerOptions) -> Self {
        Self {
            model,
            options,
            cancellation: None,
        }
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    #[must_use]
    pub fn options(&self) -> &CheckerOptions {
        &self.options
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Evaluate one reference site of `unit`.
    #[must_use]
    pub fn check_site(&self, unit: &CompilationUnit, site: &ReferenceSite) -> Option<Diagnostic> {
        let decision = authorize(self.model, &unit.nodes, site);
        report_decision(&unit.file_name, &decision)
    }

    fn site_outcome(&self, unit: &CompilationUnit, site: &ReferenceSite) -> SiteOutcome {
        if self.is_cancelled() {
            return SiteOutcome::Skipped;
        }
        SiteOutcome::Checked(self.check_site(unit, site))
    }

    /// Check every reference site in `unit`.
    pub fn check_unit(&self, unit: &CompilationUnit) -> CheckOutput {
        let _span = info_span!(
            "check_unit",
            file = %unit.file_name,
            sites = unit.references.len()
        )
        .entered();

        let outcomes: Vec<SiteOutcome> = if self.options.parallel {
            unit.references
                .par_iter()
                .map(|site| self.site_outcome(unit, site))
                .collect()
        } else {
            unit.references
                .iter()
                .map(|site| self.site_outcome(unit, site))
                .collect()
        };

        let mut output = CheckOutput::default();
        for outcome in outcomes {
            match outcome {
                SiteOutcome::Skipped => output.sites_skipped += 1,
                SiteOutcome::Checked(diagnostic) => {
                    output.sites_checked += 1;
                    output.diagnostics.extend(diagnostic);
                }
            }
        }
        if output.sites_skipped > 0 {
            debug!(
                file = %unit.file_name,
                skipped = output.sites_skipped,
                "check cancelled; remaining sites abandoned"
            );
        }
        output
    }

    /// Check all `units`, plus the program-wide lints enabled in the options.
    ///
    /// Diagnostics come back sorted by file, position and code.
    pub fn check_units(&self, units: &[CompilationUnit]) -> CheckOutput {
        let _span = info_span!("companion_check", units = units.len()).entered();

        let mut output = if self.options.parallel {
            units
                .par_iter()
                .map(|unit| self.check_unit(unit))
                .reduce(CheckOutput::default, CheckOutput::merge)
        } else {
            units
                .iter()
                .map(|unit| self.check_unit(unit))
                .fold(CheckOutput::default(), CheckOutput::merge)
        };

        if self.options.report_unresolved_companion_names && !self.is_cancelled() {
            output
                .diagnostics
                .extend(check_unresolved_companion_names(self.model));
        }

        sort_diagnostics(&mut output.diagnostics);
        output
    }
}

/// Deterministic order: file, start, code, length.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        (&a.file, a.start, a.code, a.length).cmp(&(&b.file, b.start, b.code, b.length))
    });
}
