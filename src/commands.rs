//! Build-gate commands: links, locales, admonitions, and all three together.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::admonitions;
use crate::config::{self, Config};
use crate::diagnostics;
use crate::error::Error;
use crate::locales;
use crate::report::{Format, LinkReport};
use crate::resolver::Resolver;
use crate::scanner;
use crate::walker;

/// Everything a gate needs, derived once from the command line.
#[derive(Debug)]
pub struct Context {
    /// Loaded and possibly narrowed configuration.
    pub config: Config,
    /// Documentation root holding one directory per locale.
    pub docs_root: PathBuf,
    /// Report rendering.
    pub format: Format,
}

impl Context {
    /// Derive the context from the build output directory. The project
    /// directory is its parent; config and docs sources live there.
    ///
    /// # Errors
    ///
    /// Returns config loading errors, or `Error::UnknownLocale` if the
    /// locale override names an unconfigured locale.
    pub fn load(
        out_dir: &Path,
        docs_root: Option<&Path>,
        config_path: Option<&Path>,
        locale_override: Option<&str>,
        format: Format,
    ) -> Result<Self, Error> {
        let project_dir = out_dir.parent().unwrap_or_else(|| return Path::new("."));
        let mut config = match config_path {
            None => Config::load(&project_dir.join(config::CONFIG_FILE), false)?,
            Some(path) => Config::load(path, true)?,
        };
        if let Some(codes) = locale_override {
            config.narrow_locales(codes)?;
        }
        let docs_root = docs_root.map_or_else(|| return project_dir.join(&config.source_dir), Path::to_path_buf);
        tracing::debug!(docs_root = %docs_root.display(), locales = config.locales.len(), "loaded context");
        return Ok(Self { config, docs_root, format });
    }
}

/// Combined outcome of every gate, emitted as one JSON document by `all`.
#[derive(Debug, Serialize)]
pub struct GateSummary {
    /// Admonition keyword report.
    pub admonitions: admonitions::AdmonitionReport,
    /// Names of the failed gates, in run order.
    pub failed: Vec<&'static str>,
    /// Broken-link report.
    pub links: LinkReport,
    /// Locale completeness report.
    pub locales: locales::CompletenessReport,
}

/// Validate every `LocalizedLink` target against all locale trees.
///
/// # Errors
///
/// Returns `Error::BrokenLinks` when any target resolves nowhere, or the
/// first filesystem error, which aborts the pass.
pub fn links(ctx: &Context) -> Result<(), Error> {
    let report = link_report(ctx)?;
    present(ctx, &report, LinkReport::render_markdown)?;
    return report.gate();
}

/// Check that every base-locale page exists in every other locale.
///
/// # Errors
///
/// Returns `Error::MissingLocalePages` when pages are missing, or filesystem errors.
pub fn locales(ctx: &Context) -> Result<(), Error> {
    let report = locales::check(&ctx.docs_root, &ctx.config.base_locale, &ctx.config.locales)?;
    present(ctx, &report, locales::CompletenessReport::render_markdown)?;
    return report.gate();
}

/// Check admonition container keywords against the allow-list.
///
/// # Errors
///
/// Returns `Error::InvalidAdmonitions` when a keyword is not allowed, or filesystem errors.
pub fn admonitions(ctx: &Context) -> Result<(), Error> {
    let report = admonition_report(ctx)?;
    present(ctx, &report, admonitions::AdmonitionReport::render_markdown)?;
    return report.gate();
}

/// Run every gate and fail if any gate failed. Text output prints each
/// report in turn; JSON output is a single `GateSummary` document.
/// Filesystem and config errors abort immediately.
///
/// # Errors
///
/// Returns `Error::ChecksFailed` naming the failed gates, or the first fatal error.
pub fn all(ctx: &Context) -> Result<(), Error> {
    let mut summary = GateSummary {
        links: link_report(ctx)?,
        locales: locales::check(&ctx.docs_root, &ctx.config.base_locale, &ctx.config.locales)?,
        admonitions: admonition_report(ctx)?,
        failed: Vec::new(),
    };

    let outcomes = [
        ("links", summary.links.gate()),
        ("locales", summary.locales.gate()),
        ("admonitions", summary.admonitions.gate()),
    ];
    let mut errors = Vec::new();
    for (name, outcome) in outcomes {
        if let Err(e) = outcome {
            tracing::debug!(gate = name, error = %e, "gate failed");
            summary.failed.push(name);
            errors.push(e);
        }
    }

    match ctx.format {
        Format::Json => emit_json(&summary)?,
        Format::Text => {
            diagnostics::print_report(&summary.links.render_markdown());
            diagnostics::print_report(&summary.locales.render_markdown());
            diagnostics::print_report(&summary.admonitions.render_markdown());
            for e in &errors {
                diagnostics::print_error(e);
            }
        },
    }

    if summary.failed.is_empty() {
        return Ok(());
    }
    return Err(Error::ChecksFailed { checks: summary.failed });
}

/// Scan, resolve, and partition every link target.
///
/// # Errors
///
/// Returns filesystem errors; they abort the pass.
fn link_report(ctx: &Context) -> Result<LinkReport, Error> {
    let trees = walker::locale_trees(&ctx.docs_root, &ctx.config.locales)?;
    let scan = scanner::scan(&trees)?;
    if scan.registry.is_empty() {
        tracing::warn!(docs_root = %ctx.docs_root.display(), "no LocalizedLink tags found");
    }

    let mut resolver = Resolver::new(&ctx.docs_root, &ctx.config.locales);
    resolver.resolve_registry(&scan.registry)?;

    let report = LinkReport::build(
        &ctx.docs_root,
        scan.files,
        &scan.registry,
        resolver.validated(),
        resolver.ambiguous(),
        &ctx.config.suggestions,
    );
    tracing::info!(
        targets = report.targets,
        broken = report.broken.len(),
        resolved = resolver.resolution_attempts(),
        "link validation finished"
    );
    return Ok(report);
}

/// Walk every locale and check its admonitions.
///
/// # Errors
///
/// Returns filesystem errors.
fn admonition_report(ctx: &Context) -> Result<admonitions::AdmonitionReport, Error> {
    let trees = walker::locale_trees(&ctx.docs_root, &ctx.config.locales)?;
    return admonitions::check(&trees, &ctx.config.admonitions);
}

/// Print one report in the selected format.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails.
fn present<T: Serialize>(ctx: &Context, report: &T, markdown: fn(&T) -> String) -> Result<(), Error> {
    match ctx.format {
        Format::Json => emit_json(report)?,
        Format::Text => diagnostics::print_report(&markdown(report)),
    }
    return Ok(());
}

/// Print a report as pretty JSON on stdout.
///
/// # Errors
///
/// Returns `Error::Json` if serialization fails.
fn emit_json<T: Serialize>(report: &T) -> Result<(), Error> {
    println!("{}", serde_json::to_string_pretty(report)?);
    return Ok(());
}
