use std::fmt::Write as _;

use crate::config;
use crate::error::Error;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

/// Print a markdown report to stdout with bold headings.
pub fn print_report(md: &str) {
    for line in md.lines() {
        if line.starts_with('#') {
            println!("{BOLD}{line}{RESET}");
        } else {
            println!("{line}");
        }
    }
}

/// Render an error as valid markdown with bold headings and print to stderr.
pub fn print_error(e: &Error) {
    let md = render_error(e);
    for line in md.lines() {
        if line.starts_with('#') {
            eprintln!("{BOLD}{line}{RESET}");
        } else {
            eprintln!("{line}");
        }
    }
}

/// Render an error as a structured markdown diagnostic.
///
/// Each variant produces a block with what happened and, where known, how to fix it.
pub fn render_error(e: &Error) -> String {
    match e {
        Error::BrokenLinks { count } => render_broken_links(*count),
        Error::MissingLocalePages { count } => render_missing_locale_pages(*count),
        Error::InvalidAdmonitions { count } => render_invalid_admonitions(*count),
        Error::UnknownLocale { code, known } => render_unknown_locale(code, known),
        Error::ChecksFailed { checks } => render_checks_failed(checks),
        _ => render_generic(e),
    }
}

fn render_generic(e: &Error) -> String {
    match e {
        Error::ConfigNotFound { path } => format!("\
# Error: Config Not Found

`{}` does not exist.

## Fix

Pass an existing file to `--config`, or drop the flag to use `{}` from the project directory.
", path.display(), config::CONFIG_FILE),

        Error::TomlDe(e) => format!("\
# Error: Invalid Config

{e}
"),

        Error::ScanAborted { locale } => format!("\
# Error: Scan Aborted

The scan of locale `{locale}` stopped before finishing. No partial report is produced.
"),

        Error::Io(e) => format!("\
# Error: I/O

{e}
"),
        Error::Walk(e) => format!("\
# Error: Directory Walk

{e}
"),
        // Already handled in render_error, but need exhaustive match.
        _ => format!("\
# Error

{e}
"),
    }
}

fn render_broken_links(count: usize) -> String {
    format!("\
# Error: Broken Links

{count} `LocalizedLink` target(s) resolve in no locale.

## Fix

Point each `href` listed above at an existing page or section, or add the page
to at least one locale. Where a replacement is known it is shown as `Did you mean`.
An `Ambiguous` target meets several dynamic routes in one directory; keep a single
bracketed route there, or link with a literal segment.
")
}

fn render_missing_locale_pages(count: usize) -> String {
    format!("\
# Error: Missing Localized Pages

{count} page(s) of the base locale have no counterpart.

## Fix

Create the listed files in each locale, copying the base page if no translation exists yet.
")
}

fn render_invalid_admonitions(count: usize) -> String {
    format!("\
# Error: Invalid Admonitions

{count} container(s) use an unknown keyword.

## Fix

Use one of the allowed keywords, or add the keyword to `admonitions` in `{}`.
", config::CONFIG_FILE)
}

fn render_unknown_locale(code: &str, known: &[String]) -> String {
    format!(
        "\
# Error: Unknown Locale

`{code}` is not a configured locale.

## Known locales

{}

## Fix

Check `{}` or the `locales` list in `{}`.
",
        known.join(", "),
        config::LOCALES_ENV,
        config::CONFIG_FILE
    )
}

fn render_checks_failed(checks: &[&str]) -> String {
    let mut out = "\
# Error: Build Gate Failed

"
    .to_string();
    for check in checks {
        let _ = writeln!(out, "- {check}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_links_diagnostic_states_count() {
        let md = render_error(&Error::BrokenLinks { count: 2 });
        assert!(md.starts_with("# Error: Broken Links"));
        assert!(md.contains("2 `LocalizedLink` target(s)"));
    }

    #[test]
    fn checks_failed_lists_each_gate() {
        let md = render_error(&Error::ChecksFailed { checks: vec!["links", "admonitions"] });
        assert!(md.contains("- links\n- admonitions\n"));
    }
}
