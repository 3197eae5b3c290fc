/// Crate-level error types for doclinks diagnostics.
use std::path::PathBuf;

/// All errors in doclinks carry enough context to produce a useful diagnostic
/// without a debugger. Gate failures carry the count the build log reports.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// One or more link targets resolve in no locale.
    #[error("{count} broken link(s) found")]
    BrokenLinks {
        /// Number of distinct unresolved targets.
        count: usize,
    },

    /// The `all` command ran several gates and at least one failed.
    #[error("checks failed: {}", checks.join(", "))]
    ChecksFailed {
        /// Names of the failed gates, in run order.
        checks: Vec<&'static str>,
    },

    /// An explicitly requested config file does not exist on disk.
    #[error("config not found: {}", path.display())]
    ConfigNotFound {
        /// Path to the missing config file.
        path: PathBuf,
    },

    /// Admonition containers use keywords outside the allow-list.
    #[error("{count} invalid admonition(s) found")]
    InvalidAdmonitions {
        /// Number of offending container lines.
        count: usize,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// JSON report serialization failed.
    #[error("json: {0}")]
    Json(
        /// The wrapped serialization error.
        #[from]
        serde_json::Error,
    ),

    /// Base-locale pages have no counterpart in some locales.
    #[error("{count} missing localized page(s) found")]
    MissingLocalePages {
        /// Number of missing (locale, page) pairs.
        count: usize,
    },

    /// The link tag pattern failed to compile.
    #[error("regex: {0}")]
    Regex(
        /// The wrapped regex error.
        #[from]
        regex::Error,
    ),

    /// A per-locale scan thread panicked before returning its partial registry.
    #[error("scan aborted for locale `{locale}`")]
    ScanAborted {
        /// Locale whose scan did not complete.
        locale: String,
    },

    /// TOML deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// A locale code is not in the configured enumeration.
    #[error("unknown locale: `{code}` (known: {})", known.join(", "))]
    UnknownLocale {
        /// The offending locale code.
        code: String,
        /// Configured locale codes.
        known: Vec<String>,
    },

    /// Directory traversal failed below a locale root.
    #[error("walk: {0}")]
    Walk(
        /// The wrapped traversal error.
        #[from]
        walkdir::Error,
    ),
}
