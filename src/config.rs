use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::suggestions::SuggestionTable;
use crate::types::Locale;

/// File name of the project configuration, looked up in the project directory.
pub const CONFIG_FILE: &str = ".doclinks.toml";

/// Environment variable that narrows the locale list for one run.
pub const LOCALES_ENV: &str = "DOCS_LOCALES";

/// Locale codes the documentation site ships, in resolution order.
const DEFAULT_LOCALES: &[&str] = &["en", "ko", "ja", "ru", "es", "pt", "ar", "zh_Hans", "pl", "yue_Hant"];

/// Container keywords the site's markdown renderer understands.
const DEFAULT_ADMONITIONS: &[&str] = &["info", "tip", "warning", "danger", "details", "raw", "code-group"];

/// Project configuration loaded from `.doclinks.toml`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Allowed admonition container keywords.
    pub admonitions: Vec<String>,
    /// Reference locale for the completeness gate.
    pub base_locale: Locale,
    /// Enabled locales, in resolution order.
    pub locales: Vec<Locale>,
    /// Documentation source directory, relative to the project directory.
    pub source_dir: PathBuf,
    /// Known renamed targets used to enrich broken-link reports.
    pub suggestions: SuggestionTable,
}

/// Raw TOML structure for `.doclinks.toml`.
#[derive(serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct DoclinksTomlConfig {
    /// Admonition allow-list override.
    admonitions: Option<Vec<String>>,
    /// Base locale override.
    base_locale: Option<String>,
    /// Locale enumeration override.
    locales: Option<Vec<String>>,
    /// Source directory override.
    source_dir: Option<PathBuf>,
    /// Suggestion table override.
    suggestions: Option<BTreeMap<String, String>>,
}

impl Default for Config {
    fn default() -> Self {
        return Self {
            admonitions: DEFAULT_ADMONITIONS.iter().map(|k| return (*k).to_string()).collect(),
            base_locale: Locale("en".to_string()),
            locales: DEFAULT_LOCALES.iter().map(|code| return Locale((*code).to_string())).collect(),
            source_dir: PathBuf::from("docs"),
            suggestions: SuggestionTable::builtin(),
        };
    }
}

impl Config {
    /// Load config from `path`.
    /// Returns the defaults if the file doesn't exist and `required` is false.
    /// Returns an error if the file exists but is malformed, never silently
    /// falling back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigNotFound` if a required file is missing,
    /// `Error::Io` if reading fails, `Error::TomlDe` if the TOML is malformed,
    /// or `Error::UnknownLocale` if `base_locale` is not an enabled locale.
    pub fn load(path: &Path, required: bool) -> Result<Self, Error> {
        let content = match std::fs::read_to_string(path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if required {
                    return Err(Error::ConfigNotFound { path: path.to_path_buf() });
                }
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            },
            Err(e) => return Err(Error::Io(e)),
            Ok(c) => c,
        };
        return Self::parse(&content);
    }

    /// Parse config from TOML content, filling unset fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns `Error::TomlDe` if the TOML is malformed,
    /// or `Error::UnknownLocale` if `base_locale` is not an enabled locale.
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: DoclinksTomlConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(admonitions) = raw.admonitions {
            config.admonitions = admonitions;
        }
        if let Some(locales) = raw.locales {
            config.locales = locales.into_iter().map(Locale).collect();
        }
        if let Some(base) = raw.base_locale {
            config.base_locale = Locale(base);
        }
        if let Some(source_dir) = raw.source_dir {
            config.source_dir = source_dir;
        }
        if let Some(suggestions) = raw.suggestions {
            config.suggestions = SuggestionTable::from_pairs(suggestions);
        }

        config.ensure_known(config.base_locale.as_str())?;
        return Ok(config);
    }

    /// Narrow the enabled locales to a comma-separated list, in the given order.
    /// Blank entries and repeats are ignored.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownLocale` if a code is not in the configured enumeration.
    pub fn narrow_locales(&mut self, codes: &str) -> Result<(), Error> {
        let mut narrowed: Vec<Locale> = Vec::new();
        for code in codes.split(',').map(str::trim).filter(|c| return !c.is_empty()) {
            self.ensure_known(code)?;
            let locale = Locale(code.to_string());
            if !narrowed.contains(&locale) {
                narrowed.push(locale);
            }
        }
        tracing::debug!(locales = ?narrowed, "narrowed locales");
        self.locales = narrowed;
        return Ok(());
    }

    /// Check that a code belongs to the configured enumeration.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownLocale` naming the known codes.
    fn ensure_known(&self, code: &str) -> Result<(), Error> {
        if self.locales.iter().any(|l| return l.as_str() == code) {
            return Ok(());
        }
        return Err(Error::UnknownLocale {
            code: code.to_string(),
            known: self.locales.iter().map(|l| return l.0.clone()).collect(),
        });
    }
}
