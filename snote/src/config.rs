//! Configuration loading for snote
//!
//! Notebooks are configured in an INI file with one section per notebook and
//! a `global` section whose keys act as defaults for every notebook:
//!
//! ```ini
//! [global]
//! editor = nvim
//! timestamp =
//!     [{time}]
//!
//! [journal]
//! path = $HOME/notes/journal
//! template = ${HOME}/notes/journal.tmpl
//! max_list = 20
//! ```
//!
//! Environment variables are expanded in the raw text before parsing. The
//! file is located through the `SNOTE` environment variable, falling back to
//! `<config dir>/snote/snote.ini`.

use crate::error::{ErrorContext, Result, SnoteError};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "SNOTE";

/// Section holding defaults shared by every notebook
pub const GLOBAL_SECTION: &str = "global";

/// Built-in values used when neither the notebook nor `global` sets a key
const BUILTIN_DEFAULTS: &[(&str, &str)] = &[
    ("editor", "vim"),
    ("ext", "md"),
    ("datefmt", "%Y-%m-%d"),
    ("timefmt", "%H:%M:%S"),
    ("timestamp", "\n{time}"),
    ("default_title", "untitled"),
    ("max_list", "-1"),
];

static ENV_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$(?:\{([^}]*)\}|(\w+))").expect("environment reference pattern is valid")
});

/// Expand `$NAME` and `${NAME}` references using the process environment.
///
/// References to unset variables are left as written.
pub fn expand_env_vars(text: &str) -> String {
    expand_vars_with(text, |name| std::env::var(name).ok())
}

/// Expand variable references using an arbitrary lookup
pub fn expand_vars_with<F>(text: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    ENV_REFERENCE
        .replace_all(text, |caps: &Captures| {
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str())
                .unwrap_or_default();
            lookup(name).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

type Section = BTreeMap<String, Option<String>>;

/// A parsed INI document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: BTreeMap<String, Section>,
}

impl IniDocument {
    /// Parse INI text.
    ///
    /// Keys are lower-cased. Indented lines continue the previous value and
    /// are joined to it with a newline.
    pub fn parse(text: &str) -> Result<Self> {
        let mut sections: BTreeMap<String, Section> = BTreeMap::new();
        let mut current: Option<String> = None;
        let mut last_key: Option<String> = None;

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();

            if trimmed.is_empty() {
                last_key = None;
                continue;
            }
            if trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let indented = raw.starts_with(|c: char| c.is_whitespace());
            if indented {
                let continued = match (&current, &last_key) {
                    (Some(section), Some(key)) => {
                        sections.get_mut(section).and_then(|s| s.get_mut(key))
                    }
                    _ => None,
                };
                if let Some(value) = continued {
                    let joined = match value.take() {
                        Some(existing) => format!("{existing}\n{trimmed}"),
                        None => trimmed.to_string(),
                    };
                    *value = Some(joined);
                    continue;
                }
            }

            if trimmed.starts_with('[') {
                let name = trimmed
                    .strip_prefix('[')
                    .and_then(|rest| rest.strip_suffix(']'))
                    .map(str::trim)
                    .filter(|name| !name.is_empty())
                    .ok_or_else(|| SnoteError::ConfigParse {
                        line,
                        message: format!("malformed section header '{trimmed}'"),
                    })?;
                if sections.contains_key(name) {
                    return Err(SnoteError::ConfigParse {
                        line,
                        message: format!("section '{name}' already defined"),
                    });
                }
                sections.insert(name.to_string(), Section::new());
                current = Some(name.to_string());
                last_key = None;
                continue;
            }

            let section = current.as_ref().ok_or_else(|| SnoteError::ConfigParse {
                line,
                message: "key outside of any section".to_string(),
            })?;

            let (key, value) = match trimmed.find(&['=', ':'][..]) {
                Some(pos) => (
                    trimmed[..pos].trim().to_lowercase(),
                    Some(trimmed[pos + 1..].trim().to_string()),
                ),
                None => (trimmed.to_lowercase(), None),
            };
            if key.is_empty() {
                return Err(SnoteError::ConfigParse {
                    line,
                    message: "empty key".to_string(),
                });
            }

            let entries = sections.entry(section.clone()).or_default();
            if entries.contains_key(&key) {
                return Err(SnoteError::ConfigParse {
                    line,
                    message: format!("key '{key}' already set in section '{section}'"),
                });
            }
            entries.insert(key.clone(), value);
            last_key = Some(key);
        }

        Ok(Self { sections })
    }

    /// Whether a section with this exact name exists
    pub fn has_section(&self, name: &str) -> bool {
        self.sections.contains_key(name)
    }

    /// Section names in sorted order
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Raw value lookup without fallback. A valueless key yields `Some("")`.
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(section)?
            .get(&key.to_lowercase())
            .map(|value| value.as_deref().unwrap_or(""))
    }
}

/// Loaded configuration: the parsed document plus where it came from
#[derive(Debug, Clone)]
pub struct Config {
    source: Option<PathBuf>,
    document: IniDocument,
}

impl Config {
    /// Locate and load the configuration file
    pub fn load() -> Result<Self> {
        let path = Self::locate()?;
        Self::from_file(&path)
    }

    /// Find the configuration file.
    ///
    /// When `SNOTE` is set it is the only location considered.
    pub fn locate() -> Result<PathBuf> {
        if let Some(value) = std::env::var_os(CONFIG_ENV_VAR).filter(|v| !v.is_empty()) {
            let path = PathBuf::from(value);
            if path.is_file() {
                tracing::debug!("Configuration file {} exists", path.display());
                return Ok(path);
            }
            return Err(SnoteError::ConfigurationMissing {
                tried: format!("${CONFIG_ENV_VAR} points to '{}'", path.display()),
            });
        }

        let fallback = dirs::config_dir().map(|dir| dir.join("snote").join("snote.ini"));
        match fallback {
            Some(path) if path.is_file() => {
                tracing::debug!("Using default configuration file {}", path.display());
                Ok(path)
            }
            Some(path) => Err(SnoteError::ConfigurationMissing {
                tried: format!("${CONFIG_ENV_VAR} is unset and '{}' does not exist", path.display()),
            }),
            None => Err(SnoteError::ConfigurationMissing {
                tried: format!("${CONFIG_ENV_VAR} is unset and no user config directory is known"),
            }),
        }
    }

    /// Read, expand and parse a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration '{}'", path.display()))?;
        let mut config = Self::from_text(&text)?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Expand environment references in `text` and parse it
    pub fn from_text(text: &str) -> Result<Self> {
        let document = IniDocument::parse(&expand_env_vars(text))?;
        Ok(Self {
            source: None,
            document,
        })
    }

    /// Path the configuration was read from, if it came from a file
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Whether `name` is a configured notebook
    pub fn has_notebook(&self, name: &str) -> bool {
        name != GLOBAL_SECTION && self.document.has_section(name)
    }

    /// Configured notebook names, sorted
    pub fn notebooks(&self) -> Vec<String> {
        self.document
            .sections()
            .filter(|name| *name != GLOBAL_SECTION)
            .map(str::to_string)
            .collect()
    }

    /// Value set directly in a notebook section or in `global`, without
    /// built-in defaults
    pub fn get_explicit(&self, notebook: &str, key: &str) -> Option<&str> {
        self.document
            .get(notebook, key)
            .or_else(|| self.document.get(GLOBAL_SECTION, key))
    }

    /// Value for `key` in `notebook`: the notebook section, then `global`,
    /// then the built-in default
    pub fn get(&self, notebook: &str, key: &str) -> Option<&str> {
        self.get_explicit(notebook, key).or_else(|| builtin_default(key))
    }

    /// Like [`Config::get`], but a blank value counts as unset and the
    /// lookup moves on to `global`, then to the built-in default
    pub fn get_non_blank(&self, notebook: &str, key: &str) -> Option<&str> {
        [
            self.document.get(notebook, key),
            self.document.get(GLOBAL_SECTION, key),
            builtin_default(key),
        ]
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())
    }
}

fn builtin_default(key: &str) -> Option<&'static str> {
    BUILTIN_DEFAULTS
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| *value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::collections::HashMap;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
# notebooks
[global]
editor = nano
timestamp =
    [{time}]

[nb1]
path = /tmp/nb1
ext: txt
; comment
max_list = 5

[nb2]
Path = /tmp/nb2
default_title
";

    #[test]
    fn test_parse_sections_and_keys() {
        let doc = IniDocument::parse(SAMPLE).unwrap();

        assert_eq!(doc.sections().collect::<Vec<_>>(), vec!["global", "nb1", "nb2"]);
        assert_eq!(doc.get("nb1", "path"), Some("/tmp/nb1"));
        assert_eq!(doc.get("nb1", "ext"), Some("txt"));
        assert_eq!(doc.get("nb2", "path"), Some("/tmp/nb2"));
        assert_eq!(doc.get("nb2", "default_title"), Some(""));
        assert_eq!(doc.get("nb2", "ext"), None);
    }

    #[test]
    fn test_continuation_lines_join_with_newline() {
        let doc = IniDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.get("global", "timestamp"), Some("\n[{time}]"));
    }

    #[test]
    fn test_key_outside_section_is_rejected() {
        let err = IniDocument::parse("editor = vim\n").unwrap_err();
        assert!(matches!(err, SnoteError::ConfigParse { line: 1, .. }));
    }

    #[test]
    fn test_duplicate_section_is_rejected() {
        let err = IniDocument::parse("[a]\nx = 1\n[a]\n").unwrap_err();
        assert!(matches!(err, SnoteError::ConfigParse { line: 3, .. }));
    }

    #[test]
    fn test_malformed_header_is_rejected() {
        let err = IniDocument::parse("[broken\n").unwrap_err();
        assert!(matches!(err, SnoteError::ConfigParse { line: 1, .. }));
    }

    #[test]
    fn test_lookup_falls_back_to_global_then_builtin() {
        let config = Config::from_text(SAMPLE).unwrap();

        assert_eq!(config.get("nb1", "editor"), Some("nano"));
        assert_eq!(config.get("nb1", "ext"), Some("txt"));
        assert_eq!(config.get("nb2", "ext"), Some("md"));
        assert_eq!(config.get("nb2", "datefmt"), Some("%Y-%m-%d"));
        assert_eq!(config.get("nb2", "max_list"), Some("-1"));
        assert_eq!(config.get("nb2", "template"), None);
    }

    #[test]
    fn test_non_blank_lookup_skips_empty_values() {
        let config = Config::from_text(
            "[global]\ndefault_title = entry\nmax_list =\n\n[nb]\ndefault_title\nmax_list = \n",
        )
        .unwrap();

        assert_eq!(config.get("nb", "default_title"), Some(""));
        assert_eq!(config.get_non_blank("nb", "default_title"), Some("entry"));
        assert_eq!(config.get_non_blank("nb", "max_list"), Some("-1"));
        assert_eq!(config.get_non_blank("nb", "template"), None);
    }

    #[test]
    fn test_global_is_not_a_notebook() {
        let config = Config::from_text(SAMPLE).unwrap();

        assert_eq!(config.notebooks(), vec!["nb1", "nb2"]);
        assert!(config.has_notebook("nb1"));
        assert!(!config.has_notebook("global"));
        assert!(!config.has_notebook("dne"));
    }

    #[test]
    fn test_expand_vars_with_lookup() {
        let vars: HashMap<&str, &str> = [("HOME", "/home/me"), ("NB", "work")].into();
        let lookup = |name: &str| vars.get(name).map(|v| v.to_string());

        assert_eq!(
            expand_vars_with("$HOME/notes/${NB}", lookup),
            "/home/me/notes/work"
        );
        assert_eq!(expand_vars_with("$UNSET/x ${ALSO_UNSET}", lookup), "$UNSET/x ${ALSO_UNSET}");
        assert_eq!(expand_vars_with("cost: 5$", lookup), "cost: 5$");
    }

    #[test]
    #[serial]
    fn test_locate_uses_env_var() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("snote.ini");
        std::fs::write(&path, "[nb]\npath = /tmp\n").unwrap();

        std::env::set_var(CONFIG_ENV_VAR, &path);
        let located = Config::locate();
        std::env::remove_var(CONFIG_ENV_VAR);

        assert_eq!(located.unwrap(), path);
    }

    #[test]
    #[serial]
    fn test_locate_missing_file_is_configuration_missing() {
        let temp = TempDir::new().unwrap();

        std::env::set_var(CONFIG_ENV_VAR, temp.path().join("absent.ini"));
        let located = Config::locate();
        std::env::remove_var(CONFIG_ENV_VAR);

        assert!(matches!(
            located,
            Err(SnoteError::ConfigurationMissing { .. })
        ));
    }

    #[test]
    #[serial]
    fn test_from_file_expands_environment() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("snote.ini");
        std::fs::write(&path, "[nb]\npath = ${SNOTE_TEST_ROOT}/nb\n").unwrap();

        std::env::set_var("SNOTE_TEST_ROOT", "/srv/notes");
        let config = Config::from_file(&path);
        std::env::remove_var("SNOTE_TEST_ROOT");

        let config = config.unwrap();
        assert_eq!(config.get("nb", "path"), Some("/srv/notes/nb"));
        assert_eq!(config.source(), Some(path.as_path()));
    }
}
