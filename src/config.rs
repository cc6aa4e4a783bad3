//! Configuration loading and parsing for `release-notes.toml` files.
//!
//! Every key is optional. Values given on the command line take precedence.
use std::{fs, io, path::Path};

use log::*;
use serde::Deserialize;

use crate::{
    changelog::{
        renderer::DEFAULT_TEMPLATE,
        section::{SectionRule, default_rules},
    },
    error::{ReleaseNotesError, Result},
    forge::config::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE},
};

/// Default configuration filename.
pub const DEFAULT_CONFIG_FILE: &str = "release-notes.toml";

/// Root configuration structure for `release-notes.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Repository URL (https://github.com/owner/repo).
    pub repo: Option<String>,
    /// Branch expression whose history is walked (default: HEAD).
    pub branch: Option<String>,
    /// Commits requested per history page (1-100).
    pub page_size: u8,
    /// Renders the contributor count sentence.
    pub show_contributors: bool,
    /// Omits sections without lines instead of rendering a bare header.
    pub skip_empty_sections: bool,
    /// Tera template overriding the default snippet layout.
    pub template: String,
    /// Ordered label routing rules. The first match wins.
    #[serde(rename = "rule")]
    pub rules: Vec<SectionRule>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            repo: None,
            branch: None,
            page_size: DEFAULT_PAGE_SIZE,
            show_contributors: true,
            skip_empty_sections: false,
            template: DEFAULT_TEMPLATE.into(),
            rules: default_rules(),
        }
    }
}

impl Config {
    /// Loads `path` when given, otherwise `release-notes.toml` from the
    /// working directory if it exists. An explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound && !explicit => {
                debug!("no configuration found: using default");
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(ReleaseNotesError::Io(io::Error::new(
                    err.kind(),
                    format!("failed to read {}: {err}", path.display()),
                )));
            }
        };

        info!("loading configuration from {}", path.display());

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(ReleaseNotesError::invalid_config(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }

        if let Some(rule) = self.rules.iter().find(|r| r.labels.is_empty()) {
            return Err(ReleaseNotesError::invalid_config(format!(
                "rule for section {:?} must list at least one label",
                rule.section
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::changelog::section::Section;

    #[test]
    fn loads_defaults() {
        let config = Config::default();
        assert!(config.repo.is_none());
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert!(config.show_contributors);
        assert!(!config.skip_empty_sections);
        assert_eq!(config.template, DEFAULT_TEMPLATE);
        assert_eq!(config.rules, default_rules());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.rules, default_rules());
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn parses_all_keys() {
        let config = Config::parse(
            r#"
repo = "https://github.com/example/project"
branch = "main"
page_size = 50
show_contributors = false
skip_empty_sections = true
template = "{{ new_version }}"

[[rule]]
labels = ["security"]
section = "security"

[[rule]]
labels = ["bug", "table"]
section = "table"
"#,
        )
        .unwrap();

        assert_eq!(
            config.repo.as_deref(),
            Some("https://github.com/example/project")
        );
        assert_eq!(config.branch.as_deref(), Some("main"));
        assert_eq!(config.page_size, 50);
        assert!(!config.show_contributors);
        assert!(config.skip_empty_sections);
        assert_eq!(config.template, "{{ new_version }}");
        assert_eq!(
            config.rules,
            vec![
                SectionRule::new(&["security"], Section::Security),
                SectionRule::new(&["bug", "table"], Section::Table),
            ]
        );
    }

    #[test]
    fn rejects_out_of_range_page_size() {
        for size in ["0", "101"] {
            let err =
                Config::parse(&format!("page_size = {size}")).unwrap_err();
            assert!(matches!(err, ReleaseNotesError::InvalidConfig(_)));
        }
    }

    #[test]
    fn rejects_rule_without_labels() {
        let err = Config::parse(
            r#"
[[rule]]
labels = []
section = "build"
"#,
        )
        .unwrap_err();

        assert!(matches!(err, ReleaseNotesError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_unknown_section() {
        let err = Config::parse(
            r#"
[[rule]]
labels = ["x"]
section = "miscellaneous"
"#,
        )
        .unwrap_err();

        assert!(matches!(err, ReleaseNotesError::TomlParseError(_)));
    }

    #[test]
    fn loads_explicit_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"branch = \"master\"\n").unwrap();

        let config = Config::load(Some(file.path())).unwrap();

        assert_eq!(config.branch.as_deref(), Some("master"));
    }

    #[test]
    fn missing_explicit_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err =
            Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();

        assert!(matches!(err, ReleaseNotesError::Io(_)));
    }
}
