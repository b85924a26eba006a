use crate::error::{GitContextError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file picked up from the working directory when none is named explicitly
pub const DEFAULT_CONFIG_FILE: &str = "gitcontext.toml";

/// Template used when the configuration does not provide one
pub const DEFAULT_TEMPLATE: &str = "\
=== File: #file_path ===
Name: #file_name
Size: #file_size bytes
Extension: #file_extension
Created: #file_creation_date
Modified: #file_modification_date
--- Content ---
#file_content
=== End of #file_name ===
";

/// Directories that almost never belong in a source context
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[
    "**/.git",
    "**/.svn",
    "**/.hg",
    "**/.idea",
    "**/.vscode",
    "**/node_modules",
    "**/target",
];

/// Configuration for a context run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Template applied to every eligible file
    pub template: String,
    /// Wildcard patterns for paths to skip
    pub exclude_patterns: Vec<String>,
    /// Where the rendered context goes
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output file; `None` prints to the console
    pub path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template: DEFAULT_TEMPLATE.to_string(),
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(ToString::to_string)
                .collect(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration.
    ///
    /// An explicit path must exist. Without one, `gitcontext.toml` in the
    /// current directory is used if present, else the built-in defaults.
    ///
    /// # Errors
    ///
    /// - `GitContextError::ConfigNotFound` if `explicit` names a missing file.
    /// - `GitContextError::ConfigParse` if the file is not valid configuration.
    /// - `GitContextError::ConfigurationMissing` if the template is empty.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.is_file() {
                    Self::from_file(fallback)?
                } else {
                    debug!("No {DEFAULT_CONFIG_FILE} found, using built-in defaults");
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads a TOML configuration file. Keys it omits keep their defaults.
    ///
    /// # Errors
    ///
    /// - `GitContextError::ConfigNotFound` if the file doesn't exist.
    /// - `GitContextError::Io` or `GitContextError::ConfigParse` on read/parse failure.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(GitContextError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        debug!("Reading configuration from {}", path.display());
        let raw = fs::read_to_string(path)?;
        Self::from_toml(&raw)
    }

    /// Parses configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns `GitContextError::ConfigParse` on invalid TOML or wrong value types.
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(Into::into)
    }

    /// Reads the template from a file, replacing the configured one
    ///
    /// # Errors
    ///
    /// Returns `GitContextError::Io` if the template file cannot be read.
    pub fn set_template_file(&mut self, path: &Path) -> Result<()> {
        self.template = fs::read_to_string(path)?;
        Ok(())
    }

    /// Checks the values a run cannot start without
    ///
    /// # Errors
    ///
    /// Returns `GitContextError::ConfigurationMissing` if the template is blank.
    pub fn validate(&self) -> Result<()> {
        if self.template.trim().is_empty() {
            return Err(GitContextError::ConfigurationMissing { field: "template" });
        }
        Ok(())
    }
}
