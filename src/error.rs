use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gitcontext operations
#[derive(Error, Debug)]
pub enum GitContextError {
    /// IO error when reading files or directories
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// File not found error with specific path
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The directory to walk does not exist
    #[error("Directory does not exist: {path}")]
    RootNotFound { path: PathBuf },

    /// An explicitly requested configuration file is missing
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// A required configuration value is absent or empty
    #[error("Missing configuration value: {field}")]
    ConfigurationMissing { field: &'static str },

    /// Configuration file is not valid TOML for the expected schema
    #[error("Invalid configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Exclusion pattern could not be turned into a matcher
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Regex compilation error
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// `WalkDir` error when traversing directories
    #[error("Directory traversal error: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GitContextError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GitContextError::FileNotFound {
            path: PathBuf::from("/test/file.txt"),
        };
        assert_eq!(format!("{err}"), "File not found: /test/file.txt");

        let err = GitContextError::RootNotFound {
            path: PathBuf::from("/test/repo"),
        };
        assert_eq!(format!("{err}"), "Directory does not exist: /test/repo");

        let err = GitContextError::ConfigNotFound {
            path: PathBuf::from("gitcontext.toml"),
        };
        assert_eq!(
            format!("{err}"),
            "Configuration file not found: gitcontext.toml"
        );

        let err = GitContextError::ConfigurationMissing { field: "template" };
        assert_eq!(format!("{err}"), "Missing configuration value: template");
    }

    #[test]
    fn test_invalid_pattern_display() {
        let source = regex::Regex::new("(").unwrap_err();
        let err = GitContextError::InvalidPattern {
            pattern: "(".to_string(),
            source,
        };
        assert!(format!("{err}").starts_with("Invalid exclude pattern '(':"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "test");
        let err: GitContextError = io_err.into();
        assert!(matches!(err, GitContextError::Io(_)));
    }

    #[test]
    fn test_error_from_toml() {
        let toml_err = toml::from_str::<toml::Table>("template = ").unwrap_err();
        let err: GitContextError = toml_err.into();
        assert!(matches!(err, GitContextError::ConfigParse(_)));
    }

    #[test]
    fn test_error_from_walkdir() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing");
        let walk_err = walkdir::WalkDir::new(&missing)
            .into_iter()
            .next()
            .unwrap()
            .unwrap_err();
        let err: GitContextError = walk_err.into();
        assert!(matches!(err, GitContextError::WalkDir(_)));
        assert!(format!("{err}").starts_with("Directory traversal error:"));
        assert!(format!("{err}").contains("missing"));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: GitContextError = json_err.into();
        assert!(matches!(err, GitContextError::Json(_)));
    }
}
