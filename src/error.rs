//! Error types for Rejig operations.
//!
//! This module defines [`RejigError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `RejigError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `RejigError::Other`) for unexpected errors
//! - Every component returns the first fatal error it encounters; only
//!   options validation accumulates multiple messages before returning

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Rejig operations.
#[derive(Debug, Error)]
pub enum RejigError {
    /// Failed to parse the application options file.
    #[error("Failed to parse options file at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Aggregate of application option violations found during validation.
    #[error("Invalid application options:\n\t{}", .messages.join("\n\t"))]
    Validation { messages: Vec<String> },

    /// Referenced template alias does not exist in the registry or any inventory.
    #[error("Template not found in application inventory: {alias}")]
    UnknownTemplate { alias: String },

    /// Template alias contains more than one namespace separator.
    #[error("Invalid template alias: {alias}")]
    InvalidAlias { alias: String },

    /// Template manifest file missing from the template root.
    #[error("Manifest file not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// Template manifest file exists but contains malformed YAML.
    #[error("Failed to parse manifest at {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// Remote template source unreachable or clone failed.
    #[error("Failed to fetch '{source_url}': {message}")]
    Fetch { source_url: String, message: String },

    /// Failed to read a parameter value from the input stream.
    #[error("Failed reading user input: {message}")]
    Input { message: String },

    /// Template syntax or evaluation failure while rendering a tree entry.
    #[error("Template error in '{path}': {source}")]
    TemplateSyntax {
        path: PathBuf,
        #[source]
        source: tera::Error,
    },

    /// I/O failure while rendering a tree entry.
    #[error("Failed to render '{path}': {source}")]
    RenderIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Output directory exists and is not empty.
    #[error("Path must be empty: {path}")]
    PathNotEmpty { path: PathBuf },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Rejig operations.
pub type Result<T> = std::result::Result<T, RejigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_template_displays_alias() {
        let err = RejigError::UnknownTemplate {
            alias: "nonexistent".into(),
        };
        assert!(err.to_string().contains("nonexistent"));
    }

    #[test]
    fn invalid_alias_displays_alias() {
        let err = RejigError::InvalidAlias {
            alias: "a.b.c".into(),
        };
        assert!(err.to_string().contains("a.b.c"));
    }

    #[test]
    fn validation_joins_single_message() {
        let err = RejigError::Validation {
            messages: vec!["template 0 name is undefined".into()],
        };
        assert!(err.to_string().contains("template 0 name is undefined"));
    }

    #[test]
    fn validation_joins_all_messages() {
        let err = RejigError::Validation {
            messages: vec!["first problem".into(), "second problem".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("first problem"));
        assert!(msg.contains("second problem"));
    }

    #[test]
    fn manifest_not_found_displays_path() {
        let err = RejigError::ManifestNotFound {
            path: PathBuf::from("/tmp/tpl/.rejig.yml"),
        };
        assert!(err.to_string().contains("/tmp/tpl/.rejig.yml"));
    }

    #[test]
    fn fetch_displays_source_and_message() {
        let err = RejigError::Fetch {
            source_url: "https://example.com/repo.git".into(),
            message: "connection refused".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("https://example.com/repo.git"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn render_io_displays_offending_path() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = RejigError::RenderIo {
            path: PathBuf::from("src/main.txt"),
            source: io,
        };
        assert!(err.to_string().contains("src/main.txt"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: RejigError = io_err.into();
        assert!(matches!(err, RejigError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(RejigError::Input {
                message: "test".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}
