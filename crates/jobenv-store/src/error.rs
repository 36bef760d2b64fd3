//! Error types for the environment store
//!
//! Provides error handling for:
//! - Load operations (environment file and configuration file → `Environment`)
//! - Persist operations (`Environment` → environment file)
//! - Extension keys that would shadow a typed field

use std::fmt;
use std::path::PathBuf;

/// Which of the two files a load error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// The persisted `env` file inside a result directory
    Environment,
    /// The user-editable configuration file named by `config_file`
    Configuration,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Environment => f.write_str("environment"),
            Self::Configuration => f.write_str("configuration"),
        }
    }
}

/// Errors while loading an environment (ingress)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File exists but is not valid structured data of the expected shape
    #[error("malformed {kind} file {path}: {message}")]
    Malformed {
        /// File the error refers to
        kind: FileKind,
        /// Path that was read
        path: PathBuf,
        /// Parser or shape error
        message: String,
    },

    /// File exists but could not be read
    #[error("io error reading {kind} file {path}: {source}")]
    Io {
        /// File the error refers to
        kind: FileKind,
        /// Path that was read
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create malformed-content error for path
    pub fn malformed(kind: FileKind, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Malformed {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create IO error for path
    pub fn io_error(kind: FileKind, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            kind,
            path: path.into(),
            source,
        }
    }

    /// The file the error refers to
    #[must_use]
    pub fn kind(&self) -> FileKind {
        match self {
            Self::Malformed { kind, .. } | Self::Io { kind, .. } => *kind,
        }
    }
}

/// Errors while writing an environment back out (egress)
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// The environment could not be rendered as YAML
    #[error("failed to serialize environment: {0}")]
    Serialize(String),

    /// IO error during file write
    #[error("io error writing {path}: {source}")]
    Io {
        /// Path of the `env` file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
}

impl PersistError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Extension key that names one of the typed environment fields
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is a reserved environment key")]
pub struct ReservedKeyError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display_names_kind_and_path() {
        let err = ConfigError::malformed(FileKind::Configuration, "/tmp/job.yaml", "expected a mapping");
        assert_eq!(
            err.to_string(),
            "malformed configuration file /tmp/job.yaml: expected a mapping"
        );
        assert_eq!(err.kind(), FileKind::Configuration);
    }

    #[test]
    fn io_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ConfigError::io_error(FileKind::Environment, "/tmp/res/env", io);
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("environment file"));
    }

    #[test]
    fn reserved_key_display() {
        let err = ReservedKeyError("phase".to_string());
        assert_eq!(err.to_string(), "'phase' is a reserved environment key");
    }
}
