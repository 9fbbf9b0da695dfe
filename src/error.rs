//! Unified error type hierarchy for the suite build driver
//!
//! Provides structured error handling with EnvError for environment
//! preparation, BuildError for per-module build steps, and DriverError as
//! the top-level type surfaced by the orchestrator.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Environment preparation errors (host package management).
#[derive(Error, Debug)]
pub enum EnvError {
    #[error("Package name contains invalid characters: {0}")]
    InvalidPackageName(String),

    #[error("Installation of package '{package}' failed: {detail}")]
    InstallFailed { package: String, detail: String },
}

/// Module build step errors.
///
/// Each variant carries the failing child's exit code when one is
/// available, so the driver can propagate it as its own exit status.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Configure step failed for module '{module}': {detail}")]
    ConfigureFailed {
        module: String,
        detail: String,
        code: Option<i32>,
    },

    #[error("Compile step failed for module '{module}': {detail}")]
    CompileFailed {
        module: String,
        detail: String,
        code: Option<i32>,
    },

    #[error("Test binary reported failures: {detail}")]
    TestsFailed { detail: String, code: Option<i32> },
}

impl BuildError {
    /// Exit code of the failing child process, if it exited normally.
    pub fn child_code(&self) -> Option<i32> {
        match self {
            BuildError::ConfigureFailed { code, .. } => *code,
            BuildError::CompileFailed { code, .. } => *code,
            BuildError::TestsFailed { code, .. } => *code,
        }
    }
}

/// Exit code for usage errors (source tree missing).
pub const USAGE_EXIT_CODE: i32 = 2;

/// Top-level error type surfaced by the driver.
#[derive(Error, Debug)]
pub enum DriverError {
    /// The fixed-name source directory was not found under the working
    /// directory. Usage error; nothing has been installed or built.
    #[error("Cannot find directory '{}'. Are you in the repository root?", .0.display())]
    SourceTreeMissing(PathBuf),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Invalid pipeline phase transition. Indicates a sequencing bug in
    /// the orchestrator itself, never an external failure.
    #[error("Invalid pipeline transition: {0}")]
    Phase(String),
}

impl DriverError {
    /// Map this error to the process exit code.
    ///
    /// Usage errors get a fixed distinct code; build failures propagate
    /// the failing child's own exit code when it is known.
    pub fn exit_code(&self) -> i32 {
        match self {
            DriverError::SourceTreeMissing(_) => USAGE_EXIT_CODE,
            DriverError::Build(e) => e.child_code().unwrap_or(1),
            _ => 1,
        }
    }
}

/// Top-level result type for driver operations.
pub type Result<T> = std::result::Result<T, DriverError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_error_display() {
        let err = EnvError::InstallFailed {
            package: "qt5-qmake".to_string(),
            detail: "apt-get exited with status 100".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Installation of package 'qt5-qmake' failed: apt-get exited with status 100"
        );
    }

    #[test]
    fn test_build_error_display() {
        let err = BuildError::ConfigureFailed {
            module: "computeSynapses".to_string(),
            detail: "qmake exited with status 2".to_string(),
            code: Some(2),
        };
        assert_eq!(
            err.to_string(),
            "Configure step failed for module 'computeSynapses': qmake exited with status 2"
        );
    }

    #[test]
    fn test_usage_error_exit_code() {
        let err = DriverError::SourceTreeMissing(PathBuf::from("src"));
        assert_eq!(err.exit_code(), USAGE_EXIT_CODE);
    }

    #[test]
    fn test_build_error_propagates_child_code() {
        let err = DriverError::Build(BuildError::CompileFailed {
            module: "inputmapper".to_string(),
            detail: "make exited with status 2".to_string(),
            code: Some(2),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_build_error_without_code_falls_back() {
        let err = DriverError::Build(BuildError::TestsFailed {
            detail: "terminated by signal".to_string(),
            code: None,
        });
        assert_eq!(err.exit_code(), 1);
    }
}
