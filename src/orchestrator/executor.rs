//! External toolchain invocations for one module build step.
//!
//! Each module is configured and compiled by opaque external processes:
//! the build-configuration generator (`qmake`) consumes the module's
//! project file and emits a Makefile into the build directory; the
//! compiler driver (`make all`) consumes that Makefile and produces
//! binaries. Both run with the module's build directory as working
//! directory, block to completion, and inherit stdio so their own output
//! reaches the terminal unmodified. A non-zero exit from either is fatal.

use std::fs;
use std::io;
use std::process::{Command, ExitStatus};

use crate::error::BuildError;
use crate::models::{BuildPaths, ModuleSpec, TestSpec};

/// Seam to the external build tools.
///
/// Production uses [`QmakeToolchain`]; tests substitute fakes that record
/// the call sequence and inject failures at chosen steps.
pub trait Toolchain {
    /// Generate the module's build script in its build directory.
    fn configure(&self, module: &ModuleSpec, paths: &BuildPaths) -> Result<(), BuildError>;

    /// Compile everything the generated build script describes.
    fn compile(&self, module: &ModuleSpec, paths: &BuildPaths) -> Result<(), BuildError>;

    /// Execute the produced test binary with no arguments; its exit
    /// status is the suite's pass/fail signal.
    fn run_test_binary(&self, test: &TestSpec, paths: &BuildPaths) -> Result<(), BuildError>;
}

/// Create the module's build directory if missing.
///
/// A directory left over from a prior run is reused as-is; determinism
/// across repeated runs is the compiler driver's concern.
pub fn prepare_build_dir(paths: &BuildPaths) -> io::Result<()> {
    fs::create_dir_all(&paths.build_dir)
}

fn describe_status(tool: &str, status: ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("{} exited with status {}", tool, code),
        None => format!("{} terminated by signal", tool),
    }
}

/// Production toolchain wrapping qmake and make.
pub struct QmakeToolchain;

impl QmakeToolchain {
    pub fn new() -> Self {
        QmakeToolchain
    }
}

impl Default for QmakeToolchain {
    fn default() -> Self {
        QmakeToolchain::new()
    }
}

impl Toolchain for QmakeToolchain {
    fn configure(&self, module: &ModuleSpec, paths: &BuildPaths) -> Result<(), BuildError> {
        let status = Command::new("qmake")
            .arg(&paths.project_file)
            .current_dir(&paths.build_dir)
            .status()
            .map_err(|e| BuildError::ConfigureFailed {
                module: module.name.clone(),
                detail: format!("failed to execute qmake: {}", e),
                code: None,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(BuildError::ConfigureFailed {
                module: module.name.clone(),
                detail: describe_status("qmake", status),
                code: status.code(),
            })
        }
    }

    fn compile(&self, module: &ModuleSpec, paths: &BuildPaths) -> Result<(), BuildError> {
        let mut command = Command::new("make");
        command.arg("all");
        if let Some(jobs) = module.parallelism.jobs() {
            command.arg("-j").arg(jobs.to_string());
        }

        let status = command
            .current_dir(&paths.build_dir)
            .status()
            .map_err(|e| BuildError::CompileFailed {
                module: module.name.clone(),
                detail: format!("failed to execute make: {}", e),
                code: None,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(BuildError::CompileFailed {
                module: module.name.clone(),
                detail: describe_status("make", status),
                code: status.code(),
            })
        }
    }

    fn run_test_binary(&self, test: &TestSpec, paths: &BuildPaths) -> Result<(), BuildError> {
        let binary = paths.build_dir.join(&test.binary);

        let status = Command::new(&binary)
            .current_dir(&paths.build_dir)
            .status()
            .map_err(|e| BuildError::TestsFailed {
                detail: format!("failed to execute {}: {}", binary.display(), e),
                code: None,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(BuildError::TestsFailed {
                detail: describe_status(&binary.display().to_string(), status),
                code: status.code(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Parallelism;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_prepare_build_dir_is_idempotent() {
        let tempdir = tempfile::TempDir::new().unwrap();
        let paths = BuildPaths {
            project_file: PathBuf::from("unused.pro"),
            build_dir: tempdir.path().join("computeSynapses"),
        };
        prepare_build_dir(&paths).unwrap();
        assert!(paths.build_dir.is_dir());
        // Second run reuses the existing directory.
        prepare_build_dir(&paths).unwrap();
        assert!(paths.build_dir.is_dir());
    }

    #[test]
    fn test_configure_spawn_failure_has_no_exit_code() {
        // Point the working directory at a path that cannot exist so the
        // spawn itself fails rather than any tool running.
        let module = ModuleSpec::new("compareData", "compareData/compareData.pro", "compareData", Parallelism::Serial);
        let paths = BuildPaths {
            project_file: PathBuf::from("/nonexistent/compareData.pro"),
            build_dir: PathBuf::from("/nonexistent/build/compareData"),
        };
        let err = QmakeToolchain::new().configure(&module, &paths).unwrap_err();
        match err {
            BuildError::ConfigureFailed { module, code, .. } => {
                assert_eq!(module, "compareData");
                assert_eq!(code, None);
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_test_binary_path_joins_build_dir() {
        let test = TestSpec::new(
            ModuleSpec::new("test", "test/runTests.pro", "test", Parallelism::Jobs(4)),
            "release/runTests",
        );
        let paths = test
            .module
            .paths(Path::new("/repo/src"), Path::new("/repo/build"));
        assert_eq!(
            paths.build_dir.join(&test.binary),
            PathBuf::from("/repo/build/test/release/runTests")
        );
    }
}
