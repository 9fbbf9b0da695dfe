//! Core data structures for the build pipeline.
//!
//! A `ModuleSpec` describes one independently buildable native program:
//! where its qmake project file lives under the source tree, which build
//! directory it owns under the build root, and how wide its compile step
//! may fan out. The suite is expressed as an ordered list of these values,
//! so the orchestrator iterates data instead of repeating code.

use std::path::{Path, PathBuf};

/// Compile-step fan-out for one module.
///
/// Carried as per-module data; the orchestrator never interprets it beyond
/// forwarding the resolved job count to the compiler driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parallelism {
    /// Plain `make all`, no job server.
    Serial,
    /// `make all -j <n>` with a fixed degree.
    Jobs(u32),
    /// `make all -j <cores>`, resolved from the host at invocation time.
    Auto,
}

impl Parallelism {
    /// Resolve to a concrete `-j` degree, or `None` for a serial build.
    pub fn jobs(&self) -> Option<u32> {
        match self {
            Parallelism::Serial => None,
            Parallelism::Jobs(n) => Some(*n),
            Parallelism::Auto => Some(num_cpus::get() as u32),
        }
    }
}

/// Descriptor for one buildable module of the suite.
///
/// Immutable once constructed; the orchestrator owns a fixed ordered list
/// of these for the run's duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSpec {
    /// Module name, used for logging and error reporting.
    pub name: String,
    /// qmake project file, relative to the source root.
    pub project_file: PathBuf,
    /// Build output directory, relative to the build root. Exclusively
    /// owned by this module for the run.
    pub build_subdir: PathBuf,
    /// Compile-step fan-out.
    pub parallelism: Parallelism,
}

impl ModuleSpec {
    pub fn new(
        name: &str,
        project_file: &str,
        build_subdir: &str,
        parallelism: Parallelism,
    ) -> Self {
        ModuleSpec {
            name: name.to_string(),
            project_file: PathBuf::from(project_file),
            build_subdir: PathBuf::from(build_subdir),
            parallelism,
        }
    }

    /// Resolve this module's absolute paths against the suite roots.
    pub fn paths(&self, src_dir: &Path, build_root: &Path) -> BuildPaths {
        BuildPaths {
            project_file: src_dir.join(&self.project_file),
            build_dir: build_root.join(&self.build_subdir),
        }
    }
}

/// Resolved filesystem locations for one module build step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaths {
    /// Absolute path of the qmake project file.
    pub project_file: PathBuf,
    /// Absolute path of the build output directory (working directory for
    /// both the configure and compile invocations).
    pub build_dir: PathBuf,
}

/// Descriptor for the test runner: a regular module build whose produced
/// binary is executed once the build succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestSpec {
    /// The test module itself, built like any other module.
    pub module: ModuleSpec,
    /// Produced test binary, relative to the module's build directory.
    /// Invoked with no arguments; its exit status gates overall success.
    pub binary: PathBuf,
}

impl TestSpec {
    pub fn new(module: ModuleSpec, binary: &str) -> Self {
        TestSpec {
            module,
            binary: PathBuf::from(binary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_resolves_to_no_jobs() {
        assert_eq!(Parallelism::Serial.jobs(), None);
    }

    #[test]
    fn test_fixed_jobs_resolve_verbatim() {
        assert_eq!(Parallelism::Jobs(4).jobs(), Some(4));
    }

    #[test]
    fn test_auto_resolves_to_at_least_one_job() {
        let jobs = Parallelism::Auto.jobs().expect("auto must resolve");
        assert!(jobs >= 1);
    }

    #[test]
    fn test_module_paths_join_roots() {
        let module = ModuleSpec::new(
            "convertInnervationToCSV",
            "convertInnervationToCSV/convertInnervationToCSV.pro",
            "convert",
            Parallelism::Jobs(4),
        );
        let paths = module.paths(Path::new("/repo/src"), Path::new("/repo/build"));
        assert_eq!(
            paths.project_file,
            PathBuf::from("/repo/src/convertInnervationToCSV/convertInnervationToCSV.pro")
        );
        assert_eq!(paths.build_dir, PathBuf::from("/repo/build/convert"));
    }
}
