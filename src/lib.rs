//! cortexbuild: build-and-test driver for the CortexInSilico tool suite.
//!
//! Automates the full suite build: ensures required system packages are
//! present, configures and compiles each native module in a fixed order
//! via the external qmake/make toolchain, then builds and executes the
//! consolidated test binary. The first failing step aborts the whole run.
//!
//! The system is organized into functional modules:
//! - **error**: unified error type hierarchy and exit-code mapping
//! - **models**: module descriptors and build-path resolution
//! - **config**: shared resources and the ordered suite build plan
//! - **logger**: stderr backend for the `log` facade
//! - **system**: host package preparation (environment preparer)
//! - **orchestrator**: pipeline state machine and external invocations

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod system;

// Re-export the log crate for macro usage
pub use log;

pub use config::SuiteConfig;
pub use error::{BuildError, DriverError, EnvError, Result, USAGE_EXIT_CODE};
pub use models::{BuildPaths, ModuleSpec, Parallelism, TestSpec};
pub use orchestrator::{
    DriverPhase, Orchestrator, PipelineState, QmakeToolchain, Toolchain,
};
pub use system::{ensure_packages, AptPackageManager, PackageManager};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
