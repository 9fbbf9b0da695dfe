//! Build orchestration: sequential pipeline over the suite's module list.
//!
//! One control thread, no internal concurrency: the orchestrator checks
//! the source-tree precondition, prepares the environment, then walks the
//! fixed module list in order, awaiting each external invocation to
//! completion. The test runner builds and executes last. The first failure
//! of any step stops the pipeline immediately; partially-built artifacts
//! are left in place.

pub mod executor;
pub mod state;

pub use executor::{prepare_build_dir, QmakeToolchain, Toolchain};
pub use state::{DriverPhase, PipelineState};

use std::fs;

use crate::config::SuiteConfig;
use crate::error::{DriverError, Result};
use crate::models::ModuleSpec;
use crate::system::{ensure_packages, PackageManager};

/// Sequences environment preparation, module builds, and the test runner.
pub struct Orchestrator<'a> {
    config: SuiteConfig,
    packages: &'a dyn PackageManager,
    toolchain: &'a dyn Toolchain,
    state: PipelineState,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: SuiteConfig,
        packages: &'a dyn PackageManager,
        toolchain: &'a dyn Toolchain,
    ) -> Self {
        let state = PipelineState::new(config.modules.len());
        Orchestrator {
            config,
            packages,
            toolchain,
            state,
        }
    }

    /// Current pipeline state, for inspection after (or during) a run.
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Run the whole pipeline to completion, fail-fast.
    ///
    /// On failure the state machine lands in its terminal phase
    /// (`UsageError` or `Failed`) and the first error is both recorded
    /// and returned.
    pub fn run(&mut self) -> Result<()> {
        match self.run_pipeline() {
            Ok(()) => Ok(()),
            Err(e) => {
                self.state.record_error(e.to_string());
                Err(e)
            }
        }
    }

    fn run_pipeline(&mut self) -> Result<()> {
        // Precondition: a known source root gates entry to environment
        // preparation. Without it, nothing is installed or created.
        if !self.config.source_tree_present() {
            self.state.transition_to(DriverPhase::UsageError)?;
            return Err(DriverError::SourceTreeMissing(
                self.config.source_dir_name().to_path_buf(),
            ));
        }

        self.state.transition_to(DriverPhase::PreparingEnvironment)?;
        fs::create_dir_all(&self.config.build_root)?;
        ensure_packages(self.packages, &self.config.packages)?;

        log::info!("[Build] Compiling suite modules");
        for index in 0..self.config.modules.len() {
            self.state.transition_to(DriverPhase::BuildingModule(index))?;
            let module = self.config.modules[index].clone();
            self.build_module(&module)?;
        }

        self.state.transition_to(DriverPhase::RunningTests)?;
        let test = self.config.test.clone();
        self.build_module(&test.module)?;

        log::info!("[Build] Running unit tests");
        let paths = test
            .module
            .paths(&self.config.src_dir, &self.config.build_root);
        self.toolchain.run_test_binary(&test, &paths)?;

        self.state.transition_to(DriverPhase::Completed)?;
        log::info!(
            "[Build] Pipeline completed in {:.1}s",
            self.state.elapsed_since_start().as_secs_f64()
        );
        Ok(())
    }

    /// One module build step: ensure the build directory, configure,
    /// compile. Both sub-steps run with the build directory as working
    /// directory.
    fn build_module(&mut self, module: &ModuleSpec) -> Result<()> {
        let paths = module.paths(&self.config.src_dir, &self.config.build_root);

        prepare_build_dir(&paths)?;
        log::info!("[Build] {}: configure", module.name);
        self.toolchain.configure(module, &paths)?;
        log::info!("[Build] {}: compile", module.name);
        self.toolchain.compile(module, &paths)?;
        Ok(())
    }
}
