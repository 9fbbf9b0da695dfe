//! Suite configuration: named shared resources and the fixed module list.
//!
//! Everything the pipeline touches on the host is reified here instead of
//! being read from ambient process state: the source and build roots, the
//! required system packages, and the ordered module descriptors. The test
//! runner lives in its own field so "the test module is always last" is a
//! structural property, not a list convention.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::{ModuleSpec, Parallelism, TestSpec};

/// Fixed-name source subdirectory expected under the repository root.
pub const SRC_DIR_NAME: &str = "src";

/// Fixed-name sibling directory created for build artifacts.
pub const BUILD_DIR_NAME: &str = "build";

/// Shared resources and the ordered build plan for one driver run.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Repository root (the directory containing `src`).
    pub repo_root: PathBuf,
    /// Source tree root: `<repo_root>/src`.
    pub src_dir: PathBuf,
    /// Artifact root: `<repo_root>/build`. Created on demand.
    pub build_root: PathBuf,
    /// System packages required before any build step, in install order.
    pub packages: Vec<String>,
    /// Ordered module descriptors. Built strictly in sequence.
    pub modules: Vec<ModuleSpec>,
    /// The test runner, built and executed after every module above.
    pub test: TestSpec,
}

impl SuiteConfig {
    /// Standard CortexInSilico suite rooted at `repo_root`.
    ///
    /// The module order and per-module job counts mirror the suite's build
    /// requirements; `convertInnervationToCSV` historically builds into
    /// `build/convert`.
    pub fn standard(repo_root: PathBuf) -> Self {
        let src_dir = repo_root.join(SRC_DIR_NAME);
        let build_root = repo_root.join(BUILD_DIR_NAME);

        let modules = vec![
            ModuleSpec::new(
                "computeSynapses",
                "computeSynapses/computeSynapses.pro",
                "computeSynapses",
                Parallelism::Serial,
            ),
            ModuleSpec::new(
                "compareData",
                "compareData/compareData.pro",
                "compareData",
                Parallelism::Serial,
            ),
            ModuleSpec::new(
                "networkSimulator",
                "networkSimulator/networkSimulator.pro",
                "networkSimulator",
                Parallelism::Serial,
            ),
            ModuleSpec::new(
                "convertAxonRedundancyMap",
                "convertAxonRedundancyMap/convertAxonRedundancyMap.pro",
                "convertAxonRedundancyMap",
                Parallelism::Serial,
            ),
            ModuleSpec::new(
                "convertSparseField",
                "convertSparseField/convertSparseField.pro",
                "convertSparseField",
                Parallelism::Serial,
            ),
            ModuleSpec::new(
                "computeStatistic",
                "computeStatistic/computeStatistic.pro",
                "computeStatistic",
                Parallelism::Serial,
            ),
            ModuleSpec::new(
                "processCIS3DQuery",
                "processCIS3DQuery/processCIS3DQuery.pro",
                "processCIS3DQuery",
                Parallelism::Jobs(4),
            ),
            ModuleSpec::new(
                "inputmapper",
                "inputmapper/inputmapper.pro",
                "inputmapper",
                Parallelism::Jobs(4),
            ),
            ModuleSpec::new(
                "convertInnervationToCSV",
                "convertInnervationToCSV/convertInnervationToCSV.pro",
                "convert",
                Parallelism::Jobs(4),
            ),
        ];

        let test = TestSpec::new(
            ModuleSpec::new("test", "test/runTests.pro", "test", Parallelism::Jobs(4)),
            "release/runTests",
        );

        SuiteConfig {
            repo_root,
            src_dir,
            build_root,
            packages: vec![
                "gcc".to_string(),
                "qt5-default".to_string(),
                "qt5-qmake".to_string(),
            ],
            modules,
            test,
        }
    }

    /// Standard suite rooted at the current working directory.
    pub fn locate() -> io::Result<Self> {
        Ok(SuiteConfig::standard(env::current_dir()?))
    }

    /// Whether the expected source tree is present under the root.
    ///
    /// This is the precondition gating entry to environment preparation;
    /// the orchestrator turns a `false` into a usage error before touching
    /// packages or the filesystem.
    pub fn source_tree_present(&self) -> bool {
        self.src_dir.is_dir()
    }

    /// Relative name of the missing source directory, for usage reporting.
    pub fn source_dir_name(&self) -> &Path {
        Path::new(SRC_DIR_NAME)
    }
}
