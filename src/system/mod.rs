//! System module: host package preparation with validated command inputs.
//!
//! The environment preparer ensures the suite's required packages are
//! present before any build step runs: query the installed state, skip
//! what is already there, install the rest with elevated privilege. All
//! package names are validated before any OS command is spawned.

use once_cell::sync::Lazy;
use regex::Regex;
use std::process::Command;

use crate::error::EnvError;

/// Debian package naming rules: lowercase alphanumeric start, then
/// alphanumerics, `.`, `+`, `-`. Anything else is rejected before a
/// command line is ever assembled.
static PACKAGE_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9.+-]*$").expect("package name pattern"));

/// Validate a package name against Debian naming rules.
pub fn validate_package_name(name: &str) -> Result<(), EnvError> {
    if PACKAGE_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(EnvError::InvalidPackageName(name.to_string()))
    }
}

/// Seam to the host package database.
///
/// Production uses [`AptPackageManager`]; tests substitute a fake that
/// records the exact query/install sequence.
pub trait PackageManager {
    /// Whether the package is currently installed. A failed query counts
    /// as not installed and routes to an install attempt.
    fn is_installed(&self, package: &str) -> bool;

    /// Install the package via the host package manager. Failure is fatal
    /// to the whole orchestration.
    fn install(&self, package: &str) -> Result<(), EnvError>;
}

/// Production package manager wrapping dpkg and apt-get.
pub struct AptPackageManager;

impl AptPackageManager {
    pub fn new() -> Self {
        AptPackageManager
    }
}

impl Default for AptPackageManager {
    fn default() -> Self {
        AptPackageManager::new()
    }
}

impl PackageManager for AptPackageManager {
    fn is_installed(&self, package: &str) -> bool {
        // dpkg -s prints a control record for installed packages; capture
        // it instead of inheriting so a missing package stays quiet.
        match Command::new("dpkg").args(["-s", "--"]).arg(package).output() {
            Ok(output) => {
                output.status.success()
                    && String::from_utf8_lossy(&output.stdout)
                        .lines()
                        .any(|line| line.trim() == "Status: install ok installed")
            }
            Err(e) => {
                log::warn!("[Env] dpkg query for {} failed: {}", package, e);
                false
            }
        }
    }

    fn install(&self, package: &str) -> Result<(), EnvError> {
        validate_package_name(package)?;

        // Inherit stdio so apt's own prompts and errors reach the
        // terminal unmodified. `--` closes the flag list.
        let status = Command::new("sudo")
            .args(["apt-get", "install", "--yes", "--"])
            .arg(package)
            .status()
            .map_err(|e| EnvError::InstallFailed {
                package: package.to_string(),
                detail: format!("failed to execute apt-get: {}", e),
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(EnvError::InstallFailed {
                package: package.to_string(),
                detail: match status.code() {
                    Some(code) => format!("apt-get exited with status {}", code),
                    None => "apt-get terminated by signal".to_string(),
                },
            })
        }
    }
}

/// Ensure every named package is present, in order.
///
/// Already-installed packages are skipped; absent ones (or ones whose
/// query failed) are installed. The first install failure aborts.
pub fn ensure_packages(
    manager: &dyn PackageManager,
    packages: &[String],
) -> Result<(), EnvError> {
    for package in packages {
        validate_package_name(package)?;
        if manager.is_installed(package) {
            log::info!("[Env] {} already available", package);
            continue;
        }
        log::info!("[Env] Installing {}", package);
        manager.install(package)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// Fake package database recording the query/install call sequence.
    struct FakeManager {
        installed: HashSet<String>,
        failing: HashSet<String>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeManager {
        fn new(installed: &[&str], failing: &[&str]) -> Self {
            FakeManager {
                installed: installed.iter().map(|s| s.to_string()).collect(),
                failing: failing.iter().map(|s| s.to_string()).collect(),
                calls: RefCell::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl PackageManager for FakeManager {
        fn is_installed(&self, package: &str) -> bool {
            self.calls.borrow_mut().push(format!("query {}", package));
            self.installed.contains(package)
        }

        fn install(&self, package: &str) -> Result<(), EnvError> {
            self.calls.borrow_mut().push(format!("install {}", package));
            if self.failing.contains(package) {
                Err(EnvError::InstallFailed {
                    package: package.to_string(),
                    detail: "apt-get exited with status 100".to_string(),
                })
            } else {
                Ok(())
            }
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_installed_packages_trigger_no_install() {
        let manager = FakeManager::new(&["gcc", "qt5-qmake"], &[]);
        ensure_packages(&manager, &names(&["gcc", "qt5-qmake"])).unwrap();
        assert_eq!(manager.calls(), vec!["query gcc", "query qt5-qmake"]);
    }

    #[test]
    fn test_absent_packages_are_installed_in_order() {
        let manager = FakeManager::new(&["gcc"], &[]);
        ensure_packages(&manager, &names(&["gcc", "qt5-default", "qt5-qmake"])).unwrap();
        assert_eq!(
            manager.calls(),
            vec![
                "query gcc",
                "query qt5-default",
                "install qt5-default",
                "query qt5-qmake",
                "install qt5-qmake",
            ]
        );
    }

    #[test]
    fn test_install_failure_stops_the_sequence() {
        let manager = FakeManager::new(&[], &["qt5-default"]);
        let err = ensure_packages(&manager, &names(&["qt5-default", "qt5-qmake"])).unwrap_err();
        assert!(matches!(err, EnvError::InstallFailed { ref package, .. } if package == "qt5-default"));
        // qt5-qmake was never queried or installed.
        assert_eq!(
            manager.calls(),
            vec!["query qt5-default", "install qt5-default"]
        );
    }

    #[test]
    fn test_invalid_name_rejected_before_any_command() {
        let manager = FakeManager::new(&[], &[]);
        let err = ensure_packages(&manager, &names(&["gcc; rm -rf /"])).unwrap_err();
        assert!(matches!(err, EnvError::InvalidPackageName(_)));
        assert!(manager.calls().is_empty());
    }

    #[test]
    fn test_suite_package_names_are_valid() {
        for name in ["gcc", "qt5-default", "qt5-qmake", "g++", "libc6.1"] {
            validate_package_name(name).unwrap();
        }
    }

    proptest! {
        #[test]
        fn prop_wellformed_names_accepted(name in "[a-z0-9][a-z0-9.+-]{0,30}") {
            prop_assert!(validate_package_name(&name).is_ok());
        }

        #[test]
        fn prop_shell_metacharacters_rejected(
            name in "[a-z]{1,8}[;&|$ `'\"(){}<>!][a-z]{0,8}"
        ) {
            prop_assert!(validate_package_name(&name).is_err());
        }
    }
}
