use cortexbuild::{
    AptPackageManager, DriverError, Orchestrator, QmakeToolchain, SuiteConfig,
};

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cd <suite repository root>    (the directory containing 'src')");
    eprintln!("  cortexbuild");
}

fn main() {
    // Logging first: everything after this reports through the log facade.
    cortexbuild::logger::initialize_logging();

    let config = match SuiteConfig::locate() {
        Ok(config) => config,
        Err(e) => {
            log::error!("[Driver] Failed to resolve working directory: {}", e);
            std::process::exit(1);
        }
    };

    let packages = AptPackageManager::new();
    let toolchain = QmakeToolchain::new();
    let mut orchestrator = Orchestrator::new(config, &packages, &toolchain);

    match orchestrator.run() {
        Ok(()) => {
            println!("Done.");
        }
        Err(e) => {
            log::error!("[Driver] {}", e);
            if matches!(e, DriverError::SourceTreeMissing(_)) {
                print_usage();
            }
            std::process::exit(e.exit_code());
        }
    }
}
