use std::io;
use std::process::ExitCode;
use tracing::{error, info};
use library_manager::core::domain::Configuration;
use library_manager::core::repository::RepositoryStore;
use library_manager::library::factory::create_library_service;
use library_manager::shell::controller::Shell;
use library_manager::utils::logging::setup_tracing;

// Data files are read from LMS_DATA_DIR (default: working directory).
// Set LMS_STORE=memory to run without touching the filesystem.

fn main() -> ExitCode {
    setup_tracing();

    let config = Configuration::from_env();
    let store = match std::env::var("LMS_STORE").as_deref() {
        Ok("memory") => RepositoryStore::InMemory,
        _ => RepositoryStore::Csv,
    };
    info!(data_dir = %config.data_dir.display(), ?store, "starting library");

    let svc = match create_library_service(&config, store) {
        Ok(svc) => svc,
        Err(err) => {
            error!(%err, "failed to load library");
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let mut shell = Shell::new(svc, stdin.lock(), io::stdout());
    if let Err(err) = shell.run() {
        error!(%err, "shell terminated");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
