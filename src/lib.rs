pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod figures;

use std::path::Path;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use crate::config::{DEFAULT_CONFIG_PATH, FigureConfig};
use crate::figures::Figure;

/// Diagnostics go to stderr so stdout only carries the saved paths.
/// `RUST_LOG` overrides the default `warn` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Entry point shared by the single-figure binaries.
pub fn run_standalone(figure: Figure) -> ExitCode {
    init_tracing();
    let cfg = FigureConfig::load_or_default(Path::new(DEFAULT_CONFIG_PATH));
    match figure.run(&cfg) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} failed: {err}", figure.label());
            ExitCode::FAILURE
        }
    }
}
