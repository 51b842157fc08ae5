// Entry point: renders the selected figures in order, stopping at the first failure.
use std::path::Path;
use std::process::ExitCode;

use casfig::cli::{Args, parse_figures};
use casfig::config::FigureConfig;
use clap::Parser;
use tracing::info;

fn main() -> ExitCode {
    casfig::init_tracing();
    let args = Args::parse();
    let figures = match parse_figures(&args.figures) {
        Ok(figures) => figures,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::from(2);
        }
    };

    let mut cfg = FigureConfig::load_or_default(Path::new(&args.config));
    if let Some(root) = args.root {
        cfg.paths.root = root;
    }

    for figure in figures {
        info!(figure = figure.label(), input = figure.input(), "rendering");
        if let Err(err) = figure.run(&cfg) {
            eprintln!("{} failed: {err}", figure.label());
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
