//! Mechanism sensitivity heatmaps and interaction residual.
use std::process::ExitCode;

use casfig::figures::Figure;

fn main() -> ExitCode {
    casfig::run_standalone(Figure::Fig6)
}
