//! Monte Carlo vs linear-solver rare-event estimate.
use std::process::ExitCode;

use casfig::figures::Figure;

fn main() -> ExitCode {
    casfig::run_standalone(Figure::Fig3)
}
