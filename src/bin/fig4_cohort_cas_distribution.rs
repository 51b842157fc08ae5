//! Cohort CAS distribution.
use std::process::ExitCode;

use casfig::figures::Figure;

fn main() -> ExitCode {
    casfig::run_standalone(Figure::Fig4)
}
