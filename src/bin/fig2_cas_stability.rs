//! CAS stability against Lmax.
use std::process::ExitCode;

use casfig::figures::Figure;

fn main() -> ExitCode {
    casfig::run_standalone(Figure::Fig2)
}
