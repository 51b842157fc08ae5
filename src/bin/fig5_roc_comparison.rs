//! ROC comparison with and without CAS.
use std::process::ExitCode;

use casfig::figures::Figure;

fn main() -> ExitCode {
    casfig::run_standalone(Figure::Fig5)
}
