//! Command-line front end for the secrethunter scanner.
//!
//! Delegates to the shared `entry_point::run_with_args()` function to keep
//! behavior identical across entry points.

use std::process::ExitCode;

fn main() -> ExitCode {
    match secrethunter::entry_point::run_with_args(std::env::args().skip(1).collect()) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
