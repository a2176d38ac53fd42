//! Main binary entry point for the secrethunter scanner.
//!
//! Delegates to the shared `entry_point::run_with_args()` function so the
//! standalone binary and the CLI front end behave identically.

use std::process::ExitCode;
use std::sync::atomic::Ordering;

use secrethunter::{entry_point, CANCELLED};

extern "C" fn handle_interrupt(_signal: libc::c_int) {
    CANCELLED.store(true, Ordering::SeqCst);
}

fn main() -> ExitCode {
    let handler: extern "C" fn(libc::c_int) = handle_interrupt;
    unsafe {
        libc::signal(libc::SIGINT, handler as libc::sighandler_t);
    }

    match entry_point::run_with_args(std::env::args().skip(1).collect()) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
