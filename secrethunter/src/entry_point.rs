//! Shared entry point used by the binaries and the integration tests.

mod run;

pub use run::{run_with_args, run_with_args_to};
