//! secrethunter scans filesystem trees for embedded secrets.
//!
//! The crate walks the requested paths, keeps the files whose content looks
//! like plain text, and runs one of three detection engines over every
//! line: regular-expression patterns, base64 payload inspection, or an
//! entropy classifier backed by empirical reference distributions. Scanning
//! runs on a bounded worker pool that cooperates with a CPU throttle gate
//! between pattern probes.

use std::sync::atomic::AtomicBool;

pub mod cli;
pub mod config;
pub mod constants;
pub mod discover;
pub mod engine;
pub mod entry_point;
pub mod error;
pub mod output;
pub mod patterns;
pub mod refdata;
pub mod report;
pub mod scanner;
pub mod throttle;

/// Set once the user interrupts the scan; checked at the pipeline's yield
/// points.
pub static CANCELLED: AtomicBool = AtomicBool::new(false);
