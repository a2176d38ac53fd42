//! Validation of user-provided options.
//!
//! Values with a defined fallback (throttling ceiling, CPU count) warn and
//! fall back; unusable paths are skipped with a warning so one bad argument
//! never aborts a scan.

use colored::Colorize;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;

/// Default CPU ceiling percentage applied when the requested value is out of
/// range.
pub const DEFAULT_CPU_CEILING: u8 = 65;

/// Lowest accepted CPU ceiling percentage.
pub const MIN_CPU_CEILING: u8 = 10;

/// Highest accepted CPU ceiling percentage.
pub const MAX_CPU_CEILING: u8 = 80;

/// Clamps the throttling ceiling into its accepted range, warning on
/// fallback.
#[must_use]
pub fn validate_throttling(requested: u8) -> u8 {
    if (MIN_CPU_CEILING..=MAX_CPU_CEILING).contains(&requested) {
        requested
    } else {
        eprintln!(
            "{}",
            format!(
                "[!!] Provided maximum CPU usage {requested} is not in the range from {MIN_CPU_CEILING} to {MAX_CPU_CEILING}. Defaulting to {DEFAULT_CPU_CEILING}."
            )
            .yellow()
        );
        DEFAULT_CPU_CEILING
    }
}

/// Validates the worker count against the machine, warning on fallback.
#[must_use]
pub fn validate_cpu(requested: Option<usize>) -> usize {
    let available = num_cpus::get();
    match requested {
        None => available,
        Some(count) if count >= 1 && count <= available => count,
        Some(count) => {
            eprintln!(
                "{}",
                format!(
                    "[!!] Provided number of {count} vCPUs is not valid. Defaulting to the number of vCPUs on the system ({available} vCPUs)."
                )
                .yellow()
            );
            available
        }
    }
}

/// Expands the exclusions flag into a list of regex patterns.
///
/// The flag is a comma-separated list; an item naming a readable file
/// contributes its lines as patterns instead. An empty flag selects the
/// default exclusion set.
#[must_use]
pub fn exclusion_patterns(flag: &str) -> Vec<String> {
    if flag.trim().is_empty() {
        return constants::default_exclusions()
            .iter()
            .map(|pattern| (*pattern).to_owned())
            .collect();
    }

    let mut patterns = Vec::new();
    for item in flag.split(',').map(str::trim).filter(|item| !item.is_empty()) {
        if Path::new(item).is_file() {
            if let Ok(text) = fs::read_to_string(item) {
                patterns.extend(
                    text.lines()
                        .map(str::trim)
                        .filter(|line| !line.is_empty())
                        .map(str::to_owned),
                );
            }
        } else {
            patterns.push(item.to_owned());
        }
    }
    patterns
}

/// Compiles exclusion patterns, skipping broken ones with a warning.
#[must_use]
pub fn compile_exclusions(patterns: &[String]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(e) => {
                eprintln!(
                    "{}",
                    format!("[!!] Skipping exclusion pattern {pattern:?}: {e}").yellow()
                );
                None
            }
        })
        .collect()
}

/// Sorts the requested paths into directories and regular files, resolving
/// relative paths against the working directory and dropping anything
/// inaccessible with a warning.
#[must_use]
pub fn resolve_paths(paths: &[String]) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut directories = Vec::new();
    let mut files = Vec::new();
    for raw in paths {
        let mut path = PathBuf::from(raw);
        if path.is_relative() {
            if let Ok(cwd) = std::env::current_dir() {
                path = cwd.join(path);
            }
        }
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => directories.push(path),
            Ok(meta) if meta.is_file() => files.push(path),
            Ok(_) => eprintln!(
                "{}",
                format!(
                    "[!!] Provided path {} is not a directory nor a file. Skipping.",
                    path.display()
                )
                .yellow()
            ),
            Err(e) => eprintln!(
                "{}",
                format!(
                    "[!!] Provided path {} cannot be accessed due to error: {e}. Skipping.",
                    path.display()
                )
                .yellow()
            ),
        }
    }
    (directories, files)
}
