//! Scan orchestrator: a bounded worker pool over the discovered file set.
//!
//! A feeder task fills the `jobs` channel, `W` workers pull paths and run
//! the selected engine line by line, and a single collector drains per-file
//! reports. Results arrive in completion order; within one file the line
//! numbers preserve source order.

use crossbeam_channel::bounded;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::thread;

use crate::engine::{Engine, Likelihood};
use crate::output::progress;
use crate::CANCELLED;

/// Capacity of the results channel between workers and the collector.
pub const RESULT_QUEUE_DEPTH: usize = 50;

/// A single suspected secret located in a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    pub kind: String,
    pub value: String,
    /// 1-based line number.
    pub line: usize,
    pub likelihood: Option<Likelihood>,
}

/// All secrets found in one file, keyed by 1-based line number.
#[derive(Debug)]
pub struct ScanReport {
    pub file: PathBuf,
    pub secrets: BTreeMap<usize, Vec<Secret>>,
}

impl ScanReport {
    #[must_use]
    pub fn secret_count(&self) -> usize {
        self.secrets.values().map(Vec::len).sum()
    }
}

/// Scans the files with a pool of `workers` threads and returns the
/// non-empty per-file reports together with the total secret count.
#[must_use]
pub fn scan_files(files: &[PathBuf], engine: &Engine, workers: usize) -> (Vec<ScanReport>, usize) {
    let workers = workers.max(1);
    let bar = progress::scan_progress_bar(files.len() as u64);
    let (jobs_tx, jobs_rx) = bounded::<PathBuf>(workers);
    let (results_tx, results_rx) = bounded::<ScanReport>(RESULT_QUEUE_DEPTH);

    let mut reports = Vec::new();
    let mut secrets_found = 0usize;

    thread::scope(|scope| {
        for _ in 0..workers {
            let jobs_rx = jobs_rx.clone();
            let results_tx = results_tx.clone();
            let bar = bar.clone();
            scope.spawn(move || {
                for file in jobs_rx {
                    if let Some(report) = scan_file(&file, engine) {
                        if results_tx.send(report).is_err() {
                            break;
                        }
                    }
                    bar.inc(1);
                }
            });
        }
        drop(results_tx);

        scope.spawn(move || {
            for file in files {
                if CANCELLED.load(Ordering::Relaxed) {
                    break;
                }
                if jobs_tx.send(file.clone()).is_err() {
                    break;
                }
            }
        });

        for report in results_rx.iter() {
            secrets_found += report.secret_count();
            reports.push(report);
        }
    });

    bar.finish_and_clear();
    (reports, secrets_found)
}

/// Scans one file line by line with the given engine.
///
/// Missing files are skipped silently; any other open error is logged and
/// the file is skipped. Lines that are not valid UTF-8 are decoded lossily
/// so the engines' ASCII checks still apply.
#[must_use]
pub fn scan_file(path: &Path, engine: &Engine) -> Option<ScanReport> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return None,
        Err(e) => {
            eprintln!("[!!] {}: {e}", path.display());
            return None;
        }
    };

    let mut reader = BufReader::new(file);
    let mut raw = Vec::new();
    let mut secrets: BTreeMap<usize, Vec<Secret>> = BTreeMap::new();
    let mut line_no = 0usize;

    loop {
        raw.clear();
        match reader.read_until(b'\n', &mut raw) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                eprintln!("[!!] {}: {e}", path.display());
                break;
            }
        }
        line_no += 1;
        while raw.last().is_some_and(|b| *b == b'\n' || *b == b'\r') {
            raw.pop();
        }
        let line = String::from_utf8_lossy(&raw);
        for finding in engine.scan_line(&line) {
            secrets.entry(line_no).or_default().push(Secret {
                kind: finding.kind,
                value: finding.value,
                line: line_no,
                likelihood: finding.likelihood,
            });
        }
    }

    if secrets.is_empty() {
        None
    } else {
        Some(ScanReport {
            file: path.to_path_buf(),
            secrets,
        })
    }
}
