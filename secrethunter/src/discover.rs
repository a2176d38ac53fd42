//! File discovery: walks directory trees, applies path exclusions and keeps
//! only the files whose content looks like plain text.
//!
//! The walk itself is serial; MIME sniffing runs on a pool of workers fed
//! through a bounded channel. Result order is not defined.

use crossbeam_channel::bounded;
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::thread;
use walkdir::WalkDir;

use crate::output::progress;
use crate::CANCELLED;

const SNIFF_LEN: usize = 8192;
const FOUND_QUEUE_DEPTH: usize = 1000;

/// Outcome of walking one root directory.
#[derive(Debug)]
pub struct Discovery {
    /// Plain-text files eligible for scanning.
    pub files: Vec<PathBuf>,
    /// Paths skipped because they matched an exclusion pattern.
    pub excluded: Vec<String>,
}

/// Walks `root` and returns the plain-text files under it, honouring the
/// exclusion patterns. Per-entry errors skip the entry; the walk never
/// aborts.
#[must_use]
pub fn find_text_files(root: &Path, exclusions: &[Regex], workers: usize) -> Discovery {
    let workers = workers.max(1);
    let spinner = progress::discovery_spinner();
    let (jobs_tx, jobs_rx) = bounded::<PathBuf>(workers);
    let (found_tx, found_rx) = bounded::<PathBuf>(FOUND_QUEUE_DEPTH);

    let mut discovery = Discovery {
        files: Vec::new(),
        excluded: Vec::new(),
    };

    thread::scope(|scope| {
        for _ in 0..workers {
            let jobs_rx = jobs_rx.clone();
            let found_tx = found_tx.clone();
            scope.spawn(move || {
                for path in jobs_rx {
                    if is_plain_text(&path) && found_tx.send(path).is_err() {
                        break;
                    }
                }
            });
        }
        drop(found_tx);

        let collector = scope.spawn(|| found_rx.iter().collect::<Vec<PathBuf>>());

        let mut entries = WalkDir::new(root).into_iter();
        while let Some(entry) = entries.next() {
            if CANCELLED.load(Ordering::Relaxed) {
                break;
            }
            let Ok(entry) = entry else { continue };
            spinner.inc(1);
            let path_text = entry.path().to_string_lossy().into_owned();
            if exclusions.iter().any(|re| re.is_match(&path_text)) {
                discovery.excluded.push(path_text);
                if entry.file_type().is_dir() {
                    entries.skip_current_dir();
                }
                continue;
            }
            if entry.file_type().is_file() && jobs_tx.send(entry.into_path()).is_err() {
                break;
            }
        }
        drop(jobs_tx);

        discovery.files = collector.join().unwrap_or_default();
    });

    spinner.finish_and_clear();
    discovery
}

/// Sniffs the head of a file and decides whether it reads as plain text.
fn is_plain_text(path: &Path) -> bool {
    let mut head = [0u8; SNIFF_LEN];
    let read = File::open(path).and_then(|mut file| file.read(&mut head));
    match read {
        Ok(n) => looks_like_text(&head[..n]),
        Err(_) => false,
    }
}

/// Content heuristic standing in for a MIME parent-chain check: anything
/// with a known binary magic, NUL bytes, stray control characters or broken
/// UTF-8 is treated as application/octet-stream and dropped.
fn looks_like_text(head: &[u8]) -> bool {
    if head.is_empty() {
        return true;
    }
    if let Some(kind) = infer::get(head) {
        if !kind.mime_type().starts_with("text/") {
            return false;
        }
    }
    if head
        .iter()
        .any(|b| b.is_ascii_control() && !matches!(*b, b'\t' | b'\n' | b'\r' | 0x0c | 0x1b))
    {
        return false;
    }
    match std::str::from_utf8(head) {
        Ok(_) => true,
        // tolerate a multi-byte sequence cut off at the sniff boundary
        Err(e) => e.error_len().is_none() && head.len() - e.valid_up_to() < 4,
    }
}
