//! Cooperative CPU throttle gate.
//!
//! A background sampler measures the process CPU share at a fixed cadence
//! and publishes a rolling average; workers call [`ThrottleGate::wait`] at
//! yield points and block while the average sits above the configured
//! ceiling. The gate never preempts anyone.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::CANCELLED;

/// Sampling cadence of the background measurement task.
pub const MEASURE_INTERVAL: Duration = Duration::from_millis(333);

/// Number of samples in the rolling window.
pub const MEASUREMENTS: usize = 3;

const WAIT_POLL: Duration = Duration::from_millis(25);

/// Rolling average over the last [`MEASUREMENTS`] samples.
#[derive(Debug, Default)]
struct RollingAverage {
    samples: [f64; MEASUREMENTS],
    filled: usize,
    next: usize,
}

impl RollingAverage {
    fn push(&mut self, value: f64) {
        self.samples[self.next] = value;
        self.next = (self.next + 1) % MEASUREMENTS;
        if self.filled < MEASUREMENTS {
            self.filled += 1;
        }
    }

    fn average(&self) -> f64 {
        if self.filled == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let filled = self.filled as f64;
        self.samples[..self.filled].iter().sum::<f64>() / filled
    }
}

/// Coarse-grained cooperative CPU limiter.
pub struct ThrottleGate {
    ceiling: f64,
    force: bool,
    average_bits: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    sampler: Mutex<Option<JoinHandle<()>>>,
}

impl ThrottleGate {
    /// Creates a gate with a validated ceiling percentage.
    #[must_use]
    pub fn new(ceiling_pct: u8, force: bool) -> Self {
        Self {
            ceiling: f64::from(ceiling_pct),
            force,
            average_bits: Arc::new(AtomicU64::new(0.0f64.to_bits())),
            running: Arc::new(AtomicBool::new(false)),
            sampler: Mutex::new(None),
        }
    }

    /// Starts the background sampler. A forced gate never samples.
    pub fn start(&self) {
        if self.force {
            return;
        }
        let mut guard = match self.sampler.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if guard.is_some() {
            return;
        }
        self.running.store(true, Ordering::SeqCst);
        let running = Arc::clone(&self.running);
        let average_bits = Arc::clone(&self.average_bits);
        *guard = Some(thread::spawn(move || sample_loop(&running, &average_bits)));
    }

    /// Blocks until the rolling CPU average drops below the ceiling.
    ///
    /// Returns immediately for a forced gate, and gives up waiting once the
    /// scan is cancelled.
    pub fn wait(&self) {
        if self.force {
            return;
        }
        while self.average() >= self.ceiling {
            if CANCELLED.load(Ordering::Relaxed) {
                break;
            }
            thread::sleep(WAIT_POLL);
        }
    }

    /// Current rolling average in percent of total machine capacity.
    #[must_use]
    pub fn average(&self) -> f64 {
        f64::from_bits(self.average_bits.load(Ordering::Relaxed))
    }

    /// Stops the sampler and waits for it to exit.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        let handle = {
            let mut guard = match self.sampler.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.take()
        };
        if let Some(handle) = handle {
            let _ = handle.join();
        }
    }
}

impl Drop for ThrottleGate {
    fn drop(&mut self) {
        self.stop();
    }
}

fn sample_loop(running: &AtomicBool, average_bits: &AtomicU64) {
    let ticks_per_sec = clock_ticks_per_sec();
    #[allow(clippy::cast_precision_loss)]
    let cpus = num_cpus::get() as f64;
    let mut window = RollingAverage::default();
    let mut last_ticks = read_process_ticks();
    let mut last_at = Instant::now();

    while running.load(Ordering::SeqCst) {
        thread::sleep(MEASURE_INTERVAL);
        let Some(ticks) = read_process_ticks() else {
            // failed sample: the previous average stays published
            continue;
        };
        let elapsed = last_at.elapsed().as_secs_f64();
        if let Some(previous) = last_ticks {
            if elapsed > 0.0 {
                #[allow(clippy::cast_precision_loss)]
                let busy_secs = ticks.saturating_sub(previous) as f64 / ticks_per_sec;
                window.push(busy_secs / elapsed * 100.0 / cpus);
                average_bits.store(window.average().to_bits(), Ordering::Relaxed);
            }
        }
        last_ticks = Some(ticks);
        last_at = Instant::now();
    }
}

fn clock_ticks_per_sec() -> f64 {
    let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if ticks > 0 {
        #[allow(clippy::cast_precision_loss)]
        let ticks = ticks as f64;
        ticks
    } else {
        100.0
    }
}

fn read_process_ticks() -> Option<u64> {
    parse_stat_ticks(&std::fs::read_to_string("/proc/self/stat").ok()?)
}

/// Extracts utime + stime from a `/proc/[pid]/stat` line.
///
/// The comm field may itself contain spaces and parentheses, so parsing
/// restarts after the last closing parenthesis; utime and stime are then the
/// 12th and 13th following fields.
fn parse_stat_ticks(stat: &str) -> Option<u64> {
    let rest = stat.rsplit(')').next()?;
    let mut fields = rest.split_whitespace();
    let utime: u64 = fields.nth(11)?.parse().ok()?;
    let stime: u64 = fields.next()?.parse().ok()?;
    Some(utime + stime)
}
