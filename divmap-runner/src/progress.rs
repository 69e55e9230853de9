//! Progress reporting for the fan-out.
//!
//! Callbacks fire from worker threads in completion order, so every
//! implementation must be `Sync`.

use divmap_core::FetchOutcome;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};

pub trait FetchProgress: Send + Sync {
    /// Called once before any lookup starts.
    fn on_start(&self, total: usize);

    /// Called as each asset finishes, in completion order.
    fn on_complete(&self, outcome: &FetchOutcome);

    /// Called once after the last lookup.
    fn on_finish(&self, with_data: usize, total: usize);
}

/// Terminal progress bar.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(label: &str) -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg}: {percent:>3}%|{bar:40.cyan/blue}| {pos}/{len} [{elapsed_precise}<{eta}]")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message(label.to_string());
        Self { bar }
    }
}

impl FetchProgress for BarProgress {
    fn on_start(&self, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(0);
    }

    fn on_complete(&self, _outcome: &FetchOutcome) {
        self.bar.inc(1);
    }

    fn on_finish(&self, _with_data: usize, _total: usize) {
        self.bar.finish();
    }
}

/// Line-per-asset progress for non-interactive output.
#[derive(Default)]
pub struct StdoutProgress {
    done: AtomicUsize,
    total: AtomicUsize,
}

impl StdoutProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FetchProgress for StdoutProgress {
    fn on_start(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
        self.done.store(0, Ordering::SeqCst);
    }

    fn on_complete(&self, outcome: &FetchOutcome) {
        let n = self.done.fetch_add(1, Ordering::SeqCst) + 1;
        let total = self.total.load(Ordering::SeqCst);
        match outcome {
            FetchOutcome::Series(s) => println!("[{n}/{total}] OK: {} ({} months)", s.asset, s.len()),
            FetchOutcome::NoData { asset, reason } => println!("[{n}/{total}] {asset}: {reason}"),
        }
    }

    fn on_finish(&self, with_data: usize, total: usize) {
        println!("\nFetch complete: {with_data}/{total} assets with dividends");
    }
}

/// Discards all progress events.
pub struct NoProgress;

impl FetchProgress for NoProgress {
    fn on_start(&self, _total: usize) {}
    fn on_complete(&self, _outcome: &FetchOutcome) {}
    fn on_finish(&self, _with_data: usize, _total: usize) {}
}
