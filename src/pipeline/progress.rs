// file: src/pipeline/progress.rs
// description: progress tracking and statistics reporting for search runs
// reference: uses indicatif for progress bars and tracks per-term search metrics

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStats {
    pub terms_searched: usize,
    pub terms_with_results: usize,
    pub results_kept: usize,
    pub signature_matches_discarded: usize,
    pub duration_secs: u64,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn terms_per_minute(&self) -> f64 {
        if self.duration_secs == 0 {
            return 0.0;
        }
        self.terms_searched as f64 * 60.0 / self.duration_secs as f64
    }

    /// Share of raw matches that were signature false positives.
    pub fn signature_rate(&self) -> f64 {
        let total = self.results_kept + self.signature_matches_discarded;
        if total == 0 {
            return 0.0;
        }
        (self.signature_matches_discarded as f64 / total as f64) * 100.0
    }
}

pub struct ProgressTracker {
    main_bar: ProgressBar,
    detail_bar: ProgressBar,
    terms_searched: Arc<AtomicUsize>,
    terms_with_results: Arc<AtomicUsize>,
    results_kept: Arc<AtomicUsize>,
    signatures_discarded: Arc<AtomicUsize>,
    start_time: Instant,
}

impl ProgressTracker {
    pub fn with_color(total_terms: usize, colored: bool) -> Self {
        let multi_progress = MultiProgress::new();

        let main_bar = create_progress_bar(&multi_progress, total_terms as u64, colored);
        let detail_bar = create_detail_bar(&multi_progress);

        Self::from_bars(main_bar, detail_bar)
    }

    /// Tracks statistics without drawing anything.
    pub fn hidden(total_terms: usize) -> Self {
        let multi_progress = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let main_bar = multi_progress.add(ProgressBar::new(total_terms as u64));
        let detail_bar = multi_progress.add(ProgressBar::new(0));

        Self::from_bars(main_bar, detail_bar)
    }

    fn from_bars(main_bar: ProgressBar, detail_bar: ProgressBar) -> Self {
        Self {
            main_bar,
            detail_bar,
            terms_searched: Arc::new(AtomicUsize::new(0)),
            terms_with_results: Arc::new(AtomicUsize::new(0)),
            results_kept: Arc::new(AtomicUsize::new(0)),
            signatures_discarded: Arc::new(AtomicUsize::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn record_term(&self, kept: usize, discarded: usize) {
        self.terms_searched.fetch_add(1, Ordering::SeqCst);
        if kept > 0 {
            self.terms_with_results.fetch_add(1, Ordering::SeqCst);
        }
        self.results_kept.fetch_add(kept, Ordering::SeqCst);
        self.signatures_discarded
            .fetch_add(discarded, Ordering::SeqCst);
        self.main_bar.inc(1);
        self.update_detail_bar();
    }

    pub fn set_message(&self, message: String) {
        self.main_bar.set_message(message);
    }

    pub fn finish(&self) {
        self.main_bar.finish_with_message("Search complete");
        self.detail_bar.finish_and_clear();
    }

    pub fn get_stats(&self) -> RunStats {
        let duration = self.start_time.elapsed().as_secs();

        RunStats {
            terms_searched: self.terms_searched.load(Ordering::SeqCst),
            terms_with_results: self.terms_with_results.load(Ordering::SeqCst),
            results_kept: self.results_kept.load(Ordering::SeqCst),
            signature_matches_discarded: self.signatures_discarded.load(Ordering::SeqCst),
            duration_secs: duration,
        }
    }

    fn update_detail_bar(&self) {
        let kept = self.results_kept.load(Ordering::SeqCst);
        let discarded = self.signatures_discarded.load(Ordering::SeqCst);

        let message = format!("Results: {} | Signature matches: {}", kept, discarded);

        self.detail_bar.set_message(message);
    }
}

impl Drop for ProgressTracker {
    fn drop(&mut self) {
        self.finish();
    }
}

fn create_progress_bar(multi_progress: &MultiProgress, total: u64, colored: bool) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(total));
    let template = if colored {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} terms {msg}"
    } else {
        "{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} terms {msg}"
    };

    if let Ok(style) = ProgressStyle::default_bar().template(template) {
        let chars = if colored { "█▓▒░" } else { "=>-" };
        bar.set_style(style.progress_chars(chars));
    }
    bar
}

fn create_detail_bar(multi_progress: &MultiProgress) -> ProgressBar {
    let bar = multi_progress.add(ProgressBar::new(0));
    if let Ok(style) = ProgressStyle::default_bar().template("{msg}") {
        bar.set_style(style);
    }
    bar
}
