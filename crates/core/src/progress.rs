use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use log::info;

/// A progress used to count the records processed by a backup or restore run
#[derive(Debug, Clone)]
pub struct Progress(Arc<dyn SnapProgress>);

impl Progress {
    /// Create a new `Progress` from a suitable trait implementation
    pub fn new<P: SnapProgress>(p: P) -> Self {
        Self(Arc::new(p))
    }

    /// Set total length for this progress
    ///
    /// # Arguments
    ///
    /// * `len` - The number of records to process
    pub fn set_length(&self, len: u64) {
        self.0.set_length(len);
    }

    /// Advance progress by given increment
    ///
    /// # Arguments
    ///
    /// * `inc` - The number of records processed since the last call
    pub fn inc(&self, inc: u64) {
        self.0.inc(inc);
    }

    /// Finish the progress
    pub fn finish(&self) {
        self.0.finish();
    }
}

/// Trait to report progress information of backup and restore runs.
///
/// Implement this trait when you want to display this progress to your users.
pub trait SnapProgress: Send + Sync + 'static + std::fmt::Debug {
    /// Set total length for this progress
    fn set_length(&self, len: u64);

    /// Advance progress by given increment
    fn inc(&self, inc: u64);

    /// Finish the progress
    fn finish(&self);
}

/// Trait to start progress reports for backup and restore runs.
///
/// Implement this trait when you want to display this progress to your users.
pub trait ProgressBars: std::fmt::Debug + Send + Sync + 'static {
    /// Start a new progress counting processed records.
    ///
    /// # Arguments
    ///
    /// * `prefix` - What is being counted, e.g. "backing up apps..."
    fn progress_counter(&self, prefix: &str) -> Progress;
}

/// A progress which only logs how many records were processed once it is finished.
#[derive(Debug)]
pub struct LogProgress {
    prefix: String,
    length: AtomicU64,
    position: AtomicU64,
}

impl LogProgress {
    /// Create a new progress for the given prefix.
    #[must_use]
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.trim_end_matches('.').to_string(),
            length: AtomicU64::new(0),
            position: AtomicU64::new(0),
        }
    }

    /// The number of processed records so far.
    #[must_use]
    pub fn position(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    fn summary(&self) -> String {
        match self.length.load(Ordering::Relaxed) {
            0 => format!("{}: {} processed.", self.prefix, self.position()),
            len => format!("{}: {} of {len} processed.", self.prefix, self.position()),
        }
    }
}

impl SnapProgress for LogProgress {
    fn set_length(&self, len: u64) {
        self.length.store(len, Ordering::Relaxed);
    }
    fn inc(&self, inc: u64) {
        _ = self.position.fetch_add(inc, Ordering::Relaxed);
    }
    fn finish(&self) {
        info!("{}", self.summary());
    }
}

/// Don't show progress bars, only log rudimentary progress information.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgressBars;

impl ProgressBars for NoProgressBars {
    fn progress_counter(&self, prefix: &str) -> Progress {
        info!("{prefix}");
        Progress::new(LogProgress::new(prefix))
    }
}
