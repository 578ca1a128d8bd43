//! Progress-callback trait for merge-job events.
//!
//! Implement [`MergeProgress`] to receive events as the pipeline discovers,
//! converts, and merges files. All methods have no-op defaults so callers
//! only override what they care about. The trait also carries the
//! cancellation poll: the pipeline checks [`MergeProgress::is_cancelled`]
//! between files and aborts with [`crate::Error::Cancelled`] when it
//! returns true.

use std::path::Path;

/// Called by the pipeline as a merge job advances.
pub trait MergeProgress {
    /// Discovery finished; `total` files will be processed.
    fn on_discovery_complete(&self, total: usize) {
        let _ = total;
    }

    /// A file is about to be processed. `index` is 1-based; `name` is the
    /// display name (staging prefix stripped).
    fn on_file_start(&self, index: usize, total: usize, name: &str) {
        let _ = (index, total, name);
    }

    /// A non-PDF file was converted to a PDF page set.
    fn on_file_converted(&self, path: &Path) {
        let _ = path;
    }

    /// A file was skipped. `reason` is a human-readable explanation.
    fn on_file_skipped(&self, path: &Path, reason: &str) {
        let _ = (path, reason);
    }

    /// The final merge is starting over `total` PDFs.
    fn on_merge_start(&self, total: usize) {
        let _ = total;
    }

    /// One PDF was appended to the output (or skipped as unreadable).
    fn on_merge_progress(&self, done: usize, total: usize) {
        let _ = (done, total);
    }

    /// The output file was written.
    fn on_complete(&self, merged: usize, skipped: usize) {
        let _ = (merged, skipped);
    }

    /// Polled between files; return true to abort the job.
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgress;

impl MergeProgress for NoopProgress {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Tracking {
        files: AtomicUsize,
        skips: AtomicUsize,
    }

    impl MergeProgress for Tracking {
        fn on_file_start(&self, _index: usize, _total: usize, _name: &str) {
            self.files.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_skipped(&self, _path: &Path, _reason: &str) {
            self.skips.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_noop_does_not_panic() {
        let p = NoopProgress;
        p.on_discovery_complete(3);
        p.on_file_start(1, 3, "a.pdf");
        p.on_file_converted(Path::new("a.pdf"));
        p.on_file_skipped(Path::new("b.xlsx"), "unsupported");
        p.on_merge_start(2);
        p.on_merge_progress(1, 2);
        p.on_complete(2, 1);
        assert!(!p.is_cancelled());
    }

    #[test]
    fn test_overridden_events_fire() {
        let t = Tracking {
            files: AtomicUsize::new(0),
            skips: AtomicUsize::new(0),
        };
        t.on_file_start(1, 2, "a.pdf");
        t.on_file_start(2, 2, "b.pdf");
        t.on_file_skipped(Path::new("b.pdf"), "unreadable");
        assert_eq!(t.files.load(Ordering::SeqCst), 2);
        assert_eq!(t.skips.load(Ordering::SeqCst), 1);
    }
}
