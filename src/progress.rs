//! Progress reporting for the probe loop.
//!
//! The engine only talks to [`ProbeProgress`]; the terminal bar lives behind
//! the `cli` feature so the library stays UI-free.

/// Receives progress updates while games are probed.
pub trait ProbeProgress: Send + Sync {
    /// Probing is about to start over `total` games
    fn start(&self, total: u64);

    /// One more game has been probed
    fn advance(&self);

    /// A diagnostic line (e.g. a failed request) that must not garble the bar
    fn message(&self, line: &str);

    /// Probing is over
    fn finish(&self);
}

/// Ignores all updates (tests, non-interactive use).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgress;

impl ProbeProgress for NoopProgress {
    fn start(&self, _total: u64) {}
    fn advance(&self) {}
    fn message(&self, _line: &str) {}
    fn finish(&self) {}
}

#[cfg(feature = "cli")]
pub mod bar {
    use super::ProbeProgress;
    use indicatif::{ProgressBar, ProgressStyle};

    /// Terminal progress bar: `[elapsed] [####----] 12/340 (eta)`
    pub struct BarProgress {
        pub(crate) bar: ProgressBar,
    }

    impl BarProgress {
        pub fn new() -> Self {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            Self { bar }
        }
    }

    impl Default for BarProgress {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ProbeProgress for BarProgress {
        fn start(&self, total: u64) {
            self.bar.set_length(total);
            self.bar.reset();
        }

        fn advance(&self) {
            self.bar.inc(1);
        }

        fn message(&self, line: &str) {
            // println() is a no-op when stderr is not a terminal
            if self.bar.is_hidden() {
                eprintln!("{}", line);
            } else {
                self.bar.println(line);
            }
        }

        fn finish(&self) {
            self.bar.finish_and_clear();
        }
    }
}

#[cfg(feature = "cli")]
pub use bar::BarProgress;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_progress_does_not_panic() {
        let progress = NoopProgress;
        progress.start(3);
        progress.advance();
        progress.message("Request failed");
        progress.finish();
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_bar_counts_positions() {
        let progress = BarProgress::new();
        progress.start(2);
        progress.advance();
        progress.advance();
        assert_eq!(progress.bar.position(), 2);
        progress.finish();
    }
}
