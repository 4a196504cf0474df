use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic attempt ids with a "latest attempt wins" rule: a completing
/// request checks `is_current` before committing shared state, so a stale
/// in-flight result never overwrites a newer attempt's.
#[derive(Default)]
pub struct AttemptCounter {
    latest: AtomicU64,
}

impl AttemptCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new attempt, superseding any earlier one.
    pub fn begin(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, attempt: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == attempt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_attempt_is_current() {
        let counter = AttemptCounter::new();
        let attempt = counter.begin();
        assert!(counter.is_current(attempt));
    }

    #[test]
    fn test_newer_attempt_supersedes_older() {
        let counter = AttemptCounter::new();
        let first = counter.begin();
        let second = counter.begin();

        assert!(!counter.is_current(first));
        assert!(counter.is_current(second));
    }
}
