use std::sync::Mutex;

/// Per-consumer completion counters.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub succeeded: usize,
    pub failed: usize,
    pub discarded: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_success(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.succeeded += 1;
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failed += 1;
        }
    }

    pub fn record_discarded(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.discarded += 1;
        }
    }

    pub fn snapshot(&self) -> Metrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            Metrics::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_counts_each_outcome() {
        let recorder = MetricsRecorder::new();
        recorder.record_success();
        recorder.record_success();
        recorder.record_failure();
        recorder.record_discarded();
        assert_eq!(
            recorder.snapshot(),
            Metrics {
                succeeded: 2,
                failed: 1,
                discarded: 1
            }
        );
    }
}
