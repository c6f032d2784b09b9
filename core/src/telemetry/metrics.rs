use std::sync::Mutex;

/// Counter snapshot reported by [`MetricsRecorder::snapshot`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub samples_processed: usize,
    pub frames_latched: usize,
    pub peaks_confirmed: usize,
}

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_sample(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.samples_processed += 1;
        }
    }

    pub fn record_frame(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.frames_latched += 1;
        }
    }

    pub fn record_peak(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.peaks_confirmed += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        self.inner.lock().map(|metrics| *metrics).unwrap_or_default()
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
    fn counters_accumulate_independently() {
        let recorder = MetricsRecorder::new();
        recorder.record_sample();
        recorder.record_sample();
        recorder.record_frame();
        recorder.record_peak();

        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.samples_processed, 2);
        assert_eq!(snapshot.frames_latched, 1);
        assert_eq!(snapshot.peaks_confirmed, 1);
    }
}
