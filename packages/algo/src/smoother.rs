//! Angle Smoothing
//!
//! Trailing moving average over the most recent raw angle samples. Camera
//! keypoints jitter frame to frame; averaging a short window keeps the
//! repetition state machine from flickering across its thresholds.

use crate::types::SMOOTHING_WINDOW;

/// Moving-average smoother with a fixed window.
///
/// The window grows from empty: until it fills, the mean is taken over the
/// samples seen so far, so early values track the raw signal closely.
#[derive(Clone, Debug)]
pub struct AngleSmoother {
    samples: Vec<f64>,
    window: usize,
}

impl AngleSmoother {
    pub fn new() -> Self {
        Self::with_window(SMOOTHING_WINDOW)
    }

    /// Smoother with a custom window size (clamped to at least 1)
    pub fn with_window(window: usize) -> Self {
        let window = window.max(1);
        Self {
            samples: Vec::with_capacity(window),
            window,
        }
    }

    /// Push a raw sample and return the smoothed value
    pub fn push(&mut self, sample: f64) -> f64 {
        self.samples.push(sample);
        if self.samples.len() > self.window {
            self.samples.remove(0);
        }

        let sum: f64 = self.samples.iter().sum();
        sum / self.samples.len() as f64
    }

    /// Number of samples currently in the window
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn reset(&mut self) {
        self.samples.clear();
    }
}

impl Default for AngleSmoother {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== Tests ====================
