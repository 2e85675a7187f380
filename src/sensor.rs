//! Synthetic environment sensors and threshold-based anomaly detection.

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, warn};

/// Largest change between two consecutive temperature readings.
const MAX_STEP: f64 = 1.0;

/// Closed interval of readings considered normal.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnomalyBounds {
    pub low: f64,
    pub high: f64,
}

impl AnomalyBounds {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// True when `value` lies outside `[low, high]`; the bounds themselves are normal.
    pub fn is_anomalous(&self, value: f64) -> bool {
        value < self.low || value > self.high
    }
}

impl Default for AnomalyBounds {
    fn default() -> Self {
        Self::new(18.0, 28.0)
    }
}

/// Capability shared by every sensor the controller can own.
pub trait Sensor {
    /// Take a new reading and append it to the history.
    fn read_data(&mut self) -> f64;

    /// Check only the most recent reading against `bounds`.
    fn detect_anomaly(&self, bounds: AnomalyBounds) -> bool;

    /// Copy of every reading, oldest first, starting with the baseline.
    fn history(&self) -> Vec<f64>;
}

/// Temperature sensor driven by a bounded random walk.
pub struct TemperatureSensor<R = StdRng> {
    id: String,
    history: Vec<f64>,
    rng: R,
}

impl<R: Rng> TemperatureSensor<R> {
    /// Create a sensor whose history is seeded with `baseline`.
    pub fn new(id: impl Into<String>, baseline: f64, rng: R) -> Self {
        Self {
            id: id.into(),
            history: vec![baseline],
            rng,
        }
    }

    fn latest(&self) -> f64 {
        // History always starts with the baseline.
        self.history[self.history.len() - 1]
    }

    /// Test-only hook to place an exact reading without drawing.
    #[cfg(test)]
    fn record_for_test(&mut self, value: f64) {
        self.history.push(value);
    }
}

impl<R: Rng> Sensor for TemperatureSensor<R> {
    fn read_data(&mut self) -> f64 {
        let delta = self.rng.random_range(-MAX_STEP..=MAX_STEP);
        let next = round_two_places(self.latest() + delta);
        self.history.push(next);
        debug!(sensor = %self.id, reading = next, "temperature read");
        next
    }

    fn detect_anomaly(&self, bounds: AnomalyBounds) -> bool {
        let latest = self.latest();
        let anomalous = bounds.is_anomalous(latest);
        if anomalous {
            warn!(
                sensor = %self.id,
                reading = latest,
                low = bounds.low,
                high = bounds.high,
                "temperature anomaly detected"
            );
        }
        anomalous
    }

    fn history(&self) -> Vec<f64> {
        self.history.clone()
    }
}

fn round_two_places(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
