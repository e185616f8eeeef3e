/// Running totals for the current session.
///
/// Only successful turns feed this; it starts empty on every launch and is
/// never written to disk. Values are stored raw, formatting lives in
/// [`crate::core::routing`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionMetrics {
    total_cost: f64,
    last_latency: Option<f64>,
}

impl SessionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `delta` to the running cost. Negative and non-finite deltas are
    /// dropped so the total never decreases.
    pub fn record_cost(&mut self, delta: f64) {
        if delta.is_finite() && delta >= 0.0 {
            self.total_cost += delta;
        }
    }

    pub fn record_latency(&mut self, latency_secs: f64) {
        if latency_secs.is_finite() && latency_secs >= 0.0 {
            self.last_latency = Some(latency_secs);
        }
    }

    pub fn current_total(&self) -> f64 {
        self.total_cost
    }

    pub fn last_latency(&self) -> Option<f64> {
        self.last_latency
    }
}
