// form-jsfuzz/src/mutators/try_catch/position.rs
//! Running estimate of how far the walk got through the original source

use log::trace;

/// Tracks the source-location fraction reported by position markers.
///
/// Markers are sparse; between two markers the last observed value holds.
/// The fraction never decreases during a pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PositionTracker {
    fraction: f64,
}

impl PositionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_fraction(&self) -> f64 {
        self.fraction
    }

    /// Record a marker's fraction. Values are clamped to `[0, 1]`; non-finite
    /// values and values behind the current position are ignored.
    pub fn observe(&mut self, fraction: f64) {
        if !fraction.is_finite() {
            return;
        }
        let fraction = fraction.clamp(0.0, 1.0);
        if fraction < self.fraction {
            trace!(
                "ignoring position marker {} behind current position {}",
                fraction,
                self.fraction
            );
            return;
        }
        self.fraction = fraction;
    }
}
