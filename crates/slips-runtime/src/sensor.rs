//! Throttled viewport sensing.
//!
//! [`ViewportSensor`] stands between the host's raw scroll/resize events
//! and the machine: it gates observations to at most one per throttle
//! window (16 ms by default) so a fast-scrolling viewport does not force a
//! reclassification per pixel. One sample is always emitted immediately on
//! attach, and resize events go through the same gate as scroll events.
//!
//! The sensor only produces [`ScrollSample`] values — it never touches the
//! panel collection or visibility states.

use web_time::{Duration, Instant};

use slips_core::visibility::ScrollSample;
use slips_core::THROTTLE_TIME;

/// Attach/detach lifecycle plus throttling for one scroll container.
#[derive(Debug)]
pub struct ViewportSensor {
    window: Duration,
    last_emit: Option<Instant>,
    attached: bool,
}

impl Default for ViewportSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportSensor {
    /// Sensor with the standard 16 ms throttle window.
    #[must_use]
    pub fn new() -> Self {
        Self::with_window(THROTTLE_TIME)
    }

    /// Sensor with a custom throttle window.
    #[must_use]
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            last_emit: None,
            attached: false,
        }
    }

    /// Whether a container is currently attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Attach to a container and emit its initial geometry immediately.
    pub fn attach(&mut self, offset: f32, viewport_width: f32) -> ScrollSample {
        self.attached = true;
        self.last_emit = Some(Instant::now());
        tracing::debug!(target: "slips.sensor", offset, viewport_width, "viewport attached");
        ScrollSample::new(offset, viewport_width)
    }

    /// Observe a scroll event. Returns a sample unless still inside the
    /// throttle window or no container is attached.
    pub fn observe(&mut self, offset: f32, viewport_width: f32) -> Option<ScrollSample> {
        self.observe_at(Instant::now(), offset, viewport_width)
    }

    /// Observe a window resize. Same gate as scroll.
    pub fn resize(&mut self, offset: f32, viewport_width: f32) -> Option<ScrollSample> {
        self.observe(offset, viewport_width)
    }

    /// Detach from the container; no further samples are emitted.
    pub fn detach(&mut self) {
        self.attached = false;
        self.last_emit = None;
        tracing::debug!(target: "slips.sensor", "viewport detached");
    }

    fn observe_at(&mut self, now: Instant, offset: f32, viewport_width: f32) -> Option<ScrollSample> {
        if !self.attached {
            return None;
        }
        if let Some(last) = self.last_emit {
            if now.saturating_duration_since(last) < self.window {
                return None;
            }
        }
        self.last_emit = Some(now);
        Some(ScrollSample::new(offset, viewport_width))
    }
}
