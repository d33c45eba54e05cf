//! Line feedback: idle oscillation and touch vibration as summed offset layers.
//!
//! Each layer is a pure function of time that yields a scalar displacement
//! for a segment; the displacement is applied along the segment's
//! perpendicular axis (x for vertical strings, y for horizontal ones). The
//! per-frame transform is the sum of all layers, so a vibrating string keeps
//! its idle sway underneath.

use glam::Vec2;
use instant::Instant;

use crate::constants::{
    IDLE_AMPLITUDE_PX, IDLE_BASE_FREQUENCY, IDLE_FREQUENCY_STEP, IDLE_TIME_SCALE,
    VIBRATION_DURATION_SEC, VIBRATION_KEYFRAMES_PX,
};
use crate::layout::{Orientation, Segment};

/// Monotonic seconds since the session started.
#[derive(Clone, Copy, Debug)]
pub struct SessionClock {
    epoch: Instant,
}

impl SessionClock {
    pub fn start() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }

    pub fn now_sec(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::start()
    }
}

pub trait OffsetLayer {
    /// Displacement of `segment` at time `now` (seconds), along its perpendicular axis.
    fn offset(&self, segment: &Segment, now: f64) -> f32;
}

#[derive(Clone, Debug)]
pub struct IdleParams {
    pub amplitude: f32,
    pub base_frequency: f32,
    pub frequency_step: f32,
    pub time_scale: f64,
}

impl Default for IdleParams {
    fn default() -> Self {
        Self {
            amplitude: IDLE_AMPLITUDE_PX,
            base_frequency: IDLE_BASE_FREQUENCY,
            frequency_step: IDLE_FREQUENCY_STEP,
            time_scale: IDLE_TIME_SCALE,
        }
    }
}

/// Continuous ambient sway. Only contributes while running; the running
/// state follows the view's visibility.
#[derive(Clone, Debug, Default)]
pub struct IdleOscillation {
    params: IdleParams,
    started_at: Option<f64>,
}

impl IdleOscillation {
    pub fn new(params: IdleParams) -> Self {
        Self {
            params,
            started_at: None,
        }
    }

    /// Returns false if the clock was already running (nothing changes).
    pub fn start(&mut self, now: f64) -> bool {
        if self.started_at.is_some() {
            return false;
        }
        self.started_at = Some(now);
        log::debug!("[anim] idle clock started");
        true
    }

    /// Returns false if the clock was not running.
    pub fn stop(&mut self) -> bool {
        if self.started_at.take().is_none() {
            return false;
        }
        log::debug!("[anim] idle clock stopped");
        true
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn frequency(&self, index: usize) -> f32 {
        self.params.base_frequency + index as f32 * self.params.frequency_step
    }
}

impl OffsetLayer for IdleOscillation {
    fn offset(&self, segment: &Segment, now: f64) -> f32 {
        let Some(t0) = self.started_at else {
            return 0.0;
        };
        let t = (now - t0).max(0.0) * self.params.time_scale;
        let phase = t * self.frequency(segment.index) as f64;
        self.params.amplitude * phase.sin() as f32
    }
}

#[derive(Clone, Debug)]
pub struct VibrationParams {
    pub duration: f64,
    pub keyframes: Vec<f32>,
}

impl Default for VibrationParams {
    fn default() -> Self {
        Self {
            duration: VIBRATION_DURATION_SEC,
            keyframes: VIBRATION_KEYFRAMES_PX.to_vec(),
        }
    }
}

impl VibrationParams {
    /// Keyframes are evenly spaced over the duration and linearly interpolated.
    /// Returns None once the vibration has expired.
    pub fn sample(&self, elapsed: f64) -> Option<f32> {
        if elapsed < 0.0 || elapsed >= self.duration || self.keyframes.is_empty() {
            return None;
        }
        let spans = self.keyframes.len() - 1;
        if spans == 0 {
            return Some(self.keyframes[0]);
        }
        let pos = (elapsed / self.duration) * spans as f64;
        let i = (pos.floor() as usize).min(spans - 1);
        let frac = (pos - i as f64) as f32;
        let (a, b) = (self.keyframes[i], self.keyframes[i + 1]);
        Some(a + (b - a) * frac)
    }
}

/// Touch-triggered vibrations, at most one per string. They expire on their own.
#[derive(Clone, Debug, Default)]
pub struct VibrationLayer {
    params: VibrationParams,
    started: Vec<Option<f64>>,
}

impl VibrationLayer {
    pub fn new(params: VibrationParams) -> Self {
        Self {
            params,
            started: Vec::new(),
        }
    }

    /// Start (or restart) the vibration on string `index`.
    pub fn trigger(&mut self, index: usize, now: f64) {
        if self.started.len() <= index {
            self.started.resize(index + 1, None);
        }
        self.started[index] = Some(now);
    }

    pub fn is_active(&self, index: usize, now: f64) -> bool {
        self.started
            .get(index)
            .copied()
            .flatten()
            .and_then(|t0| self.params.sample(now - t0))
            .is_some()
    }

    /// Drop handles whose vibration has run its course.
    pub fn prune(&mut self, now: f64) {
        let duration = self.params.duration;
        for slot in self.started.iter_mut() {
            if matches!(*slot, Some(t0) if now - t0 >= duration) {
                *slot = None;
            }
        }
    }

    pub fn clear(&mut self) {
        self.started.clear();
    }
}

impl OffsetLayer for VibrationLayer {
    fn offset(&self, segment: &Segment, now: f64) -> f32 {
        self.started
            .get(segment.index)
            .copied()
            .flatten()
            .and_then(|t0| self.params.sample(now - t0))
            .unwrap_or(0.0)
    }
}

/// Renderable state of one string for a single frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineFrame {
    pub index: usize,
    pub start: Vec2,
    pub end: Vec2,
    pub orientation: Orientation,
    pub offset: Vec2,
}

#[derive(Clone, Debug, Default)]
pub struct FeedbackAnimator {
    pub idle: IdleOscillation,
    pub vibration: VibrationLayer,
}

impl FeedbackAnimator {
    pub fn new(idle: IdleParams, vibration: VibrationParams) -> Self {
        Self {
            idle: IdleOscillation::new(idle),
            vibration: VibrationLayer::new(vibration),
        }
    }

    /// View became visible.
    pub fn start_idle(&mut self, now: f64) -> bool {
        self.idle.start(now)
    }

    /// View went away: stop the idle clock and drop every transient animation.
    pub fn stop_idle(&mut self) -> bool {
        self.vibration.clear();
        self.idle.stop()
    }

    pub fn trigger(&mut self, index: usize, now: f64) {
        self.vibration.trigger(index, now);
    }

    /// Summed displacement of `segment` at `now`.
    pub fn offset(&self, segment: &Segment, now: f64) -> Vec2 {
        let layers: [&dyn OffsetLayer; 2] = [&self.idle, &self.vibration];
        let amount: f32 = layers.iter().map(|l| l.offset(segment, now)).sum();
        segment.orientation.perpendicular() * amount
    }

    pub fn frame(&mut self, segments: &[Segment], now: f64) -> Vec<LineFrame> {
        self.vibration.prune(now);
        segments
            .iter()
            .map(|s| LineFrame {
                index: s.index,
                start: s.start,
                end: s.end,
                orientation: s.orientation,
                offset: self.offset(s, now),
            })
            .collect()
    }
}
