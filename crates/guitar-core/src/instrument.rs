//! The instrument: owns the grid, playback and animation state for one view.
//!
//! Everything here runs on the interaction thread. The host forwards layout
//! changes, touches, visibility transitions and display-refresh ticks; the
//! instrument answers with per-frame line transforms. Only the audio sink
//! works asynchronously, and its reports are drained by [`Instrument::poll_playback`].

use glam::Vec2;

use crate::animation::{FeedbackAnimator, IdleParams, LineFrame, VibrationParams};
use crate::error::GuitarError;
use crate::hit::{Hit, HitParams, HitResolver};
use crate::layout::{GridLayout, GridParams, Segment, Viewport};
use crate::playback::{AudioSink, PlaybackDispatcher, PlaybackReport};
use crate::sound_bank::SoundBank;

/// Identifies a physical touch (or the mouse) for the single-touch gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TouchId(pub u64);

impl TouchId {
    pub const MOUSE: TouchId = TouchId(u64::MAX);
}

/// Admits only the first of any simultaneous touches.
#[derive(Clone, Debug, Default)]
pub struct TouchGate {
    active: Option<TouchId>,
}

impl TouchGate {
    /// Returns true if `id` becomes the active touch.
    pub fn begin(&mut self, id: TouchId) -> bool {
        match self.active {
            Some(_) => false,
            None => {
                self.active = Some(id);
                true
            }
        }
    }

    pub fn end(&mut self, id: TouchId) {
        if self.active == Some(id) {
            self.active = None;
        }
    }

    pub fn active(&self) -> Option<TouchId> {
        self.active
    }
}

#[derive(Clone, Debug, Default)]
pub struct InstrumentConfig {
    pub grid: GridParams,
    pub hit: HitParams,
    pub idle: IdleParams,
    pub vibration: VibrationParams,
    pub bank: SoundBank,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TouchOutcome {
    /// Another touch is already down.
    Ignored,
    NoHit,
    Played(Hit),
    /// The string was hit but its sample could not be played.
    Silent { hit: Hit, error: GuitarError },
}

pub struct Instrument<S: AudioSink> {
    layout: GridLayout,
    resolver: HitResolver,
    playback: PlaybackDispatcher<S>,
    animator: FeedbackAnimator,
    gate: TouchGate,
}

impl<S: AudioSink> Instrument<S> {
    pub fn new(config: InstrumentConfig, sink: S) -> Self {
        Self {
            layout: GridLayout::new(config.grid),
            resolver: HitResolver::new(config.hit),
            playback: PlaybackDispatcher::new(sink, config.bank),
            animator: FeedbackAnimator::new(config.idle, config.vibration),
            gate: TouchGate::default(),
        }
    }

    /// Layout changed: discard the old strings and derive new ones.
    pub fn set_viewport(&mut self, viewport: Viewport) -> &[Segment] {
        log::debug!(
            "[grid] viewport {}x{} insets top={} bottom={}",
            viewport.width,
            viewport.height,
            viewport.insets.top,
            viewport.insets.bottom
        );
        self.layout.regenerate(viewport, self.playback.bank())
    }

    pub fn segments(&self) -> &[Segment] {
        self.layout.segments()
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        self.layout.viewport()
    }

    /// Resolve a touch without side effects.
    pub fn hit_test(&self, point: Vec2) -> Option<Hit> {
        let width = self.layout.viewport().map(|v| v.width).unwrap_or(0.0);
        self.resolver.resolve(point, self.layout.segments(), width)
    }

    pub fn touch_down(&mut self, id: TouchId, point: Vec2, now: f64) -> TouchOutcome {
        if !self.gate.begin(id) {
            return TouchOutcome::Ignored;
        }
        log::debug!("[touch] location x={:.1} y={:.1}", point.x, point.y);
        let Some(hit) = self.hit_test(point) else {
            return TouchOutcome::NoHit;
        };
        debug_assert!(
            hit.index < self.playback.bank().len(),
            "resolver produced index {} outside the sound bank",
            hit.index
        );
        log::info!("[touch] string {} touched", hit.index);

        self.animator.trigger(hit.index, now);
        match self.playback.dispatch(hit.index) {
            Ok(()) => TouchOutcome::Played(hit),
            Err(error) => TouchOutcome::Silent { hit, error },
        }
    }

    pub fn touch_up(&mut self, id: TouchId) {
        self.gate.end(id);
    }

    /// Start the idle clock; repeated calls while visible do nothing.
    pub fn view_appeared(&mut self, now: f64) -> bool {
        self.animator.start_idle(now)
    }

    pub fn view_disappeared(&mut self) -> bool {
        self.animator.stop_idle()
    }

    pub fn is_idle_running(&self) -> bool {
        self.animator.idle.is_running()
    }

    pub fn frame(&mut self, now: f64) -> Vec<LineFrame> {
        self.animator.frame(self.layout.segments(), now)
    }

    pub fn poll_playback(&mut self) -> Vec<PlaybackReport> {
        self.playback.poll()
    }

    pub fn playback(&self) -> &PlaybackDispatcher<S> {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackDispatcher<S> {
        &mut self.playback
    }

    pub fn animator(&self) -> &FeedbackAnimator {
        &self.animator
    }
}
