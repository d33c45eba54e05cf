//! Playback dispatch: one string index in, at most one sample sounding out.
//!
//! The dispatcher owns the only "currently playing" handle. Starting a new
//! sample always stops the previous one first; there is no queueing and no
//! mixing. The audio sink runs asynchronously and reports back through a
//! one-shot [`Completion`] callback; those reports are forwarded over a
//! channel and drained on the interaction thread by [`PlaybackDispatcher::poll`].

use crossbeam_channel::{Receiver, Sender};
use thiserror::Error;

use crate::error::{GuitarError, Result};
use crate::sound_bank::SoundBank;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// Sample played to its end.
    Finished,
    /// Sample was cut off by `stop()` (usually a newer hit).
    Stopped,
    /// Sample could not be played after it was accepted.
    Failed(String),
}

/// One-shot callback invoked by the sink when a sample ends for any reason.
pub type Completion = Box<dyn FnOnce(PlaybackOutcome) + Send + 'static>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("no such resource: {0}")]
    NotFound(String),
    #[error("decode error: {0}")]
    Decode(String),
}

/// Named-resource audio output.
pub trait AudioSink {
    fn has_resource(&self, resource: &str) -> bool;
    /// Start playing `resource`, returning immediately. `on_done` fires once.
    fn play(&mut self, resource: &str, on_done: Completion) -> std::result::Result<(), SinkError>;
    /// Stop whatever is playing. No-op when silent.
    fn stop(&mut self);
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveSample {
    pub ticket: u64,
    pub index: usize,
    pub resource: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackReport {
    pub ticket: u64,
    pub index: usize,
    pub resource: String,
    pub outcome: PlaybackOutcome,
}

pub struct PlaybackDispatcher<S: AudioSink> {
    sink: S,
    bank: SoundBank,
    current: Option<ActiveSample>,
    next_ticket: u64,
    report_tx: Sender<PlaybackReport>,
    report_rx: Receiver<PlaybackReport>,
}

impl<S: AudioSink> PlaybackDispatcher<S> {
    pub fn new(sink: S, bank: SoundBank) -> Self {
        let (report_tx, report_rx) = crossbeam_channel::unbounded();
        Self {
            sink,
            bank,
            current: None,
            next_ticket: 1,
            report_tx,
            report_rx,
        }
    }

    /// Play the sample mapped to `index`, interrupting any sample in flight.
    pub fn dispatch(&mut self, index: usize) -> Result<()> {
        let len = self.bank.len();
        let resource = match self.bank.sample(index) {
            Some(r) => r.to_string(),
            None => {
                log::error!("[playback] invalid string index {} (bank holds {})", index, len);
                return Err(GuitarError::IndexOutOfRange { index, len });
            }
        };
        if !self.sink.has_resource(&resource) {
            log::warn!("[playback] could not find sound resource: {}", resource);
            return Err(GuitarError::MissingAudioResource(resource));
        }

        self.sink.stop();
        self.current = None;

        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let tx = self.report_tx.clone();
        let report_resource = resource.clone();
        let on_done: Completion = Box::new(move |outcome| {
            let _ = tx.send(PlaybackReport {
                ticket,
                index,
                resource: report_resource,
                outcome,
            });
        });

        match self.sink.play(&resource, on_done) {
            Ok(()) => {
                log::info!("[playback] playing {} for string {}", resource, index);
                self.current = Some(ActiveSample {
                    ticket,
                    index,
                    resource,
                });
                Ok(())
            }
            Err(SinkError::NotFound(r)) => {
                log::warn!("[playback] could not find sound resource: {}", r);
                Err(GuitarError::MissingAudioResource(r))
            }
            Err(SinkError::Decode(reason)) => {
                log::error!("[playback] error playing {}: {}", resource, reason);
                Err(GuitarError::AudioDecodeFailure { resource, reason })
            }
        }
    }

    /// Drain completion reports; clears the current handle when its sample ends.
    pub fn poll(&mut self) -> Vec<PlaybackReport> {
        let reports: Vec<PlaybackReport> = self.report_rx.try_iter().collect();
        for r in &reports {
            match &r.outcome {
                PlaybackOutcome::Finished => {
                    log::debug!("[playback] {} finished", r.resource)
                }
                PlaybackOutcome::Stopped => {
                    log::debug!("[playback] {} interrupted", r.resource)
                }
                PlaybackOutcome::Failed(reason) => {
                    log::error!("[playback] {} failed: {}", r.resource, reason)
                }
            }
            if self.current.as_ref().map(|c| c.ticket) == Some(r.ticket) {
                self.current = None;
            }
        }
        reports
    }

    /// Stop playback and release the current handle.
    pub fn stop(&mut self) {
        self.sink.stop();
        self.current = None;
    }

    pub fn current(&self) -> Option<&ActiveSample> {
        self.current.as_ref()
    }

    pub fn bank(&self) -> &SoundBank {
        &self.bank
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }
}
