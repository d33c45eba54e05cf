// Shared test helpers: an in-memory audio sink that records every call.
#![allow(dead_code)]

use std::collections::HashSet;

use guitar_core::{AudioSink, Completion, PlaybackOutcome, SinkError, DEFAULT_SAMPLE_NAMES};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SinkCall {
    Play(String),
    Stop,
}

pub struct RecordingSink {
    pub resources: HashSet<String>,
    pub undecodable: HashSet<String>,
    pub calls: Vec<SinkCall>,
    pub max_concurrent: usize,
    playing: Option<(String, Completion)>,
}

impl RecordingSink {
    pub fn with_resources<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            resources: names.into_iter().map(|s| s.to_string()).collect(),
            undecodable: HashSet::new(),
            calls: Vec::new(),
            max_concurrent: 0,
            playing: None,
        }
    }

    /// Sink that knows every default sample.
    pub fn full() -> Self {
        Self::with_resources(DEFAULT_SAMPLE_NAMES)
    }

    pub fn playing(&self) -> Option<&str> {
        self.playing.as_ref().map(|(name, _)| name.as_str())
    }

    /// Let the current sample run to its end.
    pub fn finish(&mut self) {
        if let Some((_, done)) = self.playing.take() {
            done(PlaybackOutcome::Finished);
        }
    }

    /// The sample was accepted but the output broke down mid-play.
    pub fn fail(&mut self, reason: &str) {
        if let Some((_, done)) = self.playing.take() {
            done(PlaybackOutcome::Failed(reason.to_string()));
        }
    }

    pub fn plays(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SinkCall::Play(name) => Some(name.as_str()),
                SinkCall::Stop => None,
            })
            .collect()
    }
}

impl AudioSink for RecordingSink {
    fn has_resource(&self, resource: &str) -> bool {
        self.resources.contains(resource)
    }

    fn play(&mut self, resource: &str, on_done: Completion) -> Result<(), SinkError> {
        if !self.resources.contains(resource) {
            return Err(SinkError::NotFound(resource.to_string()));
        }
        if self.undecodable.contains(resource) {
            return Err(SinkError::Decode("bad header".to_string()));
        }
        self.calls.push(SinkCall::Play(resource.to_string()));
        let concurrent = 1 + usize::from(self.playing.is_some());
        self.max_concurrent = self.max_concurrent.max(concurrent);
        self.playing = Some((resource.to_string(), on_done));
        Ok(())
    }

    fn stop(&mut self) {
        self.calls.push(SinkCall::Stop);
        if let Some((_, done)) = self.playing.take() {
            done(PlaybackOutcome::Stopped);
        }
    }
}

/// Route library logs to the test harness; safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn approx_eq(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}
