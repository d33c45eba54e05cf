// ---------------- Native audio (cpal) ----------------
//
// Single-voice sample player. The interaction thread sends commands over a
// bounded channel; the cpal callback owns the voice and fires completions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, Sender, TrySendError};
use guitar_core::{AudioSink, Completion, PlaybackOutcome, SinkError};

use crate::wav::SampleBuffer;

const COMMAND_QUEUE_LEN: usize = 64;

enum AudioCommand {
    Play {
        buffer: Arc<SampleBuffer>,
        on_done: Completion,
    },
    Stop,
}

struct Voice {
    buffer: Arc<SampleBuffer>,
    pos: usize,
    on_done: Option<Completion>,
}

impl Voice {
    fn finish(mut self, outcome: PlaybackOutcome) {
        if let Some(cb) = self.on_done.take() {
            cb(outcome);
        }
    }
}

/// Lives inside the audio callback.
struct Mixer {
    commands: Receiver<AudioCommand>,
    voice: Option<Voice>,
}

impl Mixer {
    fn new(commands: Receiver<AudioCommand>) -> Self {
        Self {
            commands,
            voice: None,
        }
    }

    fn drain_commands(&mut self) {
        while let Ok(cmd) = self.commands.try_recv() {
            if let Some(old) = self.voice.take() {
                old.finish(PlaybackOutcome::Stopped);
            }
            if let AudioCommand::Play { buffer, on_done } = cmd {
                self.voice = Some(Voice {
                    buffer,
                    pos: 0,
                    on_done: Some(on_done),
                });
            }
        }
    }

    fn next_frame(&mut self) -> (f32, f32) {
        let Some(voice) = self.voice.as_mut() else {
            return (0.0, 0.0);
        };
        let frame = voice.buffer.frames[voice.pos];
        voice.pos += 1;
        if voice.pos >= voice.buffer.frames.len() {
            if let Some(done) = self.voice.take() {
                done.finish(PlaybackOutcome::Finished);
            }
        }
        (frame.left, frame.right)
    }
}

impl Drop for Mixer {
    fn drop(&mut self) {
        if let Some(voice) = self.voice.take() {
            voice.finish(PlaybackOutcome::Stopped);
        }
    }
}

/// WAV files on disk played through the default output device.
pub struct CpalSink {
    commands: Sender<AudioCommand>,
    files: HashMap<String, PathBuf>,
    cache: HashMap<String, Arc<SampleBuffer>>,
    sample_rate: u32,
    // dropped last; stops the callback
    stream: Option<cpal::Stream>,
}

impl CpalSink {
    /// Index `dir` and open the output stream. Without an output device the
    /// sink still accepts hits and reports every sample as failed.
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        let files = index_samples(dir)?;
        log::info!("[audio] {} samples found in {}", files.len(), dir.display());

        let (tx, rx) = crossbeam_channel::bounded(COMMAND_QUEUE_LEN);
        let (stream, sample_rate) = match start_output(rx) {
            Ok(pair) => (Some(pair.0), pair.1),
            Err(e) => {
                log::error!("[audio] output unavailable: {:#}", e);
                (None, 48_000)
            }
        };

        Ok(Self {
            commands: tx,
            files,
            cache: HashMap::new(),
            sample_rate,
            stream,
        })
    }

    fn buffer(&mut self, resource: &str) -> Result<Arc<SampleBuffer>, SinkError> {
        if let Some(buf) = self.cache.get(resource) {
            return Ok(Arc::clone(buf));
        }
        let path = self
            .files
            .get(resource)
            .ok_or_else(|| SinkError::NotFound(resource.to_string()))?;
        let buf = SampleBuffer::load_wav(path, self.sample_rate)
            .map(Arc::new)
            .map_err(|e| SinkError::Decode(format!("{:#}", e)))?;
        log::debug!(
            "[audio] decoded {} ({} frames)",
            resource,
            buf.frames.len()
        );
        self.cache.insert(resource.to_string(), Arc::clone(&buf));
        Ok(buf)
    }
}

impl AudioSink for CpalSink {
    fn has_resource(&self, resource: &str) -> bool {
        self.files.contains_key(resource)
    }

    fn play(&mut self, resource: &str, on_done: Completion) -> Result<(), SinkError> {
        let buffer = self.buffer(resource)?;
        if self.stream.is_none() {
            on_done(PlaybackOutcome::Failed("no audio output device".into()));
            return Ok(());
        }
        match self.commands.try_send(AudioCommand::Play { buffer, on_done }) {
            Ok(()) => {}
            Err(TrySendError::Full(cmd)) | Err(TrySendError::Disconnected(cmd)) => {
                if let AudioCommand::Play { on_done, .. } = cmd {
                    on_done(PlaybackOutcome::Failed("audio queue unavailable".into()));
                }
            }
        }
        Ok(())
    }

    fn stop(&mut self) {
        if self.stream.is_some() {
            let _ = self.commands.try_send(AudioCommand::Stop);
        }
    }
}

fn index_samples(dir: &Path) -> anyhow::Result<HashMap<String, PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("cannot read sample directory {}", dir.display()))?;
    let mut files = HashMap::new();
    for entry in entries {
        let path = entry?.path();
        let is_wav = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("wav"));
        if !is_wav {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            files.insert(stem.to_string(), path.clone());
        }
    }
    Ok(files)
}

fn start_output(commands: Receiver<AudioCommand>) -> anyhow::Result<(cpal::Stream, u32)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow::anyhow!("no output device"))?;
    let config = device.default_output_config()?;
    let sample_rate = config.sample_rate().0;
    let channels = config.channels() as usize;
    log::info!(
        "[audio] output {} Hz, {} channels, {:?}",
        sample_rate,
        channels,
        config.sample_format()
    );

    let err_fn = |err| log::error!("[audio] stream error: {err}");
    let mixer = Mixer::new(commands);

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => {
            build_stream_f32(&device, &config.into(), channels, mixer, err_fn)?
        }
        cpal::SampleFormat::I16 => {
            build_stream_i16(&device, &config.into(), channels, mixer, err_fn)?
        }
        cpal::SampleFormat::U16 => {
            build_stream_u16(&device, &config.into(), channels, mixer, err_fn)?
        }
        other => anyhow::bail!("unsupported sample format {:?}", other),
    };

    stream.play()?;
    Ok((stream, sample_rate))
}

fn build_stream_f32(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    mut mixer: Mixer,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    device.build_output_stream(
        config,
        move |data: &mut [f32], _| {
            mixer.drain_commands();
            for frame in data.chunks_mut(channels) {
                let (l, r) = mixer.next_frame();
                write_frame(frame, l, r);
            }
        },
        err_fn,
        None,
    )
}

fn build_stream_i16(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    mut mixer: Mixer,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    device.build_output_stream(
        config,
        move |data: &mut [i16], _| {
            mixer.drain_commands();
            for frame in data.chunks_mut(channels) {
                let (l, r) = mixer.next_frame();
                let vl = (l.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                let vr = (r.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
                if frame.len() >= 2 {
                    frame[0] = vl;
                    frame[1] = vr;
                } else if let Some(s) = frame.first_mut() {
                    *s = ((vl as i32 + vr as i32) / 2) as i16;
                }
            }
        },
        err_fn,
        None,
    )
}

fn build_stream_u16(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    mut mixer: Mixer,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError> {
    device.build_output_stream(
        config,
        move |data: &mut [u16], _| {
            mixer.drain_commands();
            for frame in data.chunks_mut(channels) {
                let (l, r) = mixer.next_frame();
                let vl = (((l * 0.5 + 0.5).clamp(0.0, 1.0)) * u16::MAX as f32) as u16;
                let vr = (((r * 0.5 + 0.5).clamp(0.0, 1.0)) * u16::MAX as f32) as u16;
                if frame.len() >= 2 {
                    frame[0] = vl;
                    frame[1] = vr;
                } else if let Some(s) = frame.first_mut() {
                    *s = ((vl as u32 + vr as u32) / 2) as u16;
                }
            }
        },
        err_fn,
        None,
    )
}

fn write_frame(frame: &mut [f32], l: f32, r: f32) {
    match frame {
        [] => {}
        [mono] => *mono = 0.5 * (l + r),
        [left, right, rest @ ..] => {
            *left = l;
            *right = r;
            rest.fill(0.0);
        }
    }
}
