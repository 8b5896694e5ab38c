//! Audio output using cpal, fed by a symphonia decoder thread.
//!
//! ```text
//!  UI thread                 decoder thread                cpal callback
//! ───────────               ────────────────              ───────────────
//!  AudioEngine ──commands──▶ fetch, decode,  ──chunks──▶  gain, write to
//!              ◀──events───  convert rate                 the device
//!                    ▲                                          │
//!                    └──────── SharedOutput (RwLock) ◀──────────┘
//! ```
//!
//! Every chunk is stamped with the generation it was decoded for. Loading
//! or seeking bumps the generation, so audio still queued from before is
//! dropped instead of played. The end of a track is a sentinel chunk; the
//! callback flags it once the last real sample has been written and the
//! decoder thread turns the flag into [`MediaEvent::Ended`]. Fetch, open
//! and decode failures are reported as [`MediaEvent::Failed`].
//!
//! Events are stamped with the number of loads the decoder thread has
//! handled, so progress from a previous track that was still in flight
//! when a new one was requested never reaches the orchestrator.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError, bounded, unbounded};
use parking_lot::RwLock;

use super::PlayerError;
use super::decoder::AudioDecoder;
use super::media::{MediaEvent, MediaPrimitive};
use super::resampler::Resampler;
use super::source::{MediaFetcher, extension_hint};
use super::state::PlayerCommand;

/// Decoded chunks buffered ahead of the device.
const CHUNK_QUEUE_DEPTH: usize = 8;

/// Decoder thread wake-up interval while it waits on the device.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Audio engine settings.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Output device name; `None` uses the system default
    pub output_device: Option<String>,
    /// How often progress is reported while playing
    pub tick_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            output_device: None,
            tick_interval: Duration::from_millis(250),
        }
    }
}

/// State read by the output callback.
#[derive(Debug)]
struct SharedOutput {
    playing: bool,
    volume: f32,
    muted: bool,
    speed: f32,
    generation: u64,
    /// Source position of the chunk being played, in seconds
    position: f64,
    /// Set by the callback when it reaches the end-of-stream sentinel
    ended: bool,
}

impl SharedOutput {
    fn gain(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }
}

impl Default for SharedOutput {
    fn default() -> Self {
        Self {
            playing: false,
            volume: 1.0,
            muted: false,
            speed: 1.0,
            generation: 0,
            position: 0.0,
            ended: false,
        }
    }
}

/// A run of device-ready samples.
struct AudioChunk {
    samples: Vec<f32>,
    timestamp: f64,
    generation: u64,
    end_of_stream: bool,
}

/// The cpal-backed media primitive.
pub struct AudioEngine {
    shared: Arc<RwLock<SharedOutput>>,
    command_tx: Sender<PlayerCommand>,
    event_rx: Receiver<(u64, MediaEvent)>,
    /// Loads requested so far; events stamped otherwise are stale
    loads_requested: u64,
    _stream: Stream,
    decoder_thread: JoinHandle<()>,
}

impl AudioEngine {
    /// Open the output device and start the decoder thread.
    pub fn new(config: &EngineConfig) -> Result<Self, PlayerError> {
        let host = cpal::default_host();
        let device = select_device(&host, config.output_device.as_deref())?;

        let device_name = device.name().unwrap_or_else(|_| "Unknown".to_string());
        tracing::info!("Using audio device: {}", device_name);

        let supported_config = device
            .default_output_config()
            .map_err(|e| PlayerError::AudioInit(e.to_string()))?;

        let sample_rate = supported_config.sample_rate().0;
        let channels = supported_config.channels();
        tracing::info!("Audio format: {}Hz, {} channels", sample_rate, channels);

        let stream_config = StreamConfig {
            channels,
            sample_rate: supported_config.sample_rate(),
            buffer_size: cpal::BufferSize::Default,
        };

        let shared = Arc::new(RwLock::new(SharedOutput::default()));
        let (command_tx, command_rx) = bounded::<PlayerCommand>(32);
        let (event_tx, event_rx) = unbounded::<(u64, MediaEvent)>();
        let (audio_tx, audio_rx) = bounded::<AudioChunk>(CHUNK_QUEUE_DEPTH);

        let context = DecoderContext::new(
            Arc::clone(&shared),
            audio_tx,
            audio_rx.clone(),
            event_tx,
            sample_rate,
            channels as usize,
            config.tick_interval,
        );

        let decoder_thread = thread::Builder::new()
            .name("audio-decoder".to_string())
            .spawn(move || decoder_thread_main(context, command_rx))
            .map_err(|e| PlayerError::AudioInit(e.to_string()))?;

        let callback_shared = Arc::clone(&shared);
        let stream = match supported_config.sample_format() {
            SampleFormat::F32 => {
                build_stream::<f32>(&device, &stream_config, audio_rx, callback_shared)
            }
            SampleFormat::I16 => {
                build_stream::<i16>(&device, &stream_config, audio_rx, callback_shared)
            }
            SampleFormat::U16 => {
                build_stream::<u16>(&device, &stream_config, audio_rx, callback_shared)
            }
            format => {
                return Err(PlayerError::AudioInit(format!(
                    "Unsupported sample format: {:?}",
                    format
                )));
            }
        }
        .map_err(|e| PlayerError::AudioInit(e.to_string()))?;

        stream
            .play()
            .map_err(|e| PlayerError::AudioInit(e.to_string()))?;

        Ok(Self {
            shared,
            command_tx,
            event_rx,
            loads_requested: 0,
            _stream: stream,
            decoder_thread,
        })
    }

    fn send(&self, command: PlayerCommand) -> Result<(), PlayerError> {
        self.command_tx
            .send(command)
            .map_err(|_| PlayerError::ChannelClosed)
    }
}

impl MediaPrimitive for AudioEngine {
    fn is_ready(&self) -> bool {
        !self.decoder_thread.is_finished()
    }

    fn load(&mut self, url: &str) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Load(url.to_string()))?;
        self.loads_requested += 1;
        Ok(())
    }

    fn play(&mut self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Play)
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Pause)
    }

    fn seek(&mut self, seconds: f64) -> Result<(), PlayerError> {
        self.send(PlayerCommand::Seek(seconds))
    }

    fn set_volume(&mut self, volume: f32) -> Result<(), PlayerError> {
        self.shared.write().volume = volume.clamp(0.0, 1.0);
        Ok(())
    }

    fn set_muted(&mut self, muted: bool) -> Result<(), PlayerError> {
        self.shared.write().muted = muted;
        Ok(())
    }

    fn set_playback_rate(&mut self, rate: f32) -> Result<(), PlayerError> {
        self.shared.write().speed = rate;
        Ok(())
    }

    fn drain_events(&mut self) -> Vec<MediaEvent> {
        current_events(&self.event_rx, self.loads_requested)
    }
}

/// Drain `event_rx`, keeping only events stamped with the `current` load.
fn current_events(event_rx: &Receiver<(u64, MediaEvent)>, current: u64) -> Vec<MediaEvent> {
    event_rx
        .try_iter()
        .filter(|(stamp, _)| *stamp == current)
        .map(|(_, event)| event)
        .collect()
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        let _ = self.command_tx.try_send(PlayerCommand::Shutdown);
    }
}

/// Pick the configured output device, falling back to the default.
fn select_device(host: &cpal::Host, wanted: Option<&str>) -> Result<Device, PlayerError> {
    let devices: Vec<Device> = host
        .output_devices()
        .map_err(|e| PlayerError::AudioInit(e.to_string()))?
        .collect();

    for device in &devices {
        if let Ok(name) = device.name() {
            tracing::debug!("Available audio device: {}", name);
        }
    }

    if let Some(wanted) = wanted {
        if let Some(device) = devices
            .iter()
            .find(|d| d.name().is_ok_and(|name| name == wanted))
        {
            return Ok(device.clone());
        }
        tracing::warn!("Audio device {:?} not found, using default", wanted);
    }

    host.default_output_device()
        .ok_or_else(|| PlayerError::AudioInit("No output device found".to_string()))
}

fn build_stream<T>(
    device: &Device,
    config: &StreamConfig,
    audio_rx: Receiver<AudioChunk>,
    shared: Arc<RwLock<SharedOutput>>,
) -> Result<Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    // Chunk being played and the read offset into it
    let mut current: Option<(AudioChunk, usize)> = None;

    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let silence = T::from_sample(0.0f32);
            let (playing, gain, generation) = {
                let s = shared.read();
                (s.playing, s.gain(), s.generation)
            };

            if !playing {
                data.fill(silence);
                return;
            }

            if current
                .as_ref()
                .is_some_and(|(chunk, _)| chunk.generation != generation)
            {
                current = None;
            }

            let mut output_pos = 0;
            while output_pos < data.len() {
                if current.is_none() {
                    match audio_rx.try_recv() {
                        Ok(chunk) if chunk.generation != generation => continue,
                        Ok(chunk) => {
                            shared.write().position = chunk.timestamp;
                            current = Some((chunk, 0));
                        }
                        Err(_) => {
                            // Underrun
                            data[output_pos..].fill(silence);
                            return;
                        }
                    }
                }

                if let Some((chunk, chunk_pos)) = current.as_mut() {
                    let to_copy = (chunk.samples.len() - *chunk_pos).min(data.len() - output_pos);
                    let source = &chunk.samples[*chunk_pos..*chunk_pos + to_copy];
                    for (out, sample) in data[output_pos..output_pos + to_copy].iter_mut().zip(source)
                    {
                        *out = T::from_sample(sample * gain);
                    }

                    *chunk_pos += to_copy;
                    output_pos += to_copy;

                    if *chunk_pos >= chunk.samples.len() {
                        let finished = chunk.end_of_stream;
                        current = None;
                        if finished {
                            shared.write().ended = true;
                            data[output_pos..].fill(silence);
                            return;
                        }
                    }
                }
            }
        },
        |err| {
            tracing::error!("Audio stream error: {}", err);
        },
        None,
    )
}

/// Media that has been fetched and can be reopened.
struct LoadedMedia {
    url: String,
    bytes: Arc<[u8]>,
    extension: Option<String>,
}

/// Decoder thread state.
struct DecoderContext {
    shared: Arc<RwLock<SharedOutput>>,
    audio_tx: Sender<AudioChunk>,
    /// Kept to discard queued chunks when the generation changes
    audio_rx: Receiver<AudioChunk>,
    event_tx: Sender<(u64, MediaEvent)>,
    loads_handled: u64,
    /// Created on first use, on this thread
    fetcher: Option<MediaFetcher>,
    device_rate: u32,
    device_channels: usize,
    media: Option<LoadedMedia>,
    /// `None` once the track has been decoded to the end
    decoder: Option<AudioDecoder>,
    resampler: Resampler,
    /// Chunk that did not fit in the queue yet
    backlog: Option<AudioChunk>,
    tick_interval: Duration,
    last_tick: Instant,
}

impl DecoderContext {
    fn new(
        shared: Arc<RwLock<SharedOutput>>,
        audio_tx: Sender<AudioChunk>,
        audio_rx: Receiver<AudioChunk>,
        event_tx: Sender<(u64, MediaEvent)>,
        device_rate: u32,
        device_channels: usize,
        tick_interval: Duration,
    ) -> Self {
        Self {
            shared,
            audio_tx,
            audio_rx,
            event_tx,
            loads_handled: 0,
            fetcher: None,
            device_rate,
            device_channels,
            media: None,
            decoder: None,
            resampler: Resampler::new(device_rate, device_rate, device_channels, device_channels),
            backlog: None,
            tick_interval,
            last_tick: Instant::now(),
        }
    }

    /// Handle a player command, returning whether to continue running.
    fn handle_command(&mut self, cmd: PlayerCommand) -> bool {
        match cmd {
            PlayerCommand::Load(url) => self.load(url),
            PlayerCommand::Play => self.play(),
            PlayerCommand::Pause => self.shared.write().playing = false,
            PlayerCommand::Seek(seconds) => self.seek(seconds),
            PlayerCommand::Shutdown => return false,
        }
        true
    }

    fn load(&mut self, url: String) {
        self.loads_handled += 1;
        self.flush(0.0);
        self.shared.write().playing = false;
        self.media = None;
        self.decoder = None;

        let fetcher = self.fetcher.get_or_insert_with(MediaFetcher::new);
        let bytes = match fetcher.fetch(&url) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Failed to fetch media: {}", e);
                self.emit(MediaEvent::Failed(e));
                return;
            }
        };

        let media = LoadedMedia {
            extension: extension_hint(&url),
            url,
            bytes,
        };
        match AudioDecoder::open(Arc::clone(&media.bytes), media.extension.as_deref()) {
            Ok(dec) => {
                tracing::info!(
                    "Loaded {} ({}Hz, {} channels, {:.1}s)",
                    media.url,
                    dec.sample_rate(),
                    dec.channels(),
                    dec.duration()
                );
                if dec.duration() > 0.0 {
                    self.emit(MediaEvent::Loaded {
                        duration_seconds: dec.duration(),
                    });
                }
                self.resampler = Resampler::new(
                    dec.sample_rate(),
                    self.device_rate,
                    dec.channels() as usize,
                    self.device_channels,
                );
                self.decoder = Some(dec);
                self.media = Some(media);
            }
            Err(e) => {
                tracing::error!("Failed to open {}: {}", media.url, e);
                self.emit(MediaEvent::Failed(e));
            }
        }
    }

    fn play(&mut self) {
        if self.media.is_none() {
            tracing::debug!("Play requested with no media loaded");
            self.emit(MediaEvent::Failed(PlayerError::NoMedia));
            return;
        }
        // Played through to the end: start over
        if self.decoder.is_none() && !self.reopen() {
            return;
        }
        let mut shared = self.shared.write();
        shared.playing = true;
        shared.ended = false;
    }

    fn seek(&mut self, seconds: f64) {
        if self.media.is_none() {
            return;
        }
        if self.decoder.is_none() && !self.reopen() {
            return;
        }
        let Some(dec) = self.decoder.as_mut() else {
            return;
        };
        match dec.seek(seconds) {
            Ok(reached) => {
                tracing::debug!("Seeked to {:.2}s", reached);
                self.flush(reached);
            }
            Err(e) => {
                tracing::warn!("Seek failed: {}", e);
                self.emit(MediaEvent::Failed(e));
            }
        }
    }

    /// Reopen the current media from its cached bytes.
    fn reopen(&mut self) -> bool {
        let Some(media) = self.media.as_ref() else {
            return false;
        };
        match AudioDecoder::open(Arc::clone(&media.bytes), media.extension.as_deref()) {
            Ok(dec) => {
                self.decoder = Some(dec);
                self.flush(0.0);
                true
            }
            Err(e) => {
                tracing::error!("Failed to reopen {}: {}", media.url, e);
                self.emit(MediaEvent::Failed(e));
                false
            }
        }
    }

    /// Invalidate queued audio and restart from `position`.
    fn flush(&mut self, position: f64) {
        {
            let mut shared = self.shared.write();
            shared.generation += 1;
            shared.position = position;
            shared.ended = false;
        }
        self.audio_rx.try_iter().for_each(drop);
        self.backlog = None;
        self.resampler.reset();
    }

    fn emit(&self, event: MediaEvent) {
        let _ = self.event_tx.send((self.loads_handled, event));
    }

    /// Turn the callback's end-of-stream flag into an event.
    fn check_ended(&mut self) {
        let ended = {
            let mut shared = self.shared.write();
            let ended = shared.ended;
            if ended {
                shared.ended = false;
                shared.playing = false;
            }
            ended
        };
        if ended {
            tracing::info!("Playback finished");
            self.emit(MediaEvent::Ended);
        }
    }

    fn report_progress(&mut self) {
        if self.last_tick.elapsed() < self.tick_interval {
            return;
        }
        self.last_tick = Instant::now();
        let (playing, position) = {
            let shared = self.shared.read();
            (shared.playing, shared.position)
        };
        if playing {
            self.emit(MediaEvent::TimeUpdate(position));
        }
    }

    fn can_decode(&self) -> bool {
        self.backlog.is_none() && self.decoder.is_some()
    }

    /// Queue one more chunk for the device. Returns false if the output is gone.
    fn fill(&mut self) -> bool {
        if let Some(chunk) = self.backlog.take() {
            return self.offer(chunk);
        }
        let Some(dec) = self.decoder.as_mut() else {
            return true;
        };

        let chunk = match dec.decode_next() {
            Ok(Some(frame)) => {
                let speed = self.shared.read().speed;
                self.resampler.set_speed(speed);
                let samples = self.resampler.process(&frame.samples);
                if samples.is_empty() {
                    return true;
                }
                AudioChunk {
                    samples,
                    timestamp: frame.timestamp,
                    generation: self.shared.read().generation,
                    end_of_stream: false,
                }
            }
            Ok(None) => self.end_of_stream(),
            Err(e) => {
                // Whatever decoded so far still plays out, then the track ends
                tracing::error!("Decode error: {}", e);
                self.emit(MediaEvent::Failed(e));
                self.end_of_stream()
            }
        };
        self.offer(chunk)
    }

    /// The sentinel chunk, carrying whatever the resampler still held.
    fn end_of_stream(&mut self) -> AudioChunk {
        self.decoder = None;
        let samples = self.resampler.flush();
        let shared = self.shared.read();
        AudioChunk {
            samples,
            timestamp: shared.position,
            generation: shared.generation,
            end_of_stream: true,
        }
    }

    fn offer(&mut self, chunk: AudioChunk) -> bool {
        match self.audio_tx.try_send(chunk) {
            Ok(()) => true,
            Err(TrySendError::Full(chunk)) => {
                self.backlog = Some(chunk);
                true
            }
            Err(TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Main loop for the decoder thread.
fn decoder_thread_main(mut ctx: DecoderContext, command_rx: Receiver<PlayerCommand>) {
    loop {
        let playing = ctx.shared.read().playing;

        // Block on commands when idle, poll when playing
        let command = if !playing {
            match command_rx.recv() {
                Ok(cmd) => Some(cmd),
                Err(_) => break,
            }
        } else {
            let wait = if ctx.can_decode() {
                Duration::ZERO
            } else {
                POLL_INTERVAL
            };
            match command_rx.recv_timeout(wait) {
                Ok(cmd) => Some(cmd),
                Err(RecvTimeoutError::Timeout) => None,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        };

        if let Some(cmd) = command
            && !ctx.handle_command(cmd)
        {
            break;
        }

        ctx.check_ended();
        ctx.report_progress();

        if ctx.shared.read().playing && !ctx.fill() {
            break;
        }
    }
    tracing::debug!("Decoder thread stopped");
}
