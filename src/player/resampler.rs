//! Audio resampler using rubato for sample rate and playback speed.
//!
//! Converts decoded audio from the source sample rate (e.g., 44.1kHz) to the
//! output device sample rate (e.g., 48kHz). Playback speed is folded into the
//! same ratio: reading the source faster than real time speeds playback up,
//! and pitch follows.
//!
//! Channel count is adapted on the way out, so a mono file plays on both
//! speakers of a stereo device.

use rubato::{FastFixedIn, PolynomialDegree, Resampler as RubatoResampler};

/// Input frames per rubato call.
const CHUNK_SIZE: usize = 1024;

/// Headroom for speed changes around the device/source ratio.
///
/// Speeds from 0.5x to 2x move the ratio by a factor of two either way;
/// rubato rejects ratios at the exact limit.
const MAX_RATIO_RELATIVE: f64 = 2.5;

/// Streaming resampler wrapper.
///
/// Stays a passthrough while source and device rates match at normal speed.
/// The rubato resampler is created the first time the ratio moves away from
/// 1 and kept from then on, so later speed changes do not click.
pub struct Resampler {
    resampler: Option<FastFixedIn<f32>>,
    input_rate: u32,
    output_rate: u32,
    speed: f32,
    src_channels: usize,
    dst_channels: usize,
    /// Per-channel input waiting for a full chunk
    input_buffer: Vec<Vec<f32>>,
}

impl Resampler {
    pub fn new(input_rate: u32, output_rate: u32, src_channels: usize, dst_channels: usize) -> Self {
        let src_channels = src_channels.max(1);
        let mut resampler = Self {
            resampler: None,
            input_rate: input_rate.max(1),
            output_rate: output_rate.max(1),
            speed: 1.0,
            src_channels,
            dst_channels: dst_channels.max(1),
            input_buffer: vec![Vec::new(); src_channels],
        };
        resampler.apply_ratio();
        resampler
    }

    /// Check if resampling is active.
    pub fn needs_resampling(&self) -> bool {
        self.resampler.is_some()
    }

    /// Output frames per input frame at the current speed.
    pub fn ratio(&self) -> f64 {
        self.output_rate as f64 / (self.input_rate as f64 * self.speed as f64)
    }

    /// Change the playback speed. Non-positive speeds are ignored.
    pub fn set_speed(&mut self, speed: f32) {
        if !(speed.is_finite() && speed > 0.0) || speed == self.speed {
            return;
        }
        self.speed = speed;
        self.apply_ratio();
    }

    fn apply_ratio(&mut self) {
        let ratio = self.ratio();
        match self.resampler.as_mut() {
            Some(resampler) => {
                if let Err(e) = resampler.set_resample_ratio(ratio, false) {
                    tracing::warn!("Cannot change resample ratio to {:.3}: {}", ratio, e);
                }
            }
            None if ratio != 1.0 => {
                let base = self.output_rate as f64 / self.input_rate as f64;
                let created = FastFixedIn::<f32>::new(
                    base,
                    MAX_RATIO_RELATIVE,
                    PolynomialDegree::Cubic,
                    CHUNK_SIZE,
                    self.src_channels,
                );

                match created {
                    Ok(mut resampler) => {
                        if let Err(e) = resampler.set_resample_ratio(ratio, false) {
                            tracing::warn!("Cannot apply speed {}x: {}", self.speed, e);
                        }
                        tracing::info!(
                            "Resampler: {}Hz → {}Hz at {}x ({} channels)",
                            self.input_rate,
                            self.output_rate,
                            self.speed,
                            self.src_channels
                        );
                        self.resampler = Some(resampler);
                    }
                    Err(e) => tracing::warn!("Resampler unavailable, playing unconverted: {}", e),
                }
            }
            None => {}
        }
    }

    /// Process interleaved source samples, returning interleaved device samples.
    pub fn process(&mut self, input: &[f32]) -> Vec<f32> {
        let Some(resampler) = self.resampler.as_mut() else {
            let mut output = Vec::with_capacity(input.len() / self.src_channels * self.dst_channels);
            for frame in input.chunks_exact(self.src_channels) {
                map_channels(frame, self.dst_channels, &mut output);
            }
            return output;
        };

        // Deinterleave input into per-channel buffers
        for frame in input.chunks_exact(self.src_channels) {
            for (buffer, sample) in self.input_buffer.iter_mut().zip(frame) {
                buffer.push(*sample);
            }
        }

        let mut output = Vec::new();
        while self.input_buffer[0].len() >= resampler.input_frames_next() {
            let needed = resampler.input_frames_next();
            let chunk: Vec<Vec<f32>> = self
                .input_buffer
                .iter_mut()
                .map(|buffer| buffer.drain(..needed).collect())
                .collect();

            match resampler.process(chunk.as_slice(), None) {
                Ok(resampled) => interleave(&resampled, usize::MAX, self.dst_channels, &mut output),
                Err(e) => tracing::warn!("Resampling error: {}", e),
            }
        }
        output
    }

    /// Flush samples still waiting for a full chunk. Call at end of stream.
    pub fn flush(&mut self) -> Vec<f32> {
        let ratio = self.ratio();
        let Some(resampler) = self.resampler.as_mut() else {
            return Vec::new();
        };

        let remaining = self.input_buffer[0].len();
        if remaining == 0 {
            return Vec::new();
        }

        let mut output = Vec::new();
        match resampler.process_partial(Some(self.input_buffer.as_slice()), None) {
            Ok(resampled) => {
                // The partial chunk is zero padded; keep only the real part
                let expected = (remaining as f64 * ratio).ceil() as usize;
                interleave(&resampled, expected, self.dst_channels, &mut output);
            }
            Err(e) => tracing::warn!("Resampling flush error: {}", e),
        }
        self.input_buffer.iter_mut().for_each(Vec::clear);
        output
    }

    /// Reset the resampler state (call after seek or load).
    pub fn reset(&mut self) {
        self.input_buffer.iter_mut().for_each(Vec::clear);
        if let Some(resampler) = self.resampler.as_mut() {
            resampler.reset();
        }
    }
}

/// Interleave up to `max_frames` planar frames, remapped to `dst_channels`.
fn interleave(planes: &[Vec<f32>], max_frames: usize, dst_channels: usize, output: &mut Vec<f32>) {
    let frames = planes.first().map_or(0, Vec::len).min(max_frames);
    let mut frame = vec![0.0f32; planes.len()];
    for index in 0..frames {
        for (sample, plane) in frame.iter_mut().zip(planes) {
            *sample = plane[index];
        }
        map_channels(&frame, dst_channels, output);
    }
}

/// Append one frame to `output`, remapped to `dst_channels`.
///
/// Mono is copied to every output channel, extra output channels repeat
/// the source channels in order, and surplus source channels are dropped
/// (except when folding down to mono, which averages).
fn map_channels(frame: &[f32], dst_channels: usize, output: &mut Vec<f32>) {
    let src_channels = frame.len();
    if src_channels == dst_channels {
        output.extend_from_slice(frame);
    } else if dst_channels == 1 {
        output.push(frame.iter().sum::<f32>() / src_channels as f32);
    } else {
        output.extend((0..dst_channels).map(|ch| frame[ch % src_channels]));
    }
}
