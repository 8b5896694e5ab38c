//! Audio decoder using symphonia for multi-format support.
//!
//! Supported formats:
//! - MP3
//! - FLAC
//! - OGG Vorbis
//! - WAV/PCM
//! - AAC (in MP4 container)

use std::io::Cursor;
use std::sync::Arc;

use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{CODEC_TYPE_NULL, Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::{Time, TimeBase};

use super::PlayerError;

/// Audio decoder wrapper for symphonia.
pub struct AudioDecoder {
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    channels: u16,
    /// Total length in seconds, zero when the container does not say
    duration: f64,
    time_base: Option<TimeBase>,
}

impl AudioDecoder {
    /// Open in-memory media for decoding.
    ///
    /// `extension` is a format hint taken from the media URL.
    pub fn open(bytes: Arc<[u8]>, extension: Option<&str>) -> Result<Self, PlayerError> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

        // Detect the container format
        let mut hint = Hint::new();
        if let Some(ext) = extension {
            hint.with_extension(ext);
        }

        let format_opts = FormatOptions {
            enable_gapless: true,
            ..Default::default()
        };
        let metadata_opts = MetadataOptions::default();

        let detected = symphonia::default::get_probe()
            .format(&hint, mss, &format_opts, &metadata_opts)
            .map_err(|e| PlayerError::UnsupportedFormat(e.to_string()))?;

        let reader = detected.format;

        // Find the first audio track
        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| PlayerError::UnsupportedFormat("No audio track found".to_string()))?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| PlayerError::Decode("Unknown sample rate".to_string()))?;
        let channels = codec_params.channels.map(|c| c.count() as u16).unwrap_or(2);

        let time_base = codec_params.time_base;
        let duration = match (codec_params.n_frames, time_base) {
            (Some(n_frames), Some(tb)) => seconds(tb.calc_time(n_frames)),
            (Some(n_frames), None) => n_frames as f64 / sample_rate as f64,
            (None, _) => 0.0,
        };

        let decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| PlayerError::Decode(e.to_string()))?;

        Ok(Self {
            reader,
            decoder,
            track_id,
            sample_rate,
            channels,
            duration,
            time_base,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Total duration in seconds (zero if unknown).
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Seek to an absolute position in seconds.
    ///
    /// Returns the position actually reached.
    pub fn seek(&mut self, position: f64) -> Result<f64, PlayerError> {
        let target = if self.duration > 0.0 {
            position.clamp(0.0, self.duration)
        } else {
            position.max(0.0)
        };

        let seek_to = SeekTo::Time {
            time: Time::from(target),
            track_id: Some(self.track_id),
        };

        let seeked = self
            .reader
            .seek(SeekMode::Accurate, seek_to)
            .map_err(|e| PlayerError::Decode(format!("Seek failed: {}", e)))?;

        // Reset decoder state after seeking
        self.decoder.reset();

        Ok(self
            .time_base
            .map(|tb| seconds(tb.calc_time(seeked.actual_ts)))
            .unwrap_or(target))
    }

    /// Decode the next packet into interleaved f32 samples.
    ///
    /// Returns `Ok(None)` at end of stream.
    pub fn decode_next(&mut self) -> Result<Option<DecodedFrame>, PlayerError> {
        loop {
            let packet = match self.reader.next_packet() {
                Ok(p) => p,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return Ok(None);
                }
                Err(SymphoniaError::ResetRequired) => {
                    self.decoder.reset();
                    continue;
                }
                Err(e) => return Err(PlayerError::Decode(e.to_string())),
            };

            // Skip packets from other tracks
            if packet.track_id() != self.track_id {
                continue;
            }

            let timestamp = self
                .time_base
                .map(|tb| seconds(tb.calc_time(packet.ts())))
                .unwrap_or(0.0);

            let decoded = match self.decoder.decode(&packet) {
                Ok(d) => d,
                Err(SymphoniaError::DecodeError(_)) => continue, // Skip bad frame
                Err(e) => return Err(PlayerError::Decode(e.to_string())),
            };

            return Ok(Some(DecodedFrame {
                samples: interleave(&decoded),
                timestamp,
            }));
        }
    }
}

fn seconds(time: Time) -> f64 {
    time.seconds as f64 + time.frac
}

/// Convert a planar audio buffer to interleaved f32 samples.
fn interleave(buffer: &AudioBufferRef) -> Vec<f32> {
    fn collect<S: Copy>(planes: &[&[S]], frames: usize, to_f32: impl Fn(S) -> f32) -> Vec<f32> {
        let mut output = Vec::with_capacity(frames * planes.len());
        for frame in 0..frames {
            for plane in planes {
                output.push(to_f32(plane[frame]));
            }
        }
        output
    }

    match buffer {
        AudioBufferRef::F32(buf) => collect(buf.planes().planes(), buf.frames(), |s| s),
        AudioBufferRef::S16(buf) => {
            collect(buf.planes().planes(), buf.frames(), |s| s as f32 / 32768.0)
        }
        AudioBufferRef::S24(buf) => {
            collect(buf.planes().planes(), buf.frames(), |s| s.0 as f32 / 8388608.0)
        }
        AudioBufferRef::S32(buf) => {
            collect(buf.planes().planes(), buf.frames(), |s| s as f32 / 2147483648.0)
        }
        AudioBufferRef::U8(buf) => {
            collect(buf.planes().planes(), buf.frames(), |s| (s as f32 - 128.0) / 128.0)
        }
        _ => Vec::new(),
    }
}

/// One decoded packet.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    /// Interleaved samples at the source rate and channel count
    pub samples: Vec<f32>,
    /// Position of the first sample, in seconds
    pub timestamp: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::wav_bytes;

    #[test]
    fn test_decoder_rejects_garbage() {
        let result = AudioDecoder::open(Arc::from(&b"not audio at all"[..]), Some("mp3"));
        assert!(matches!(result, Err(PlayerError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_decode_wav() {
        let mut dec = AudioDecoder::open(wav_bytes(8000, 16000), Some("wav")).unwrap();
        assert_eq!(dec.sample_rate(), 8000);
        assert_eq!(dec.channels(), 2);
        assert!((dec.duration() - 2.0).abs() < 1e-6);

        let mut total = 0;
        while let Some(frame) = dec.decode_next().unwrap() {
            assert_eq!(frame.samples.len() % 2, 0);
            total += frame.samples.len() / 2;
        }
        assert_eq!(total, 16000);
    }

    #[test]
    fn test_seek_wav() {
        let mut dec = AudioDecoder::open(wav_bytes(8000, 16000), None).unwrap();
        let reached = dec.seek(1.0).unwrap();
        assert!((reached - 1.0).abs() < 0.1);

        let frame = dec.decode_next().unwrap().unwrap();
        assert!((frame.timestamp - 1.0).abs() < 0.1);
    }
}
