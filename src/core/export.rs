//! core/export.rs
//! Writing one audio slice to its own file.
//!
//! - [`TrackExporter`] is the seam: the pipeline only knows "write these
//!   frames to that path, using this extension".
//! - [`WavExporter`] writes 16-bit PCM via hound.
//! - [`Mp3Exporter`] encodes with LAME at a constant bitrate.
//! - [`wait_for_file`] is the bounded poll between export and tagging.

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use hound::{SampleFormat, WavSpec, WavWriter};
use log::debug;
use mp3lame_encoder::{Bitrate, Builder, FlushNoGap, InterleavedPcm, MonoPcm, Quality};

use super::error::ExportError;

/// Encodes interleaved `f32` samples into a standalone file.
pub trait TrackExporter {
    /// File extension (without the dot) of the files this exporter writes.
    fn extension(&self) -> &str;

    fn export(
        &self,
        samples: &[f32],
        sample_rate: u32,
        channels: u16,
        path: &Path,
    ) -> Result<(), ExportError>;
}

/// 16-bit integer PCM WAV.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavExporter;

impl TrackExporter for WavExporter {
    fn extension(&self) -> &str {
        "wav"
    }

    fn export(
        &self,
        samples: &[f32],
        sample_rate: u32,
        channels: u16,
        path: &Path,
    ) -> Result<(), ExportError> {
        let spec = WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut writer = WavWriter::create(path, spec)?;
        for &sample in samples {
            writer.write_sample(to_i16(sample))?;
        }
        writer.finalize()?;
        Ok(())
    }
}

/// Constant-bitrate MP3 (LAME).
#[derive(Debug, Clone, Copy)]
pub struct Mp3Exporter {
    pub bitrate_kbps: u32,
}

impl Default for Mp3Exporter {
    fn default() -> Self {
        Self { bitrate_kbps: 192 }
    }
}

impl Mp3Exporter {
    pub fn new(bitrate_kbps: u32) -> Self {
        Self { bitrate_kbps }
    }

    fn bitrate(&self) -> Bitrate {
        match self.bitrate_kbps {
            128 => Bitrate::Kbps128,
            160 => Bitrate::Kbps160,
            256 => Bitrate::Kbps256,
            320 => Bitrate::Kbps320,
            _ => Bitrate::Kbps192,
        }
    }
}

impl TrackExporter for Mp3Exporter {
    fn extension(&self) -> &str {
        "mp3"
    }

    fn export(
        &self,
        samples: &[f32],
        sample_rate: u32,
        channels: u16,
        path: &Path,
    ) -> Result<(), ExportError> {
        if !(1..=2).contains(&channels) {
            return Err(ExportError::Mp3(format!("{channels} channels (mono or stereo only)")));
        }
        let mp3 = |stage: &str, e: &dyn std::fmt::Debug| ExportError::Mp3(format!("{stage}: {e:?}"));

        let mut builder = Builder::new().ok_or_else(|| mp3("init", &"lame_init failed"))?;
        builder
            .set_sample_rate(sample_rate)
            .map_err(|e| mp3("sample rate", &e))?;
        builder
            .set_num_channels(channels as u8)
            .map_err(|e| mp3("channels", &e))?;
        builder.set_brate(self.bitrate()).map_err(|e| mp3("bitrate", &e))?;
        builder.set_quality(Quality::Good).map_err(|e| mp3("quality", &e))?;
        let mut encoder = builder.build().map_err(|e| mp3("build", &e))?;

        let pcm: Vec<i16> = samples.iter().map(|&s| to_i16(s)).collect();

        let mut out = Vec::new();
        out.reserve(mp3lame_encoder::max_required_buffer_size(pcm.len()));
        let encoded = if channels == 1 {
            encoder.encode_to_vec(MonoPcm(&pcm), &mut out)
        } else {
            encoder.encode_to_vec(InterleavedPcm(&pcm), &mut out)
        };
        encoded.map_err(|e| mp3("encode", &e))?;

        // LAME flushes at most one frame plus its internal buffer.
        out.reserve(7200);
        encoder
            .flush_to_vec::<FlushNoGap>(&mut out)
            .map_err(|e| mp3("flush", &e))?;

        std::fs::write(path, &out)?;
        Ok(())
    }
}

fn to_i16(sample: f32) -> i16 {
    (sample * i16::MAX as f32).clamp(i16::MIN as f32, i16::MAX as f32) as i16
}

/// Poll until `path` exists, giving up after `timeout`.
///
/// Returns whether the file showed up. Always checks at least once, even with a
/// zero timeout.
pub fn wait_for_file(path: &Path, timeout: Duration, interval: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        if path.exists() {
            if attempts > 1 {
                debug!("{} appeared after {attempts} checks", path.display());
            }
            return true;
        }

        let now = Instant::now();
        if now >= deadline {
            return false;
        }
        thread::sleep(interval.min(deadline - now));
    }
}
