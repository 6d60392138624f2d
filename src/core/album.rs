//! core/album.rs
//! Loading the album recording (Symphonia) into one immutable sample buffer.
//!
//! The whole recording is decoded up front to interleaved `f32`. Slices handed
//! to exporters are borrowed views of that buffer, so tracks never overlap and
//! nothing mutates the album during a run.

use std::fs::File;
use std::ops::Range;
use std::path::{Path, PathBuf};

use log::{debug, info};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::error::{AlbumError, SplitError};
use super::segment::Segment;

/// The decoded album. Replaced wholesale when a different file is loaded.
#[derive(Debug, Clone)]
pub struct AlbumSource {
    path: PathBuf,
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl AlbumSource {
    /// Wrap an already-decoded interleaved buffer.
    pub fn from_samples(
        path: impl Into<PathBuf>,
        samples: Vec<f32>,
        sample_rate: u32,
        channels: u16,
    ) -> Self {
        Self {
            path: path.into(),
            samples,
            sample_rate,
            channels,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Number of frames (one sample per channel).
    pub fn total_frames(&self) -> u64 {
        match self.channels {
            0 => 0,
            c => (self.samples.len() / usize::from(c)) as u64,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.total_frames() as f64 / f64::from(self.sample_rate)
    }

    /// Frame range and interleaved samples for one planned segment.
    pub fn slice(&self, segment: &Segment) -> Result<(Range<u64>, &[f32]), SplitError> {
        let frames = segment.frame_range(self.sample_rate, self.total_frames())?;
        let chans = usize::from(self.channels);
        let start = frames.start as usize * chans;
        let end = frames.end as usize * chans;
        Ok((frames, &self.samples[start..end]))
    }
}

/// Decode an audio file into an [`AlbumSource`].
///
/// Corrupt packets are skipped the same way a player would skip them; any other
/// decoder error aborts the load.
pub fn load_album(path: &Path) -> Result<AlbumSource, AlbumError> {
    let file = File::open(path).map_err(|source| AlbumError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .default_track()
        .filter(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(AlbumError::MissingDefaultTrack)?;
    let track_id = track.id;
    let codec_params = track.codec_params.clone();

    let mut decoder =
        symphonia::default::get_codecs().make(&codec_params, &DecoderOptions::default())?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_rate = codec_params.sample_rate;
    let mut channels = codec_params.channels.map(|c| c.count() as u16);
    let mut skipped = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            // End of stream surfaces as an unexpected EOF.
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(_)) => {
                skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let spec = *decoded.spec();
        sample_rate = Some(spec.rate);
        channels = Some(spec.channels.count() as u16);

        let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(buf.samples());
    }

    let sample_rate = sample_rate.ok_or(AlbumError::MissingSampleRate)?;
    let channels = channels.unwrap_or(1);
    if samples.is_empty() {
        return Err(AlbumError::Empty);
    }
    if skipped > 0 {
        debug!("skipped {skipped} corrupt packets in {}", path.display());
    }

    let album = AlbumSource::from_samples(path, samples, sample_rate, channels);
    info!(
        "loaded album {}: {} Hz, {} ch, {:.3}s",
        path.display(),
        album.sample_rate(),
        album.channels(),
        album.duration_secs()
    );
    Ok(album)
}
