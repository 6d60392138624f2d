//! core/error.rs
//! Error types for every pipeline stage.
//!
//! - [`SplitError`] is what a split run reports to its caller.
//! - The smaller enums belong to one stage each and get wrapped with the
//!   failing track index on the way up.

use std::path::PathBuf;

use thiserror::Error;

use super::segment::SegmentFault;

/// Failure of a whole split run.
#[derive(Debug, Error)]
pub enum SplitError {
    #[error("track {}: invalid time format '{raw}' (expected mm:ss)", .index + 1)]
    InvalidTimeFormat { index: usize, raw: String },

    #[error("no album loaded")]
    NoAlbumLoaded,

    #[error("track list is empty")]
    EmptyTrackList,

    #[error("invalid output directory {}: {reason}", .path.display())]
    InvalidOutputDirectory { path: PathBuf, reason: String },

    #[error("invalid track boundaries: {}", describe_faults(.0))]
    InvalidSegments(Vec<SegmentFault>),

    #[error("track {}: slice {start_frame}..{end_frame} exceeds album length of {total_frames} frames", .index + 1)]
    SliceOutOfBounds {
        index: usize,
        start_frame: u64,
        end_frame: u64,
        total_frames: u64,
    },

    #[error("output file collision at {}", .path.display())]
    FilenameCollision {
        path: PathBuf,
        /// Index of the earlier track claiming the same path, if the clash is
        /// inside this run rather than with a file already on disk.
        first_index: Option<usize>,
        index: usize,
    },

    #[error("track {}: exported file never appeared at {}", .index + 1, .path.display())]
    MissingSource { index: usize, path: PathBuf },

    #[error("track {}: export failed", .index + 1)]
    ExportFailure {
        index: usize,
        #[source]
        source: ExportError,
    },

    #[error("track {}: tag write failed", .index + 1)]
    TagWriteFailure {
        index: usize,
        #[source]
        source: TagError,
    },

    #[error("cover image could not be used")]
    CoverDecodeFailure(#[source] CoverError),

    #[error("failed to load album")]
    AlbumLoad(#[from] AlbumError),
}

impl SplitError {
    /// Zero-based index of the track this error is about, when there is one.
    pub fn track_index(&self) -> Option<usize> {
        match self {
            SplitError::InvalidTimeFormat { index, .. }
            | SplitError::SliceOutOfBounds { index, .. }
            | SplitError::FilenameCollision { index, .. }
            | SplitError::MissingSource { index, .. }
            | SplitError::ExportFailure { index, .. }
            | SplitError::TagWriteFailure { index, .. } => Some(*index),
            SplitError::InvalidSegments(faults) => faults.first().map(|f| f.index),
            _ => None,
        }
    }
}

fn describe_faults(faults: &[SegmentFault]) -> String {
    faults
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Decoding the album recording failed.
#[derive(Debug, Error)]
pub enum AlbumError {
    #[error("failed to open {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Symphonia(#[from] symphonia::core::errors::Error),

    #[error("no supported audio track found")]
    MissingDefaultTrack,

    #[error("audio stream does not advertise a sample rate")]
    MissingSampleRate,

    #[error("audio stream decoded to zero frames")]
    Empty,
}

/// Writing one track's audio slice to disk failed.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Wav(#[from] hound::Error),

    #[error("mp3 encoder failed: {0}")]
    Mp3(String),
}

/// Embedding tags into one exported file failed.
#[derive(Debug, Error)]
pub enum TagError {
    #[error("source file {} is missing or unreadable", .path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported tag container for {}", .path.display())]
    UnsupportedContainer { path: PathBuf },

    #[error(transparent)]
    Id3(#[from] id3::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to replace {} with the tagged copy", .path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Loading or re-encoding the cover image failed.
#[derive(Debug, Error)]
pub enum CoverError {
    #[error("failed to read cover image {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode cover image {}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to re-encode cover image")]
    Encode(#[source] image::ImageError),
}

/// Reading the TOML album manifest failed.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("manifest {} lists no tracks", .path.display())]
    NoTracks { path: PathBuf },
}
