//! core/mod.rs
//!
//! Everything that isn't argument parsing:
//! - Decode the album into one sample buffer
//! - Turn start times into non-overlapping segments
//! - Export each segment and embed its tags
//!
//! The run is split into explicit stages so each can be tested on its own:
//!   (A) validate  -> plan_split (no disk writes)
//!   (B) produce   -> split_album (export -> wait -> tag, per track)

pub mod album;
pub mod error;
pub mod export;
pub mod manifest;
pub mod naming;
pub mod pipeline;
pub mod segment;
pub mod tags;
pub mod timecode;
pub mod types;

pub use album::{AlbumSource, load_album};
pub use error::{AlbumError, CoverError, ExportError, ManifestError, SplitError, TagError};
pub use export::{Mp3Exporter, TrackExporter, WavExporter};
pub use manifest::AlbumManifest;
pub use pipeline::{AlbumSplitter, SplitOptions, SplitPlan, plan_split, split_album};
pub use segment::{Segment, plan_segments};
pub use timecode::{format_time, parse_time};
pub use types::{CoverImage, ExportedTrack, TrackDraft, TrackList, TrackSpec, TrackTags};
