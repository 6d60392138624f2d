//! core/tags/mod.rs
//!
//! ID3 tag writing and read-back for exported tracks.
//! Public API:
//! - [`write_track_tags`] embeds title/album/artist/track number (+ cover) in place.
//! - [`read_track_tags`] reads those fields back.
//! - [`load_cover`] turns any common raster image into the canonical embedded cover.
//! - [`read_embedded_cover`] returns the front cover currently in a file.
//!
//! The tag version is pinned to [`TAG_VERSION`] so identical inputs always
//! produce identical tags.

mod art;
mod read;
mod util;
mod write;

pub use art::{COVER_DESCRIPTION, COVER_MIME, load_cover, read_embedded_cover};
pub use read::{picture_count, read_track_tags};
pub use util::TagContainer;
pub use write::write_track_tags;

/// ID3v2.4: the first revision where text frames may declare UTF-8.
pub const TAG_VERSION: id3::Version = id3::Version::Id3v24;
