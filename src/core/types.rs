//! Core data types shared between the pipeline stages and the CLI.
//!
//! Rule of thumb:
//! - These structs should be "boring bags of data"
//! - No filesystem code
//! - No tag parsing code
//!
//! Two kinds of track record live here:
//! - [`TrackDraft`] is edit state: raw strings exactly as a user typed them.
//! - [`TrackSpec`] is compute state: parsed once by [`TrackList::freeze`] and
//!   then only read for the duration of a split run.

use std::ops::Range;
use std::path::PathBuf;

use super::error::SplitError;
use super::timecode::{format_time, parse_time};

/// One track as entered by the user, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackDraft {
    /// `mm:ss`
    pub start_time: String,
    pub title: String,
    pub album: String,
    pub artist: String,
    /// Kept verbatim: "3", "03", "3/12" and "B2" are all fine.
    pub track_number: String,
}

/// Ordered, editable list of drafts (playback order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackList {
    drafts: Vec<TrackDraft>,
}

impl TrackList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_drafts(drafts: Vec<TrackDraft>) -> Self {
        Self { drafts }
    }

    pub fn drafts(&self) -> &[TrackDraft] {
        &self.drafts
    }

    pub fn drafts_mut(&mut self) -> &mut [TrackDraft] {
        &mut self.drafts
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Append a track with the defaults a new row gets:
    /// title "Track N", track number "N", blank album/artist.
    pub fn add_track(&mut self, start_secs: u64) -> &mut TrackDraft {
        let n = self.drafts.len() + 1;
        self.drafts.push(TrackDraft {
            start_time: format_time(start_secs),
            title: format!("Track {n}"),
            album: String::new(),
            artist: String::new(),
            track_number: n.to_string(),
        });
        let last = self.drafts.len() - 1;
        &mut self.drafts[last]
    }

    /// Copy the first track's album onto every track.
    pub fn apply_album_to_all(&mut self) {
        if let Some(album) = self.drafts.first().map(|d| d.album.clone()) {
            for draft in &mut self.drafts {
                draft.album.clone_from(&album);
            }
        }
    }

    /// Copy the first track's artist onto every track.
    pub fn apply_artist_to_all(&mut self) {
        if let Some(artist) = self.drafts.first().map(|d| d.artist.clone()) {
            for draft in &mut self.drafts {
                draft.artist.clone_from(&artist);
            }
        }
    }

    /// Parse every draft into a [`TrackSpec`].
    ///
    /// Stops at the first start time that isn't valid `mm:ss` and reports it
    /// with its index and the raw string.
    pub fn freeze(&self) -> Result<Vec<TrackSpec>, SplitError> {
        if self.drafts.is_empty() {
            return Err(SplitError::EmptyTrackList);
        }

        self.drafts
            .iter()
            .enumerate()
            .map(|(index, d)| {
                let start_secs = parse_time(&d.start_time).ok_or_else(|| SplitError::InvalidTimeFormat {
                    index,
                    raw: d.start_time.clone(),
                })?;
                Ok(TrackSpec {
                    start_secs,
                    title: d.title.clone(),
                    album: d.album.clone(),
                    artist: d.artist.clone(),
                    track_number: d.track_number.clone(),
                })
            })
            .collect()
    }
}

/// One validated track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackSpec {
    pub start_secs: u64,
    pub title: String,
    pub album: String,
    pub artist: String,
    pub track_number: String,
}

impl TrackSpec {
    /// The text fields that go into the tag, unsanitized.
    pub fn tags(&self) -> TrackTags {
        TrackTags {
            title: self.title.clone(),
            album: self.album.clone(),
            artist: self.artist.clone(),
            track_number: self.track_number.clone(),
        }
    }
}

/// The four text fields embedded in every output file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackTags {
    pub title: String,
    pub album: String,
    pub artist: String,
    pub track_number: String,
}

/// Cover art ready for embedding.
///
/// `data` is always the re-encoded canonical image, never the original file's
/// bytes, and `mime_type` describes `data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub source_path: PathBuf,
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// One file produced by a split run.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedTrack {
    pub index: usize,
    pub path: PathBuf,
    pub tags: TrackTags,
    pub has_cover: bool,
    pub start_secs: f64,
    pub end_secs: f64,
    /// Frames of the album buffer this file was cut from.
    pub frames: Range<u64>,
}
