//! Read back the tag fields written by [`super::write_track_tags`].

use std::path::Path;

use id3::{Tag, TagLike};
use id3::frame::Content;

use super::util::TagContainer;
use crate::core::error::TagError;
use crate::core::types::TrackTags;

/// Read title/album/artist/track number from `path`.
///
/// Missing frames come back as empty strings. A file with no tag at all yields
/// all-empty fields.
pub fn read_track_tags(path: &Path) -> Result<TrackTags, TagError> {
    let Some(tag) = TagContainer::for_path(path)?.read(path)? else {
        return Ok(TrackTags::default());
    };

    Ok(TrackTags {
        title: text_frame(&tag, "TIT2").unwrap_or_default(),
        album: text_frame(&tag, "TALB").unwrap_or_default(),
        artist: text_frame(&tag, "TPE1").unwrap_or_default(),
        track_number: text_frame(&tag, "TRCK").unwrap_or_default(),
    })
}

/// Number of picture frames (any type) in the file's tag.
pub fn picture_count(path: &Path) -> Result<usize, TagError> {
    let Some(tag) = TagContainer::for_path(path)?.read(path)? else {
        return Ok(0);
    };
    Ok(tag.frames().filter(|f| f.id() == "APIC").count())
}

/// Get the plain text value of one frame id.
fn text_frame(tag: &Tag, id: &str) -> Option<String> {
    let frame = tag.get(id)?;
    match frame.content() {
        Content::Text(s) => Some(s.clone()),
        _ => None,
    }
}
