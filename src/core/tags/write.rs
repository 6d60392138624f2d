//! Write the track tag set into an exported file.

use std::fs;
use std::path::Path;

use id3::frame::{Picture, PictureType};
use id3::{Tag, TagLike};
use log::debug;

use super::TAG_VERSION;
use super::art::COVER_DESCRIPTION;
use super::util::TagContainer;
use crate::core::error::TagError;
use crate::core::types::{CoverImage, TrackTags};

/// Embed `tags` (and `cover`, if given) into the file at `path`.
///
/// - An existing tag is reused and updated, never treated as an error.
/// - Text is written verbatim; nothing here sanitizes it.
/// - Any existing front cover is replaced, so re-tagging never stacks copies.
/// - The rewrite happens on a sibling temp copy that is renamed over `path`
///   only after the tag is fully written; on failure `path` is untouched.
pub fn write_track_tags(
    path: &Path,
    tags: &TrackTags,
    cover: Option<&CoverImage>,
) -> Result<(), TagError> {
    fs::metadata(path).map_err(|source| TagError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let container = TagContainer::for_path(path)?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let suffix = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    let temp = tempfile::Builder::new()
        .prefix(".albumsplit-")
        .suffix(&suffix)
        .tempfile_in(dir)?
        .into_temp_path();

    fs::copy(path, &temp).map_err(|source| TagError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let mut tag = container.read(&temp)?.unwrap_or_else(Tag::new);

    // All four frames are always present, even when a value is blank.
    tag.set_text("TIT2", tags.title.as_str());
    tag.set_text("TALB", tags.album.as_str());
    tag.set_text("TPE1", tags.artist.as_str());
    // TRCK stays a string: "03", "3/12" and "B2" must survive untouched.
    tag.set_text("TRCK", tags.track_number.as_str());

    if let Some(cover) = cover {
        tag.remove_picture_by_type(PictureType::CoverFront);
        let _ = tag.add_frame(Picture {
            mime_type: cover.mime_type.clone(),
            picture_type: PictureType::CoverFront,
            description: COVER_DESCRIPTION.to_string(),
            data: cover.data.clone(),
        });
    }

    container.write(&tag, &temp, TAG_VERSION)?;

    temp.persist(path).map_err(|e| TagError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;

    debug!("tagged {} ({container:?})", path.display());
    Ok(())
}
