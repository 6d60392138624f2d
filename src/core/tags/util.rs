//! core/tags/util.rs
//! Where the tag lives inside a file, picked by extension.

use std::path::Path;

use id3::{ErrorKind, Tag, Version};

use crate::core::error::TagError;

/// How an ID3 tag is stored in a given audio container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagContainer {
    /// ID3v2 header at the start of the file.
    Mp3,
    /// `ID3 ` chunk inside the RIFF structure.
    Wav,
}

impl TagContainer {
    pub fn for_path(path: &Path) -> Result<Self, TagError> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("mp3") => Ok(TagContainer::Mp3),
            Some("wav") | Some("wave") => Ok(TagContainer::Wav),
            _ => Err(TagError::UnsupportedContainer {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Read the tag stored at `path`, or `None` if the file has no tag yet.
    ///
    /// id3 locates the tag from the file's own header (MP3 prefix or RIFF
    /// chunk); the container only gates which files get that far.
    pub(crate) fn read(self, path: &Path) -> Result<Option<Tag>, TagError> {
        match Tag::read_from_path(path) {
            Ok(tag) => Ok(Some(tag)),
            Err(e) if matches!(e.kind, ErrorKind::NoTag) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) fn write(self, tag: &Tag, path: &Path, version: Version) -> Result<(), TagError> {
        tag.write_to_path(path, version)?;
        Ok(())
    }
}
