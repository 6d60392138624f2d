//! core/tags/art.rs
//! Cover art: canonicalize on the way in, find on the way out.

use std::io::Cursor;
use std::path::Path;

use id3::frame::{Content, PictureType};
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use log::debug;

use super::util::TagContainer;
use crate::core::error::{CoverError, TagError};
use crate::core::types::CoverImage;

pub const COVER_MIME: &str = "image/jpeg";
pub const COVER_DESCRIPTION: &str = "Cover";

const JPEG_QUALITY: u8 = 90;

/// Read an image file in any supported raster format and re-encode it as JPEG.
///
/// The original bytes are never embedded, only the decoded pixels, so the
/// source format can't leak into the output tag. Alpha is dropped.
pub fn load_cover(path: &Path) -> Result<CoverImage, CoverError> {
    let bytes = std::fs::read(path).map_err(|source| CoverError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let decoded = image::ImageReader::new(Cursor::new(&bytes))
        .with_guessed_format()
        .map_err(|source| CoverError::Read {
            path: path.to_path_buf(),
            source,
        })?
        .decode()
        .map_err(|source| CoverError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

    let data = encode_jpeg(&decoded)?;
    debug!(
        "cover {}: {}x{}, {} -> {} bytes",
        path.display(),
        decoded.width(),
        decoded.height(),
        bytes.len(),
        data.len()
    );

    Ok(CoverImage {
        source_path: path.to_path_buf(),
        data,
        mime_type: COVER_MIME.to_string(),
    })
}

fn encode_jpeg(img: &DynamicImage) -> Result<Vec<u8>, CoverError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut out = Vec::new();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY))
        .map_err(CoverError::Encode)?;
    Ok(out)
}

/// Returns (image_bytes, mime) for the first front-cover picture, if any.
pub fn read_embedded_cover(path: &Path) -> Result<Option<(Vec<u8>, String)>, TagError> {
    let Some(tag) = TagContainer::for_path(path)?.read(path)? else {
        return Ok(None);
    };

    for f in tag.frames() {
        if let Content::Picture(p) = f.content() {
            if p.picture_type == PictureType::CoverFront {
                return Ok(Some((p.data.clone(), p.mime_type.clone())));
            }
        }
    }

    Ok(None)
}
