//! core/manifest.rs
//! The TOML file that describes one album for the command line.
//!
//! ```toml
//! album_file = "album.flac"
//! cover = "cover.png"
//! output_dir = "out"
//! album = "Album"
//! artist = "Artist"
//!
//! [[tracks]]
//! start = "0:00"
//! title = "Intro"
//! ```
//!
//! Start times stay raw strings here. They are checked by
//! [`TrackList::freeze`] like any other user input.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::error::ManifestError;
use super::types::TrackList;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlbumManifest {
    /// The full-album recording.
    pub album_file: PathBuf,
    /// Optional front cover, embedded in every track.
    pub cover: Option<PathBuf>,
    /// Where the tracks go. The `--output` flag wins over this.
    pub output_dir: Option<PathBuf>,
    /// Applied to every track.
    #[serde(default)]
    pub album: String,
    /// Applied to every track.
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub tracks: Vec<ManifestTrack>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestTrack {
    /// `mm:ss`
    pub start: String,
    /// Defaults to "Track N".
    pub title: Option<String>,
    /// Defaults to the track's position.
    pub track_number: Option<String>,
}

impl AlbumManifest {
    /// Read and parse `path`, resolving relative paths against its directory.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut manifest: AlbumManifest =
            toml::from_str(&text).map_err(|source| ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        if manifest.tracks.is_empty() {
            return Err(ManifestError::NoTracks {
                path: path.to_path_buf(),
            });
        }

        let base = path.parent().unwrap_or(Path::new(""));
        manifest.resolve_paths(base);
        Ok(manifest)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.album_file);
        if let Some(cover) = self.cover.as_mut() {
            resolve(cover);
        }
        if let Some(dir) = self.output_dir.as_mut() {
            resolve(dir);
        }
    }

    /// Build the editable track list, with album and artist on every row.
    pub fn track_list(&self) -> TrackList {
        let mut list = TrackList::new();
        for track in &self.tracks {
            let draft = list.add_track(0);
            draft.start_time.clone_from(&track.start);
            if let Some(title) = &track.title {
                draft.title.clone_from(title);
            }
            if let Some(number) = &track.track_number {
                draft.track_number.clone_from(number);
            }
        }

        if let Some(first) = list.drafts_mut().first_mut() {
            first.album.clone_from(&self.album);
            first.artist.clone_from(&self.artist);
        }
        list.apply_album_to_all();
        list.apply_artist_to_all();
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::SplitError;
    use tempfile::tempdir;

    fn write_manifest(body: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("album.toml");
        fs::write(&path, body).unwrap();
        (dir, path)
    }

    #[test]
    fn relative_paths_follow_the_manifest() {
        let (dir, path) = write_manifest(
            r#"
album_file = "album.flac"
cover = "art/cover.png"
output_dir = "/tmp/abs-out"

[[tracks]]
start = "0:00"
"#,
        );

        let manifest = AlbumManifest::load(&path).unwrap();
        assert_eq!(manifest.album_file, dir.path().join("album.flac"));
        assert_eq!(manifest.cover, Some(dir.path().join("art/cover.png")));
        assert_eq!(manifest.output_dir, Some(PathBuf::from("/tmp/abs-out")));
    }

    #[test]
    fn track_list_fills_defaults_and_shared_fields() {
        let (_dir, path) = write_manifest(
            r#"
album_file = "album.flac"
album = "Shared"
artist = "Someone"

[[tracks]]
start = "0:00"
title = "Intro"

[[tracks]]
start = "1:30"
track_number = "B2"
"#,
        );

        let list = AlbumManifest::load(&path).unwrap().track_list();
        let drafts = list.drafts();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0].title, "Intro");
        assert_eq!(drafts[0].track_number, "1");
        assert_eq!(drafts[1].title, "Track 2");
        assert_eq!(drafts[1].track_number, "B2");
        assert!(drafts.iter().all(|d| d.album == "Shared" && d.artist == "Someone"));

        let specs = list.freeze().unwrap();
        assert_eq!(specs[1].start_secs, 90);
    }

    #[test]
    fn bad_start_time_surfaces_at_freeze() {
        let (_dir, path) = write_manifest(
            r#"
album_file = "album.flac"
[[tracks]]
start = "1:5x"
"#,
        );

        let list = AlbumManifest::load(&path).unwrap().track_list();
        assert!(matches!(
            list.freeze(),
            Err(SplitError::InvalidTimeFormat { index: 0, .. })
        ));
    }

    #[test]
    fn manifest_without_tracks_is_rejected() {
        let (_dir, path) = write_manifest(r#"album_file = "album.flac""#);
        assert!(matches!(
            AlbumManifest::load(&path),
            Err(ManifestError::NoTracks { .. })
        ));
    }

    #[test]
    fn unknown_keys_and_missing_files_are_errors() {
        let (dir, path) = write_manifest(
            r#"
album_file = "album.flac"
colour = "blue"
[[tracks]]
start = "0:00"
"#,
        );
        assert!(matches!(
            AlbumManifest::load(&path),
            Err(ManifestError::Parse { .. })
        ));
        assert!(matches!(
            AlbumManifest::load(&dir.path().join("nope.toml")),
            Err(ManifestError::Read { .. })
        ));
    }
}
