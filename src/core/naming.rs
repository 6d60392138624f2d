//! core/naming.rs
//! Output file names: sanitizing titles and catching collisions.
//!
//! Sanitizing only ever affects the path. The tag keeps the literal title.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::error::SplitError;
use super::types::TrackSpec;

/// Characters that are unsafe in a filename on at least one common filesystem.
const FORBIDDEN: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*', '\n', '\r'];

/// Replace every forbidden character with a single space.
/// Ex: "A/B:C*D" -> "A B C D"
pub fn sanitize_component(s: &str) -> String {
    s.chars()
        .map(|c| if FORBIDDEN.contains(&c) { ' ' } else { c })
        .collect()
}

/// File stem for track `index`: the sanitized title, or "Track N" when nothing
/// usable is left.
pub fn file_stem_for(index: usize, title: &str) -> String {
    let stem = sanitize_component(title);
    let trimmed = stem.trim();
    if trimmed.is_empty() || trimmed.chars().all(|c| c == '.') {
        format!("Track {}", index + 1)
    } else {
        stem
    }
}

/// Resolve every track's output path and refuse duplicates.
///
/// Names are compared case-insensitively, since two titles differing only in
/// case land on the same file on macOS and Windows. A file already on disk is
/// a collision too unless `overwrite` is set.
pub fn resolve_output_paths(
    output_dir: &Path,
    tracks: &[TrackSpec],
    extension: &str,
    overwrite: bool,
) -> Result<Vec<PathBuf>, SplitError> {
    let mut seen: HashMap<String, usize> = HashMap::with_capacity(tracks.len());
    let mut out = Vec::with_capacity(tracks.len());

    for (index, track) in tracks.iter().enumerate() {
        let file_name = format!("{}.{extension}", file_stem_for(index, &track.title));
        let path = output_dir.join(&file_name);

        if let Some(&first) = seen.get(&file_name.to_lowercase()) {
            return Err(SplitError::FilenameCollision {
                path,
                first_index: Some(first),
                index,
            });
        }
        if !overwrite && path.exists() {
            return Err(SplitError::FilenameCollision {
                path,
                first_index: None,
                index,
            });
        }

        seen.insert(file_name.to_lowercase(), index);
        out.push(path);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn track(title: &str) -> TrackSpec {
        TrackSpec {
            start_secs: 0,
            title: title.to_string(),
            album: String::new(),
            artist: String::new(),
            track_number: String::new(),
        }
    }

    #[test]
    fn forbidden_characters_become_spaces() {
        assert_eq!(sanitize_component("A/B:C*D"), "A B C D");
        assert_eq!(sanitize_component(r#"<a>"b"\c|d?"#), " a  b  c d ");
        assert_eq!(sanitize_component("line\nbreak\r"), "line break ");
    }

    #[test]
    fn non_ascii_is_left_alone() {
        assert_eq!(sanitize_component("Café – Ünïcode"), "Café – Ünïcode");
    }

    #[test]
    fn blank_titles_fall_back_to_track_number() {
        assert_eq!(file_stem_for(0, ""), "Track 1");
        assert_eq!(file_stem_for(4, "///"), "Track 5");
        assert_eq!(file_stem_for(2, ".."), "Track 3");
        assert_eq!(file_stem_for(2, "Intro"), "Intro");
    }

    #[test]
    fn paths_use_sanitized_titles() {
        let dir = tempdir().unwrap();
        let paths =
            resolve_output_paths(dir.path(), &[track("Intro"), track("A/B:C*D")], "mp3", false)
                .unwrap();
        assert_eq!(paths[0], dir.path().join("Intro.mp3"));
        assert_eq!(paths[1], dir.path().join("A B C D.mp3"));
    }

    #[test]
    fn titles_that_sanitize_alike_collide() {
        let dir = tempdir().unwrap();
        let err = resolve_output_paths(dir.path(), &[track("A/B"), track("x"), track("A:B")], "wav", false)
            .unwrap_err();
        match err {
            SplitError::FilenameCollision {
                path,
                first_index,
                index,
            } => {
                assert_eq!(path, dir.path().join("A B.wav"));
                assert_eq!(first_index, Some(0));
                assert_eq!(index, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn case_only_differences_collide() {
        let dir = tempdir().unwrap();
        let err = resolve_output_paths(dir.path(), &[track("Song"), track("SONG")], "wav", true)
            .unwrap_err();
        assert!(matches!(err, SplitError::FilenameCollision { index: 1, .. }));
    }

    #[test]
    fn existing_files_need_overwrite() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("Intro.wav"), b"old").unwrap();

        let err = resolve_output_paths(dir.path(), &[track("Intro")], "wav", false).unwrap_err();
        assert!(matches!(
            err,
            SplitError::FilenameCollision {
                first_index: None,
                index: 0,
                ..
            }
        ));

        assert!(resolve_output_paths(dir.path(), &[track("Intro")], "wav", true).is_ok());
    }
}
