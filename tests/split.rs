use albumsplit::core::tags::{COVER_MIME, picture_count, read_embedded_cover, read_track_tags};
use albumsplit::core::{
    AlbumManifest, AlbumSplitter, Mp3Exporter, SplitError, SplitOptions, TrackSpec, load_album,
};
use std::error::Error;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Write a mono 16-bit sine tone with hound so no binary assets live in the repo.
fn write_tone(path: &Path, sample_rate: u32, seconds: u32) -> Result<(), Box<dyn Error>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    for n in 0..sample_rate * seconds {
        let theta = (n as f32 / sample_rate as f32) * 2.0 * std::f32::consts::PI * 440.0;
        writer.write_sample((theta.sin() * 0.5 * i16::MAX as f32) as i16)?;
    }
    writer.finalize()?;
    Ok(())
}

fn write_cover(path: &Path) -> Result<(), Box<dyn Error>> {
    image::RgbaImage::from_pixel(16, 9, image::Rgba([200, 40, 40, 255])).save(path)?;
    Ok(())
}

fn write_manifest(dir: &Path, body: &str) -> Result<std::path::PathBuf, Box<dyn Error>> {
    let path = dir.join("album.toml");
    fs::write(&path, body)?;
    Ok(path)
}

fn splitter_for(manifest: &AlbumManifest) -> Result<AlbumSplitter, Box<dyn Error>> {
    let mut splitter = AlbumSplitter::new(SplitOptions {
        output_dir: manifest.output_dir.clone().ok_or("manifest has no output_dir")?,
        ..SplitOptions::default()
    });
    splitter.set_cover(manifest.cover.clone());
    splitter.load_album(&manifest.album_file)?;
    Ok(splitter)
}

#[test]
fn manifest_driven_split_writes_tagged_tracks() -> Result<(), Box<dyn Error>> {
    let work = tempdir()?;
    write_tone(&work.path().join("album.wav"), 8_000, 6)?;
    write_cover(&work.path().join("cover.png"))?;
    let manifest_path = write_manifest(
        work.path(),
        r#"
album_file = "album.wav"
cover = "cover.png"
output_dir = "tracks"
album = "Demo Album"
artist = "Demo Artist"

[[tracks]]
start = "0:00"
title = "Intro"

[[tracks]]
start = "0:02"
title = "Main / Theme"

[[tracks]]
start = "0:05"
"#,
    )?;

    let manifest = AlbumManifest::load(&manifest_path)?;
    let tracks = manifest.track_list().freeze()?;
    let written = splitter_for(&manifest)?.split(&tracks)?;

    let out_dir = work.path().join("tracks");
    let names: Vec<_> = written
        .iter()
        .map(|t| t.path.strip_prefix(&out_dir).map(|p| p.display().to_string()))
        .collect::<Result<_, _>>()?;
    assert_eq!(names, ["Intro.wav", "Main   Theme.wav", "Track 3.wav"]);

    let frames: Vec<u32> = written
        .iter()
        .map(|t| hound::WavReader::open(&t.path).map(|r| r.duration()))
        .collect::<Result<_, _>>()?;
    assert_eq!(frames, [16_000, 24_000, 8_000]);

    let expected = [("Intro", "1"), ("Main / Theme", "2"), ("Track 3", "3")];
    for (track, (title, number)) in written.iter().zip(expected) {
        let tags = read_track_tags(&track.path)?;
        assert_eq!(tags.title, title);
        assert_eq!(tags.album, "Demo Album");
        assert_eq!(tags.artist, "Demo Artist");
        assert_eq!(tags.track_number, number);

        assert_eq!(picture_count(&track.path)?, 1);
        let (data, mime) = read_embedded_cover(&track.path)?.ok_or("no cover")?;
        assert_eq!(mime, COVER_MIME);
        assert_eq!(&data[..2], &[0xFF, 0xD8]);
    }
    Ok(())
}

#[test]
fn rerun_without_overwrite_is_refused_and_leaves_files_alone() -> Result<(), Box<dyn Error>> {
    let work = tempdir()?;
    write_tone(&work.path().join("album.wav"), 8_000, 2)?;
    let manifest_path = write_manifest(
        work.path(),
        r#"
album_file = "album.wav"
output_dir = "out"

[[tracks]]
start = "0:00"
title = "Only"
"#,
    )?;
    let manifest = AlbumManifest::load(&manifest_path)?;
    let tracks = manifest.track_list().freeze()?;

    let first = splitter_for(&manifest)?.split(&tracks)?;
    let before = fs::read(&first[0].path)?;

    let err = splitter_for(&manifest)?.split(&tracks).unwrap_err();
    assert!(matches!(err, SplitError::FilenameCollision { index: 0, .. }));
    assert_eq!(fs::read(&first[0].path)?, before);
    Ok(())
}

#[test]
fn start_past_album_end_writes_nothing() -> Result<(), Box<dyn Error>> {
    let work = tempdir()?;
    write_tone(&work.path().join("album.wav"), 8_000, 3)?;
    let manifest_path = write_manifest(
        work.path(),
        r#"
album_file = "album.wav"
output_dir = "out"

[[tracks]]
start = "0:00"

[[tracks]]
start = "0:03"
"#,
    )?;
    let manifest = AlbumManifest::load(&manifest_path)?;
    let tracks = manifest.track_list().freeze()?;

    let err = splitter_for(&manifest)?.split(&tracks).unwrap_err();
    assert!(matches!(err, SplitError::InvalidSegments(_)));
    assert_eq!(err.track_index(), Some(1));
    assert!(!work.path().join("out").exists());
    Ok(())
}

#[test]
fn mp3_tracks_are_encoded_tagged_and_decodable() -> Result<(), Box<dyn Error>> {
    let work = tempdir()?;
    let album_path = work.path().join("album.wav");
    write_tone(&album_path, 44_100, 4)?;
    let cover_path = work.path().join("cover.png");
    write_cover(&cover_path)?;
    let out_dir = work.path().join("mp3");

    let track = |start_secs, title: &str, number: &str| TrackSpec {
        start_secs,
        title: title.to_string(),
        album: "Demo Album".to_string(),
        artist: String::new(),
        track_number: number.to_string(),
    };
    let tracks = [track(0, "Intro", "1"), track(1, "Main", "2")];

    let mut splitter = AlbumSplitter::new(SplitOptions {
        output_dir: out_dir.clone(),
        ..SplitOptions::default()
    })
    .with_exporter(Mp3Exporter::default());
    splitter.set_cover(Some(cover_path));
    splitter.load_album(&album_path)?;
    let written = splitter.split(&tracks)?;

    let paths: Vec<_> = written.iter().map(|t| t.path.clone()).collect();
    assert_eq!(paths, [out_dir.join("Intro.mp3"), out_dir.join("Main.mp3")]);

    for ((exported, planned), expected_secs) in written.iter().zip(&tracks).zip([1.0, 3.0]) {
        let tags = read_track_tags(&exported.path)?;
        assert_eq!(tags.title, planned.title);
        assert_eq!(tags.album, "Demo Album");
        assert_eq!(tags.artist, "");
        assert_eq!(tags.track_number, planned.track_number);
        assert_eq!(picture_count(&exported.path)?, 1);

        let decoded = load_album(&exported.path)?;
        assert_eq!(decoded.sample_rate(), 44_100);
        assert!((decoded.duration_secs() - expected_secs).abs() < 0.1);
    }
    Ok(())
}
