//! core/pipeline.rs
//! One split run, start to finish.
//!
//! Order of work:
//!   (A) validate everything: album loaded, output dir usable, every start
//!       time parsed, every interval non-empty and inside the album, every
//!       output name unique, cover decodable
//!   (B) only then touch the disk, one track at a time in declaration order:
//!       export slice -> wait for the file -> embed tags
//!
//! A failure in (A) means nothing was written. A failure in (B) stops the run
//! at that track and, unless disabled, removes what this run already wrote.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{info, warn};

use super::album::{AlbumSource, load_album};
use super::error::SplitError;
use super::export::{TrackExporter, WavExporter, wait_for_file};
use super::naming::resolve_output_paths;
use super::segment::{Segment, plan_segments};
use super::tags::{load_cover, write_track_tags};
use super::types::{CoverImage, ExportedTrack, TrackSpec};

/// Knobs for a split run.
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Created if missing (after validation succeeds).
    pub output_dir: PathBuf,
    /// Allow replacing files that already existed before the run.
    /// Two tracks of the same run may never share a file either way.
    pub overwrite: bool,
    /// How long to wait for an exported file to become visible.
    pub materialize_timeout: Duration,
    pub poll_interval: Duration,
    /// Delete files written earlier in the run when a later track fails.
    pub rollback_on_failure: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            overwrite: false,
            materialize_timeout: Duration::from_secs(1),
            poll_interval: Duration::from_millis(100),
            rollback_on_failure: true,
        }
    }
}

/// The validated layout of a run: what would be written where.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitPlan {
    pub segments: Vec<Segment>,
    pub paths: Vec<PathBuf>,
}

/// Album + cover + options; the state a caller builds up before splitting.
pub struct AlbumSplitter {
    album: Option<AlbumSource>,
    cover_path: Option<PathBuf>,
    options: SplitOptions,
    exporter: Box<dyn TrackExporter>,
}

impl AlbumSplitter {
    pub fn new(options: SplitOptions) -> Self {
        Self {
            album: None,
            cover_path: None,
            options,
            exporter: Box::new(WavExporter),
        }
    }

    pub fn with_exporter(mut self, exporter: impl TrackExporter + 'static) -> Self {
        self.exporter = Box::new(exporter);
        self
    }

    /// Decode `path` and replace any previously loaded album.
    ///
    /// On failure the previous album stays loaded.
    pub fn load_album(&mut self, path: &Path) -> Result<&AlbumSource, SplitError> {
        let album = load_album(path)?;
        Ok(&*self.album.insert(album))
    }

    pub fn set_album(&mut self, album: AlbumSource) {
        self.album = Some(album);
    }

    pub fn album(&self) -> Option<&AlbumSource> {
        self.album.as_ref()
    }

    /// Remember a cover image path. It is decoded when a split starts.
    pub fn set_cover(&mut self, path: Option<PathBuf>) {
        self.cover_path = path;
    }

    pub fn options(&self) -> &SplitOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut SplitOptions {
        &mut self.options
    }

    /// Validate `tracks` against the loaded album without writing anything.
    pub fn plan(&self, tracks: &[TrackSpec]) -> Result<SplitPlan, SplitError> {
        let album = self.album.as_ref().ok_or(SplitError::NoAlbumLoaded)?;
        plan_split(album, tracks, &self.options, self.exporter.extension())
    }

    pub fn split(&self, tracks: &[TrackSpec]) -> Result<Vec<ExportedTrack>, SplitError> {
        let album = self.album.as_ref().ok_or(SplitError::NoAlbumLoaded)?;
        split_album(
            album,
            tracks,
            self.cover_path.as_deref(),
            &self.options,
            self.exporter.as_ref(),
        )
    }
}

/// Stage (A) minus the cover: boundaries, slices and output paths.
pub fn plan_split(
    album: &AlbumSource,
    tracks: &[TrackSpec],
    options: &SplitOptions,
    extension: &str,
) -> Result<SplitPlan, SplitError> {
    if tracks.is_empty() {
        return Err(SplitError::EmptyTrackList);
    }
    check_output_dir(&options.output_dir)?;

    let offsets: Vec<u64> = tracks.iter().map(|t| t.start_secs).collect();
    let segments = plan_segments(&offsets, album.duration_secs())?;

    // Catch slicing logic errors now rather than halfway through the run.
    for segment in &segments {
        album.slice(segment)?;
    }

    let paths = resolve_output_paths(&options.output_dir, tracks, extension, options.overwrite)?;
    Ok(SplitPlan { segments, paths })
}

fn check_output_dir(dir: &Path) -> Result<(), SplitError> {
    let invalid = |reason: &str| SplitError::InvalidOutputDirectory {
        path: dir.to_path_buf(),
        reason: reason.to_string(),
    };

    if dir.as_os_str().is_empty() {
        return Err(invalid("no directory selected"));
    }
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(invalid("not a directory")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            // Will be created; its nearest existing ancestor must be a directory.
            match dir.ancestors().skip(1).find(|a| !a.as_os_str().is_empty() && a.exists()) {
                Some(ancestor) if !ancestor.is_dir() => Err(invalid("parent is not a directory")),
                _ => Ok(()),
            }
        }
        Err(e) => Err(invalid(&e.to_string())),
    }
}

/// Split `album` into one tagged file per track.
///
/// Returns every written file in track order, or the first failure.
pub fn split_album(
    album: &AlbumSource,
    tracks: &[TrackSpec],
    cover_path: Option<&Path>,
    options: &SplitOptions,
    exporter: &dyn TrackExporter,
) -> Result<Vec<ExportedTrack>, SplitError> {
    let plan = plan_split(album, tracks, options, exporter.extension())?;

    let cover: Option<CoverImage> = cover_path
        .map(load_cover)
        .transpose()
        .map_err(SplitError::CoverDecodeFailure)?;

    fs::create_dir_all(&options.output_dir).map_err(|e| SplitError::InvalidOutputDirectory {
        path: options.output_dir.clone(),
        reason: e.to_string(),
    })?;

    let preexisting: Vec<bool> = plan.paths.iter().map(|p| p.exists()).collect();
    let mut written: Vec<ExportedTrack> = Vec::with_capacity(tracks.len());

    for ((segment, path), track) in plan.segments.iter().zip(&plan.paths).zip(tracks) {
        match export_one(album, segment, path, track, cover.as_ref(), options, exporter) {
            Ok(exported) => {
                info!(
                    "wrote track {} [{:.3}s, {:.3}s) -> {}",
                    segment.index + 1,
                    segment.start_secs,
                    segment.end_secs,
                    path.display()
                );
                written.push(exported);
            }
            Err(err) => {
                if options.rollback_on_failure {
                    let produced = written
                        .iter()
                        .map(|t| t.path.as_path())
                        .chain(Some(path.as_path()));
                    rollback(produced, &preexisting, &plan.paths);
                }
                return Err(err);
            }
        }
    }

    Ok(written)
}

fn export_one(
    album: &AlbumSource,
    segment: &Segment,
    path: &Path,
    track: &TrackSpec,
    cover: Option<&CoverImage>,
    options: &SplitOptions,
    exporter: &dyn TrackExporter,
) -> Result<ExportedTrack, SplitError> {
    let index = segment.index;
    let (frames, samples) = album.slice(segment)?;

    exporter
        .export(samples, album.sample_rate(), album.channels(), path)
        .map_err(|source| SplitError::ExportFailure { index, source })?;

    if !wait_for_file(path, options.materialize_timeout, options.poll_interval) {
        return Err(SplitError::MissingSource {
            index,
            path: path.to_path_buf(),
        });
    }

    let tags = track.tags();
    write_track_tags(path, &tags, cover)
        .map_err(|source| SplitError::TagWriteFailure { index, source })?;

    Ok(ExportedTrack {
        index,
        path: path.to_path_buf(),
        tags,
        has_cover: cover.is_some(),
        start_secs: segment.start_secs,
        end_secs: segment.end_secs,
        frames,
    })
}

/// Remove everything this run produced, including a half-written file for the
/// failing track. Paths that held a file before the run started are left alone.
fn rollback<'a>(
    produced: impl Iterator<Item = &'a Path>,
    preexisting: &[bool],
    planned: &[PathBuf],
) {
    let existed = |path: &Path| {
        planned
            .iter()
            .zip(preexisting)
            .any(|(p, &existed)| existed && p == path)
    };

    for path in produced {
        if existed(path) {
            warn!("kept {} (it existed before this run)", path.display());
            continue;
        }
        match fs::remove_file(path) {
            Ok(()) => warn!("rolled back {}", path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("could not remove {}: {e}", path.display()),
        }
    }
}
