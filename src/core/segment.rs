//! core/segment.rs
//! The segmenter: start offsets + album duration -> contiguous track intervals.
//!
//! Offsets are trusted to be in playback order; they are never re-sorted.
//! Track `i` covers `[offsets[i], offsets[i+1])` and the last track covers
//! `[offsets[N-1], duration)`. Every interval is checked before anything is
//! written, so a bad boundary late in the list cannot leave a half-split album.

use std::fmt;
use std::ops::Range;

use log::debug;

use super::error::SplitError;

/// One planned output track, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub index: usize,
    pub start_secs: f64,
    pub end_secs: f64,
    /// The final segment ends at the album's end rather than at a declared offset.
    pub is_last: bool,
}

impl Segment {
    pub fn duration_secs(&self) -> f64 {
        self.end_secs - self.start_secs
    }

    /// Convert to a frame range of a buffer with `total_frames` frames at
    /// `sample_rate`.
    ///
    /// Frame positions are truncated, never rounded. Only the final segment is
    /// allowed to be clamped to the buffer end; any other segment reaching past
    /// it is a logic error.
    pub fn frame_range(&self, sample_rate: u32, total_frames: u64) -> Result<Range<u64>, SplitError> {
        let start_frame = secs_to_frame(self.start_secs, sample_rate);
        let end_frame = if self.is_last {
            total_frames
        } else {
            secs_to_frame(self.end_secs, sample_rate)
        };

        if end_frame > total_frames || start_frame >= end_frame {
            return Err(SplitError::SliceOutOfBounds {
                index: self.index,
                start_frame,
                end_frame,
                total_frames,
            });
        }

        Ok(start_frame..end_frame)
    }
}

fn secs_to_frame(secs: f64, sample_rate: u32) -> u64 {
    (secs * f64::from(sample_rate)).floor() as u64
}

/// Why a planned interval was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Zero or negative length (duplicate or out-of-order offsets).
    Empty,
    /// A non-final interval ends after the album does.
    PastEnd,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentFault {
    pub index: usize,
    pub start_secs: f64,
    pub end_secs: f64,
    pub kind: FaultKind,
}

impl fmt::Display for SegmentFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            FaultKind::Empty => "has no duration",
            FaultKind::PastEnd => "ends after the album",
        };
        write!(
            f,
            "track {} [{:.3}s, {:.3}s) {what}",
            self.index + 1,
            self.start_secs,
            self.end_secs
        )
    }
}

/// Build one interval per offset.
///
/// Fails with [`SplitError::InvalidSegments`] listing every bad interval, not
/// just the first, so the caller can point at all offending tracks at once.
pub fn plan_segments(offsets: &[u64], duration_secs: f64) -> Result<Vec<Segment>, SplitError> {
    if offsets.is_empty() {
        return Err(SplitError::EmptyTrackList);
    }

    let last = offsets.len() - 1;
    let mut segments = Vec::with_capacity(offsets.len());
    let mut faults = Vec::new();

    for (index, &start) in offsets.iter().enumerate() {
        let is_last = index == last;
        let start_secs = start as f64;
        let end_secs = if is_last {
            duration_secs
        } else {
            offsets[index + 1] as f64
        };

        let kind = if end_secs <= start_secs {
            Some(FaultKind::Empty)
        } else if !is_last && end_secs > duration_secs {
            Some(FaultKind::PastEnd)
        } else {
            None
        };

        match kind {
            Some(kind) => faults.push(SegmentFault {
                index,
                start_secs,
                end_secs,
                kind,
            }),
            None => segments.push(Segment {
                index,
                start_secs,
                end_secs,
                is_last,
            }),
        }
    }

    if !faults.is_empty() {
        return Err(SplitError::InvalidSegments(faults));
    }

    debug!(
        "planned {} segments over {:.3}s starting at {}s",
        segments.len(),
        duration_secs,
        offsets[0]
    );
    Ok(segments)
}
