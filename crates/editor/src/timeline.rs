use crate::error::{EditorError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Opaque identifier for timeline segments.
pub type SegmentId = u64;

/// A contiguous time range of the source video, alive or marked deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    /// Start offset in milliseconds.
    pub start: i64,
    /// End offset in milliseconds. Equals the next segment's start.
    pub end: i64,
    /// Excluded from the final cut when true.
    pub deleted: bool,
}

/// Ordered, gapless cut timeline covering `[0, duration]` milliseconds.
///
/// Invariants held after every operation: the list is non-empty, segments are
/// chronological and contiguous (`segments[i].end == segments[i + 1].start`),
/// the first segment starts at 0, the last ends at `duration`, and no segment
/// has zero length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    pub segments: Vec<Segment>,
    pub duration: i64,
}

impl Timeline {
    /// Timeline held before the edit document arrives: one alive segment
    /// `[0, 1]` with unknown (zero) duration.
    pub fn placeholder() -> Self {
        Self {
            segments: vec![Segment {
                id: 0,
                start: 0,
                end: 1,
                deleted: false,
            }],
            duration: 0,
        }
    }

    /// Builds a timeline from already-identified segments, rejecting lists
    /// that violate the gapless ordering invariants.
    pub fn from_parts(segments: Vec<Segment>, duration: i64) -> Result<Self> {
        let timeline = Self { segments, duration };
        timeline.validate()?;
        Ok(timeline)
    }

    /// Finds the segment containing `at_ms`: the **last** index satisfying
    /// `start <= at_ms <= end`, so a position on a shared boundary resolves
    /// to the later segment. Falls back to 0 when nothing matches.
    ///
    /// # Example
    /// ```
    /// use editor::timeline::Timeline;
    ///
    /// let timeline = Timeline::placeholder();
    /// assert_eq!(timeline.active_segment_at(0), 0);
    /// ```
    pub fn active_segment_at(&self, at_ms: i64) -> usize {
        self.segments
            .iter()
            .rposition(|segment| segment.start <= at_ms && at_ms <= segment.end)
            .unwrap_or(0)
    }

    /// Splits the segment at `index` into two at `at_ms`.
    ///
    /// Both halves inherit the original `deleted` flag and receive the fresh
    /// ids `left_id` and `right_id`. A split exactly on the segment's start or
    /// end would create a zero-length segment and is ignored; the return value
    /// reports whether the split took effect.
    pub fn split_at(&mut self, index: usize, at_ms: i64, left_id: SegmentId, right_id: SegmentId) -> bool {
        let current = self.segments[index].clone();
        if at_ms == current.start || at_ms == current.end {
            debug!(
                at_ms,
                segment_id = current.id,
                "split ignored: position on segment boundary"
            );
            return false;
        }

        let left = Segment {
            id: left_id,
            start: current.start,
            end: at_ms,
            deleted: current.deleted,
        };
        let right = Segment {
            id: right_id,
            start: at_ms,
            end: current.end,
            deleted: current.deleted,
        };

        debug!(
            at_ms,
            segment_id = current.id,
            left_id,
            right_id,
            "split accepted"
        );

        self.segments[index] = left;
        self.segments.insert(index + 1, right);
        true
    }

    /// Toggles the alive/deleted flag of the segment at `index`.
    pub fn toggle_deleted(&mut self, index: usize) {
        let segment = &mut self.segments[index];
        segment.deleted = !segment.deleted;
        debug!(
            segment_id = segment.id,
            deleted = segment.deleted,
            "segment alive/deleted toggled"
        );
    }

    /// Merges the segments from `from` through `to` into one.
    ///
    /// The absorbing segment at `from` keeps its id and `deleted` flag and
    /// grows to span both endpoints; everything else in the range is removed.
    /// An out-of-bounds `to` (or `from == to`) is ignored; the return value
    /// reports whether the merge took effect.
    pub fn merge(&mut self, from: usize, to: usize) -> bool {
        let len = self.segments.len();
        if from == to || from >= len || to >= len {
            debug!(from, to, segment_count = len, "merge ignored: out of bounds");
            return false;
        }

        let (lo, hi) = if from < to { (from, to) } else { (to, from) };
        let absorbing = self.segments[from].clone();
        let merged = Segment {
            id: absorbing.id,
            start: self.segments[lo].start,
            end: self.segments[hi].end,
            deleted: absorbing.deleted,
        };

        self.segments[lo] = merged;
        self.segments.drain(lo + 1..=hi);

        debug!(
            from,
            to,
            segment_count = self.segments.len(),
            "merge applied"
        );
        true
    }

    fn validate(&self) -> Result<()> {
        let Some(first) = self.segments.first() else {
            return Err(malformed("segment list is empty"));
        };
        if first.start != 0 {
            return Err(malformed(format!(
                "first segment starts at {} instead of 0",
                first.start
            )));
        }

        for segment in &self.segments {
            if segment.start >= segment.end {
                return Err(malformed(format!(
                    "segment {}..{} has no positive length",
                    segment.start, segment.end
                )));
            }
        }
        for pair in self.segments.windows(2) {
            if pair[0].end != pair[1].start {
                return Err(malformed(format!(
                    "gap or overlap between {} and {}",
                    pair[0].end, pair[1].start
                )));
            }
        }

        let last_end = self.segments[self.segments.len() - 1].end;
        if last_end != self.duration {
            return Err(malformed(format!(
                "last segment ends at {last_end} instead of duration {}",
                self.duration
            )));
        }
        Ok(())
    }
}

fn malformed(reason: impl Into<String>) -> EditorError {
    EditorError::MalformedSegments {
        reason: reason.into(),
    }
}
