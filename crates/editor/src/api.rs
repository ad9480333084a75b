use std::path::PathBuf;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::{EditorError, Result};
use crate::gateway::{EditGateway, FileGateway, SubmitBody, SubmitSegment};
use crate::playback::{PlaybackState, normalize_position, resolve_preview_skip};
use crate::timeline::{Segment, SegmentId, Timeline};

/// Commands accepted by the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Fetches the edit document and replaces the timeline wholesale.
    Load,
    /// Moves the playhead to `at_ms`.
    ///
    /// Player progress callbacks report fractional milliseconds; the value is
    /// rounded and clamped into `[0, duration]` without ever failing.
    ///
    /// # Example
    /// ```ignore
    /// use editor::{Command, Editor};
    ///
    /// let mut editor = Editor::with_file_gateway("edit.json".into(), "out.json".into());
    /// let _ = editor.handle_command(Command::Load);
    /// let _ = editor.handle_command(Command::SetPosition { at_ms: 1_500.0 });
    /// ```
    SetPosition {
        at_ms: f64,
    },
    /// Splits the active segment at the playhead.
    ///
    /// A playhead exactly on the active segment's start or end is a silent
    /// no-op, since splitting there would create a zero-length segment.
    Cut,
    /// Toggles the active segment between alive and deleted.
    ToggleSegmentDeleted,
    /// Merges the active segment with its left neighbor.
    MergeLeft,
    /// Merges the active segment with its right neighbor.
    MergeRight,
    /// Collapses the whole timeline into one segment: the active segment is
    /// merged with the first segment, the active index re-derived, and the
    /// result merged with the last segment.
    MergeAll,
    SetPlaying {
        playing: bool,
    },
    SetPreviewMode {
        enabled: bool,
    },
    /// Player confirmation that the forced preview seek was performed.
    AcknowledgePreviewSeek,
    /// Submits the segment list back to the editing backend.
    Save,
}

/// Events emitted by the editor.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    TimelineChanged(TimelineSnapshot),
    PositionChanged {
        at_ms: i64,
        active_segment: usize,
    },
    /// The player must seek to `at_ms`: preview mode skipped a deleted range.
    PreviewSeek {
        at_ms: i64,
    },
    PlaybackStopped,
    Saved,
}

/// Immutable timeline snapshot consumed by the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineSnapshot {
    pub segments: Vec<SegmentSummary>,
    pub duration: i64,
    pub has_changes: bool,
}

/// Snapshot representation of one timeline segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSummary {
    pub id: SegmentId,
    pub start: i64,
    pub end: i64,
    pub deleted: bool,
}

/// Editing session: timeline, playhead, playback flags, and dirty tracking.
///
/// All mutations run synchronously inside [`Editor::handle_command`], so the
/// timeline invariants are re-established atomically per command and no
/// intermediate state is observable.
#[derive(Debug)]
pub struct Editor<G> {
    gateway: G,
    timeline: Timeline,
    currently_at: i64,
    active_segment: usize,
    playback: PlaybackState,
    has_changes: bool,
    next_segment_id: SegmentId,
    tracks: Vec<Value>,
    subtitles: Value,
}

impl<G> Editor<G>
where
    G: EditGateway,
{
    /// Creates an editor holding the placeholder timeline until `Load` runs.
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            timeline: Timeline::placeholder(),
            currently_at: 0,
            active_segment: 0,
            playback: PlaybackState::default(),
            has_changes: false,
            next_segment_id: 1,
            tracks: Vec::new(),
            subtitles: Value::Null,
        }
    }

    /// Applies one command and returns emitted events.
    ///
    /// Edit commands are total: an ignored operation (boundary cut, merge
    /// past the list bounds) emits no events instead of failing. Errors only
    /// come from the gateway commands `Load` and `Save`.
    pub fn handle_command(&mut self, command: Command) -> Result<Vec<Event>> {
        match command {
            Command::Load => self.load(),
            Command::SetPosition { at_ms } => Ok(self.set_position(at_ms)),
            Command::Cut => Ok(self.cut()),
            Command::ToggleSegmentDeleted => Ok(self.toggle_segment_deleted()),
            Command::MergeLeft => Ok(self.merge_left()),
            Command::MergeRight => Ok(self.merge_right()),
            Command::MergeAll => Ok(self.merge_all()),
            Command::SetPlaying { playing } => {
                self.playback.is_playing = playing;
                Ok(Vec::new())
            }
            Command::SetPreviewMode { enabled } => {
                self.playback.is_play_preview = enabled;
                Ok(Vec::new())
            }
            Command::AcknowledgePreviewSeek => {
                self.playback.preview_triggered = false;
                Ok(Vec::new())
            }
            Command::Save => self.save(),
        }
    }

    /// Current playhead position in milliseconds.
    pub fn currently_at(&self) -> i64 {
        self.currently_at
    }

    /// Index of the segment containing the playhead.
    pub fn active_segment(&self) -> usize {
        self.active_segment
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn playback(&self) -> PlaybackState {
        self.playback
    }

    /// True when edits exist that were not submitted yet.
    pub fn has_changes(&self) -> bool {
        self.has_changes
    }

    /// Creates an immutable snapshot for the UI.
    pub fn snapshot(&self) -> TimelineSnapshot {
        TimelineSnapshot {
            segments: self
                .timeline
                .segments
                .iter()
                .map(|segment| SegmentSummary {
                    id: segment.id,
                    start: segment.start,
                    end: segment.end,
                    deleted: segment.deleted,
                })
                .collect(),
            duration: self.timeline.duration,
            has_changes: self.has_changes,
        }
    }

    fn load(&mut self) -> Result<Vec<Event>> {
        let data = self.gateway.fetch()?;
        if data.duration <= 0 {
            return Err(EditorError::MissingDuration);
        }

        let segments = if data.segments.is_empty() {
            vec![Segment {
                id: self.allocate_segment_id(),
                start: 0,
                end: data.duration,
                deleted: false,
            }]
        } else {
            data.segments
                .iter()
                .map(|dto| Segment {
                    id: self.allocate_segment_id(),
                    start: dto.start,
                    end: dto.end,
                    deleted: dto.deleted,
                })
                .collect()
        };

        self.timeline = Timeline::from_parts(segments, data.duration)?;
        self.tracks = data.tracks;
        self.subtitles = data.subtitles;
        self.currently_at = 0;
        self.active_segment = 0;
        self.playback = PlaybackState::default();
        self.has_changes = false;

        info!(
            duration = data.duration,
            segment_count = self.timeline.segments.len(),
            "edit document loaded"
        );
        Ok(vec![
            Event::TimelineChanged(self.snapshot()),
            Event::PositionChanged {
                at_ms: 0,
                active_segment: 0,
            },
        ])
    }

    fn set_position(&mut self, at_ms: f64) -> Vec<Event> {
        self.currently_at = normalize_position(at_ms, self.timeline.duration);
        self.active_segment = self.timeline.active_segment_at(self.currently_at);

        let mut events = vec![Event::PositionChanged {
            at_ms: self.currently_at,
            active_segment: self.active_segment,
        }];
        self.skip_deleted_segment(&mut events);
        events
    }

    /// Preview-skip controller, run after every position update.
    fn skip_deleted_segment(&mut self, events: &mut Vec<Event>) {
        if !(self.playback.is_playing && self.playback.is_play_preview) {
            return;
        }
        if !self.timeline.segments[self.active_segment].deleted {
            return;
        }

        let skip = resolve_preview_skip(&self.timeline, self.active_segment);
        if skip.stop_playback {
            self.playback.is_playing = false;
            events.push(Event::PlaybackStopped);
        }

        // The target comes from the timeline itself, so the clamp path is
        // bypassed on purpose.
        self.currently_at = skip.seek_to;
        self.playback.preview_triggered = true;
        self.active_segment = self.timeline.active_segment_at(self.currently_at);

        debug!(
            at_ms = self.currently_at,
            active_segment = self.active_segment,
            stopped = skip.stop_playback,
            "preview skipped deleted range"
        );
        events.push(Event::PreviewSeek {
            at_ms: self.currently_at,
        });
    }

    fn cut(&mut self) -> Vec<Event> {
        let left_id = self.next_segment_id;
        let right_id = self.next_segment_id + 1;
        if !self
            .timeline
            .split_at(self.active_segment, self.currently_at, left_id, right_id)
        {
            return Vec::new();
        }
        self.next_segment_id += 2;
        self.active_segment = self.timeline.active_segment_at(self.currently_at);
        self.has_changes = true;

        info!(
            at_ms = self.currently_at,
            segment_count = self.timeline.segments.len(),
            "cut applied"
        );
        vec![Event::TimelineChanged(self.snapshot())]
    }

    fn toggle_segment_deleted(&mut self) -> Vec<Event> {
        self.timeline.toggle_deleted(self.active_segment);
        self.has_changes = true;
        vec![Event::TimelineChanged(self.snapshot())]
    }

    fn merge_left(&mut self) -> Vec<Event> {
        let Some(to) = self.active_segment.checked_sub(1) else {
            debug!("merge left ignored: active segment is the first");
            return Vec::new();
        };
        self.merge(self.active_segment, to)
    }

    fn merge_right(&mut self) -> Vec<Event> {
        self.merge(self.active_segment, self.active_segment + 1)
    }

    fn merge(&mut self, from: usize, to: usize) -> Vec<Event> {
        if !self.timeline.merge(from, to) {
            return Vec::new();
        }
        self.active_segment = self.timeline.active_segment_at(self.currently_at);
        self.has_changes = true;

        info!(
            from,
            to,
            segment_count = self.timeline.segments.len(),
            "merge applied"
        );
        vec![Event::TimelineChanged(self.snapshot())]
    }

    fn merge_all(&mut self) -> Vec<Event> {
        let mut applied = self.timeline.merge(self.active_segment, 0);
        self.active_segment = self.timeline.active_segment_at(self.currently_at);

        let last = self.timeline.segments.len() - 1;
        applied |= self.timeline.merge(self.active_segment, last);
        self.active_segment = self.timeline.active_segment_at(self.currently_at);

        if !applied {
            return Vec::new();
        }
        self.has_changes = true;

        info!(
            segment_count = self.timeline.segments.len(),
            "merge all applied"
        );
        vec![Event::TimelineChanged(self.snapshot())]
    }

    fn save(&mut self) -> Result<Vec<Event>> {
        let body = SubmitBody {
            segments: self
                .timeline
                .segments
                .iter()
                .map(|segment| SubmitSegment {
                    start: segment.start,
                    end: segment.end,
                    deleted: segment.deleted,
                    selected: false,
                })
                .collect(),
            tracks: self.tracks.clone(),
            customized_track_selection: false,
            subtitles: self.subtitles.clone(),
        };
        self.gateway.submit(&body)?;
        self.has_changes = false;

        info!(segment_count = body.segments.len(), "edit submitted");
        Ok(vec![Event::Saved])
    }

    fn allocate_segment_id(&mut self) -> SegmentId {
        let id = self.next_segment_id;
        self.next_segment_id += 1;
        id
    }
}

impl Editor<FileGateway> {
    /// Creates an editor wired to the file-backed gateway.
    pub fn with_file_gateway(input: PathBuf, output: PathBuf) -> Self {
        Self::new(FileGateway::new(input, output))
    }
}
