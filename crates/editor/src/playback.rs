use crate::timeline::Timeline;

/// Player flags shared between the editor and the video-player collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackState {
    pub is_playing: bool,
    /// Preview mode: playback skips deleted segments as if already cut.
    pub is_play_preview: bool,
    /// One-shot flag: the player must perform an actual seek after the
    /// preview skip moved the position behind its back.
    pub preview_triggered: bool,
}

/// Rounds a raw player position to whole milliseconds and clamps it into
/// `[0, duration]`.
///
/// Total by design: out-of-range input is clamped silently, never reported.
/// The upper clamp only applies once the duration is known (nonzero).
///
/// # Example
/// ```
/// use editor::playback::normalize_position;
///
/// assert_eq!(normalize_position(-42.0, 100), 0);
/// assert_eq!(normalize_position(150.0, 100), 100);
/// assert_eq!(normalize_position(4.6, 100), 5);
/// ```
pub fn normalize_position(at_ms: f64, duration: i64) -> i64 {
    let rounded = at_ms.round() as i64;
    if rounded < 0 {
        return 0;
    }
    if duration > 0 && rounded > duration {
        return duration;
    }
    rounded
}

/// Seek decision produced when preview playback lands in a deleted segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PreviewSkip {
    pub seek_to: i64,
    pub stop_playback: bool,
}

/// Finds where preview playback jumps to from the deleted segment at
/// `active`.
///
/// Scans forward for the next alive segment and targets one millisecond past
/// its start, so the new position cannot land on the boundary shared with the
/// deleted predecessor and immediately re-enter the skip branch. When no
/// alive segment remains ahead, playback halts and the position wraps to the
/// first alive segment of the whole timeline; a fully deleted timeline leaves
/// it at the final segment's end.
pub(crate) fn resolve_preview_skip(timeline: &Timeline, active: usize) -> PreviewSkip {
    let mut seek_to = 0;
    for segment in &timeline.segments[active..] {
        seek_to = segment.end;
        if !segment.deleted {
            return PreviewSkip {
                seek_to: segment.start + 1,
                stop_playback: false,
            };
        }
    }

    if let Some(first_alive) = timeline.segments.iter().find(|segment| !segment.deleted) {
        seek_to = first_alive.start;
    }
    PreviewSkip {
        seek_to,
        stop_playback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::{PreviewSkip, normalize_position, resolve_preview_skip};
    use crate::timeline::{Segment, Timeline};

    fn timeline(flags: &[bool]) -> Timeline {
        let segments = flags
            .iter()
            .enumerate()
            .map(|(index, deleted)| Segment {
                id: index as u64 + 1,
                start: index as i64 * 10,
                end: (index as i64 + 1) * 10,
                deleted: *deleted,
            })
            .collect::<Vec<_>>();
        let duration = flags.len() as i64 * 10;
        Timeline { segments, duration }
    }

    #[test]
    fn normalize_rounds_to_nearest_millisecond() {
        assert_eq!(normalize_position(4.4, 100), 4);
        assert_eq!(normalize_position(4.5, 100), 5);
    }

    #[test]
    fn normalize_clamps_negative_positions_to_zero() {
        assert_eq!(normalize_position(-42.0, 100), 0);
    }

    #[test]
    fn normalize_clamps_to_duration_when_known() {
        assert_eq!(normalize_position(150.0, 100), 100);
        // Duration unknown before the edit document arrives: no upper clamp.
        assert_eq!(normalize_position(150.0, 0), 150);
    }

    #[test]
    fn skip_targets_one_millisecond_past_the_next_alive_start() {
        let timeline = timeline(&[false, true, false]);

        assert_eq!(
            resolve_preview_skip(&timeline, 1),
            PreviewSkip {
                seek_to: 21,
                stop_playback: false,
            }
        );
    }

    #[test]
    fn skip_with_no_alive_segment_ahead_halts_and_wraps_to_start() {
        let timeline = timeline(&[false, true, true]);

        assert_eq!(
            resolve_preview_skip(&timeline, 1),
            PreviewSkip {
                seek_to: 0,
                stop_playback: true,
            }
        );
    }

    #[test]
    fn skip_on_fully_deleted_timeline_halts_at_the_final_end() {
        let timeline = timeline(&[true, true]);

        assert_eq!(
            resolve_preview_skip(&timeline, 0),
            PreviewSkip {
                seek_to: 20,
                stop_playback: true,
            }
        );
    }
}
