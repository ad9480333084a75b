//! UI-agnostic segment-timeline core for the video cut editor.
//!
//! Owns the ordered, gapless cut timeline, the playhead, the cut/merge
//! operations, and the preview-mode skipping of deleted segments. The remote
//! editing backend sits behind the [`gateway::EditGateway`] trait.

pub mod api;
pub mod error;
pub mod gateway;
pub mod playback;
pub mod timeline;

pub use api::{Command, Editor, Event, SegmentSummary, TimelineSnapshot};
pub use error::{EditorError, Result};
pub use gateway::{EditData, EditGateway, FileGateway, SegmentDto, SubmitBody, SubmitSegment};
pub use playback::{PlaybackState, normalize_position};
pub use timeline::{Segment, SegmentId, Timeline};
