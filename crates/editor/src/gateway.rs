use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{EditorError, Result};

/// One cut range as served by the editing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDto {
    pub start: i64,
    pub end: i64,
    #[serde(default)]
    pub deleted: bool,
}

/// Contents of the fetched edit document.
///
/// Tracks, workflows, and subtitles are opaque to the editor core and are
/// carried through to the submit payload untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditData {
    /// Total video duration in milliseconds.
    pub duration: i64,
    #[serde(default)]
    pub segments: Vec<SegmentDto>,
    #[serde(default)]
    pub tracks: Vec<Value>,
    #[serde(default)]
    pub workflows: Vec<Value>,
    #[serde(default)]
    pub subtitles: Value,
}

/// One segment in the submit payload.
///
/// `selected` is always sent as `false`: a vestige of an unused feature,
/// kept for backend compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitSegment {
    pub start: i64,
    pub end: i64,
    pub deleted: bool,
    pub selected: bool,
}

/// Payload posted back to the editing backend on save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBody {
    pub segments: Vec<SubmitSegment>,
    pub tracks: Vec<Value>,
    pub customized_track_selection: bool,
    pub subtitles: Value,
}

/// Editing-backend operations required by the editor.
pub trait EditGateway {
    /// Fetches the edit document for the current event.
    fn fetch(&self) -> Result<EditData>;

    /// Submits the edited segment list for saving or processing.
    fn submit(&self, body: &SubmitBody) -> Result<()>;
}

/// File-backed gateway used by the CLI and local workflows.
///
/// Reads the edit document from `input` and writes the submit payload to
/// `output`.
#[derive(Debug, Clone)]
pub struct FileGateway {
    input: PathBuf,
    output: PathBuf,
}

impl FileGateway {
    pub fn new(input: PathBuf, output: PathBuf) -> Self {
        Self { input, output }
    }
}

impl EditGateway for FileGateway {
    fn fetch(&self) -> Result<EditData> {
        let raw = fs::read_to_string(&self.input).map_err(|source| EditorError::GatewayIo {
            context: "reading edit document",
            path: self.input.clone(),
            source,
        })?;
        let data =
            serde_json::from_str(&raw).map_err(|source| EditorError::GatewaySerialization {
                path: self.input.clone(),
                source,
            })?;
        debug!(path = ?self.input, "edit document read");
        Ok(data)
    }

    fn submit(&self, body: &SubmitBody) -> Result<()> {
        let raw = serde_json::to_string_pretty(body).map_err(|source| {
            EditorError::GatewaySerialization {
                path: self.output.clone(),
                source,
            }
        })?;
        fs::write(&self.output, raw).map_err(|source| EditorError::GatewayIo {
            context: "writing submit payload",
            path: self.output.clone(),
            source,
        })?;
        debug!(path = ?self.output, "submit payload written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{EditData, SubmitBody, SubmitSegment};

    #[test]
    fn edit_data_parses_a_full_document() {
        let data: EditData = serde_json::from_value(json!({
            "duration": 30_000,
            "segments": [
                { "start": 0, "end": 10_000, "deleted": false },
                { "start": 10_000, "end": 30_000, "deleted": true }
            ],
            "tracks": [{ "id": "track-1" }],
            "workflows": [{ "id": "cutting" }],
            "subtitles": {}
        }))
        .expect("document should parse");

        assert_eq!(data.duration, 30_000);
        assert_eq!(data.segments.len(), 2);
        assert!(data.segments[1].deleted);
        assert_eq!(data.tracks.len(), 1);
        assert_eq!(data.workflows.len(), 1);
    }

    #[test]
    fn edit_data_defaults_missing_collections() {
        let data: EditData = serde_json::from_value(json!({ "duration": 5_000 }))
            .expect("document should parse");

        assert!(data.segments.is_empty());
        assert!(data.tracks.is_empty());
        assert!(data.workflows.is_empty());
        assert!(data.subtitles.is_null());
    }

    #[test]
    fn segment_dto_defaults_deleted_to_false() {
        let data: EditData = serde_json::from_value(json!({
            "duration": 5_000,
            "segments": [{ "start": 0, "end": 5_000 }]
        }))
        .expect("document should parse");

        assert!(!data.segments[0].deleted);
    }

    #[test]
    fn submit_body_serializes_with_camel_case_track_selection_key() {
        let body = SubmitBody {
            segments: vec![SubmitSegment {
                start: 0,
                end: 5_000,
                deleted: true,
                selected: false,
            }],
            tracks: Vec::new(),
            customized_track_selection: false,
            subtitles: serde_json::Value::Null,
        };

        let value = serde_json::to_value(&body).expect("body should serialize");
        assert!(value.get("customizedTrackSelection").is_some());
        assert_eq!(value["segments"][0]["selected"], false);
    }
}
