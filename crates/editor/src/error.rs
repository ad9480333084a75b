use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Result type used by the editor crate.
pub type Result<T> = std::result::Result<T, EditorError>;

/// Errors produced by the gateway and by loading the edit document.
///
/// Timeline edits themselves never fail: a cut on a segment boundary or a
/// merge past the list bounds is absorbed as a silent no-op, because the UI
/// hides those actions at the boundaries anyway.
#[derive(Debug)]
pub enum EditorError {
    MissingDuration,
    MalformedSegments {
        reason: String,
    },
    GatewayIo {
        context: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
    GatewaySerialization {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl Display for EditorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingDuration => write!(f, "edit document reports no duration"),
            Self::MalformedSegments { reason } => {
                write!(f, "edit document segments are malformed: {reason}")
            }
            Self::GatewayIo {
                context,
                path,
                source,
            } => write!(f, "{context}: {} ({source})", path.display()),
            Self::GatewaySerialization { path, source } => {
                write!(
                    f,
                    "edit document serialization/deserialization failed at {} ({source})",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::GatewayIo { source, .. } => Some(source),
            Self::GatewaySerialization { source, .. } => Some(source),
            _ => None,
        }
    }
}
