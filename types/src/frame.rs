use serde::{Deserialize, Serialize};

/// Title given to frames whose source has no title of its own.
pub const DEFAULT_SOURCE_TITLE: &str = "Unknown Video";

/**
    A still frame captured from a playing video.

    Records are created only by an explicit capture and are never modified
    afterwards; a collection may only add or remove them.
*/
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameInfo {
    pub id: String,
    /// Capture time in epoch milliseconds.
    pub timestamp: i64,
    /// Playback position of the captured frame, in seconds.
    pub current_time: f64,
    pub width: u32,
    pub height: u32,
    /// Self-contained encoded image, as a `data:` URI.
    pub image_data: String,
    pub source_url: String,
    pub source_title: String,
}
