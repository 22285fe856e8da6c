/*!
    Stream metadata types.
*/

use serde::{Deserialize, Serialize};

/**
    Information about one encoded rendition of a stream.
*/
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenditionInfo {
    /// Frame width in pixels (0 when unknown).
    pub width: u32,
    /// Frame height in pixels (0 when unknown).
    pub height: u32,
    /// Bitrate in bits per second (0 when unknown).
    pub bitrate: u64,
    /// Combined codec string, e.g. `avc1.4d401f,mp4a.40.2`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codecs: Option<String>,
}

/**
    Metadata describing the stream attached to a playback session.

    A session may publish this more than once for the same source when a more
    precise duration becomes known. Each publication is a complete snapshot
    that replaces the previous one.
*/
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamMeta {
    /// Renditions in the order the manifest lists them.
    pub renditions: Vec<RenditionInfo>,
    /// Total duration in seconds.
    pub duration: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_codec: Option<String>,
    pub rendition_count: usize,
}

impl StreamMeta {
    /**
        Builds metadata from a rendition list, deriving the codec pair from
        the first rendition's combined codec string.
    */
    pub fn from_renditions(renditions: Vec<RenditionInfo>, duration: f64) -> Self {
        let (video_codec, audio_codec) = renditions
            .first()
            .and_then(|r| r.codecs.as_deref())
            .map(split_codecs)
            .unwrap_or((None, None));

        Self {
            rendition_count: renditions.len(),
            renditions,
            duration,
            audio_codec,
            video_codec,
        }
    }

    /**
        Builds metadata for a directly played file, where the only thing
        known is the decoded picture size.
    */
    pub fn single(width: u32, height: u32, duration: f64) -> Self {
        Self {
            renditions: vec![RenditionInfo {
                width,
                height,
                bitrate: 0,
                codecs: None,
            }],
            duration,
            audio_codec: None,
            video_codec: None,
            rendition_count: 1,
        }
    }

    /**
        Returns the highest bitrate rendition, if any.
    */
    pub fn top_rendition(&self) -> Option<&RenditionInfo> {
        self.renditions.iter().max_by_key(|r| r.bitrate)
    }
}

/**
    Splits a combined codec string into `(video, audio)`.

    The video codec comes first, the audio codec second. Empty parts are
    reported as `None`.
*/
pub fn split_codecs(codecs: &str) -> (Option<String>, Option<String>) {
    let mut parts = codecs.split(',').map(str::trim);
    let non_empty = |s: Option<&str>| s.filter(|s| !s.is_empty()).map(str::to_string);
    let video = non_empty(parts.next());
    let audio = non_empty(parts.next());
    (video, audio)
}
