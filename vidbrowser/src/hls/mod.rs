/*!
    HLS over plain HTTP: playlist parsing and a probing [`HttpEngine`] that
    drives a playback session without decoding anything.
*/

mod engine;
pub mod playlist;

pub use engine::{DEFAULT_MAX_FRAGMENTS, HttpEngine, HttpEngineFactory};
pub use playlist::{MediaPlaylist, Segment, Variant, parse_master, parse_media};
