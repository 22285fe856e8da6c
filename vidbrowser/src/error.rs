use std::path::PathBuf;

use thiserror::Error;

use crate::session::ReadyState;

/// Why a frame capture produced no result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    // ── Preconditions ─────────────────────────────────────────────────
    #[error("no video surface")]
    NoSurface,
    #[error("video not ready (ready state {0:?})")]
    NotReady(ReadyState),
    #[error("video dimensions are {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    // ── Output ────────────────────────────────────────────────────────
    #[error("surface did not produce a frame")]
    NoFrame,
    #[error("failed to encode frame: {0}")]
    Encode(String),
    #[error("encoded frame is degenerate ({0} chars)")]
    Degenerate(usize),
}

/// Rejection of a playback start request, typically by autoplay policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("playback start rejected: {0}")]
pub struct PlayRejected(pub String);

#[derive(Debug, Error)]
pub enum ListingError {
    #[error("failed to read listing {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid listing document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("listing is for bucket '{found}', expected '{expected}'")]
    BucketMismatch { expected: String, found: String },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    // ── Validation ────────────────────────────────────────────────────
    #[error("Bucket name is required")]
    MissingBucket,
    #[error("Access Key ID is required")]
    MissingAccessKeyId,
    #[error("Secret Access Key is required")]
    MissingSecretAccessKey,

    // ── Storage ───────────────────────────────────────────────────────
    #[error("could not determine the local data directory")]
    NoDataDir,
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaylistError {
    #[error("missing #EXTM3U header")]
    MissingHeader,
    #[error("playlist has no variants or segments")]
    Empty,
    #[error("invalid URI '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Playlist(#[from] PlaylistError),
}
