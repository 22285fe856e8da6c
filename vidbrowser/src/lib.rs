/*!
    Core of an HLS media browser: bucket listings, playback sessions with
    metadata and bandwidth telemetry, and still frame capture.
*/

pub mod capture;
pub mod cli;
pub mod collection;
pub mod error;
pub mod hls;
pub mod listing;
pub mod session;
pub mod settings;
pub mod util;
