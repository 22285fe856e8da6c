/*!
    Shared types for the stream browser.

    This crate defines the records that cross component boundaries: stream
    metadata published by a playback session, bandwidth samples, captured
    frames and object listing entries. It performs no I/O, so consumers can
    depend on it without pulling in the runtime, HTTP or image stacks.
*/

mod frame;
mod listing;
mod meta;
mod sample;

pub use frame::{DEFAULT_SOURCE_TITLE, FrameInfo};
pub use listing::ListingEntry;
pub use meta::{RenditionInfo, StreamMeta, split_codecs};
pub use sample::{BandwidthSample, BandwidthSummary};
