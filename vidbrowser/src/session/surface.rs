use image::RgbaImage;

use crate::error::PlayRejected;

use super::events::EventSender;

/**
    How much of the current media the surface has decoded.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    HaveNothing,
    HaveMetadata,
    /// Data for the current playback position is decoded.
    HaveCurrentData,
    HaveFutureData,
    HaveEnoughData,
}

/**
    The video output a playback session renders into.

    Engines bind to it through [`super::StreamEngine::attach_media`]; native
    playback loads the URL into it directly.
*/
pub trait VideoSurface {
    /**
        Play `url` natively. The surface reports
        [`super::SurfaceEvent::LoadedMetadata`] through `events` once the
        dimensions and duration are known.
    */
    fn load(&mut self, url: &str, events: EventSender);

    /// Drop whatever source is loaded.
    fn unload(&mut self);

    /// Request playback start. May be rejected by autoplay policy.
    fn play(&mut self) -> Result<(), PlayRejected>;

    fn ready_state(&self) -> ReadyState;

    /// Decoded picture width in pixels, 0 before metadata.
    fn video_width(&self) -> u32;

    /// Decoded picture height in pixels, 0 before metadata.
    fn video_height(&self) -> u32;

    /// Playback position in seconds.
    fn current_time(&self) -> f64;

    /// Media duration in seconds, NaN when unknown.
    fn duration(&self) -> f64;

    /**
        Render the current frame into an off-screen raster.

        Returns `None` when the frame cannot be read back, for example when
        the surface content is restricted.
    */
    fn snapshot(&self) -> Option<RgbaImage>;
}

/**
    A surface with no decoder, for driving an engine without any output.
*/
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    source: Option<String>,
}

impl HeadlessSurface {
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl VideoSurface for HeadlessSurface {
    fn load(&mut self, url: &str, _events: EventSender) {
        self.source = Some(url.to_string());
    }

    fn unload(&mut self) {
        self.source = None;
    }

    fn play(&mut self) -> Result<(), PlayRejected> {
        Ok(())
    }

    fn ready_state(&self) -> ReadyState {
        ReadyState::HaveNothing
    }

    fn video_width(&self) -> u32 {
        0
    }

    fn video_height(&self) -> u32 {
        0
    }

    fn current_time(&self) -> f64 {
        0.0
    }

    fn duration(&self) -> f64 {
        f64::NAN
    }

    fn snapshot(&self) -> Option<RgbaImage> {
        None
    }
}
