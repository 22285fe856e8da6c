use stream_types::RenditionInfo;

use super::events::EventSender;
use super::surface::VideoSurface;

/**
    A rendition as the engine reports it. Attributes the manifest omitted are
    `None`.
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Level {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub bitrate: Option<u64>,
    pub codecs: Option<String>,
}

impl From<&Level> for RenditionInfo {
    fn from(level: &Level) -> Self {
        Self {
            width: level.width.unwrap_or(0),
            height: level.height.unwrap_or(0),
            bitrate: level.bitrate.unwrap_or(0),
            codecs: level.codecs.clone(),
        }
    }
}

/**
    A segmented-streaming engine instance.

    The engine owns manifest fetching, rendition selection and buffering.
    The session only tells it where to load from and listens to the events it
    sends through the [`EventSender`] it was created with.
*/
pub trait StreamEngine {
    fn load_source(&mut self, url: &str);

    fn attach_media(&mut self, surface: &mut dyn VideoSurface);

    /// Levels known so far, in manifest order.
    fn levels(&self) -> Vec<Level>;

    /// Release every resource the engine holds. Must be idempotent.
    fn destroy(&mut self);

    /// True once the engine will not emit further events on its own.
    fn is_finished(&self) -> bool {
        false
    }
}

/**
    Creates engines for a playback session.
*/
pub trait EngineFactory {
    /// Whether engines can run in the current environment.
    fn is_supported(&self) -> bool;

    fn create(&self, events: EventSender) -> Box<dyn StreamEngine>;
}

/**
    A factory for environments without a streaming engine. Every source falls
    back to native playback.
*/
#[derive(Debug, Default, Clone, Copy)]
pub struct NoEngine;

impl EngineFactory for NoEngine {
    fn is_supported(&self) -> bool {
        false
    }

    fn create(&self, _events: EventSender) -> Box<dyn StreamEngine> {
        Box::new(NoEngine)
    }
}

impl StreamEngine for NoEngine {
    fn load_source(&mut self, _url: &str) {}

    fn attach_media(&mut self, _surface: &mut dyn VideoSurface) {}

    fn levels(&self) -> Vec<Level> {
        Vec::new()
    }

    fn destroy(&mut self) {}

    fn is_finished(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_defaults_missing_attributes_to_zero() {
        let level = Level {
            width: None,
            height: Some(720),
            bitrate: None,
            codecs: Some("avc1.4d401f".to_string()),
        };
        let rendition = RenditionInfo::from(&level);
        assert_eq!(rendition.width, 0);
        assert_eq!(rendition.height, 720);
        assert_eq!(rendition.bitrate, 0);
        assert_eq!(rendition.codecs.as_deref(), Some("avc1.4d401f"));
    }

    #[test]
    fn no_engine_is_unsupported() {
        assert!(!NoEngine.is_supported());
    }
}
