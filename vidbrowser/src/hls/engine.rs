use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use reqwest::{Client, Url};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{EngineError, PlaylistError};
use crate::session::{
    EngineEvent, EngineFactory, EventSender, FragmentLoad, FragmentStats, Level, StreamEngine,
    VideoSurface,
};

use super::playlist::{self, Segment};

/// Fragments fetched per source when not configured otherwise.
pub const DEFAULT_MAX_FRAGMENTS: usize = 5;

/**
    Creates [`HttpEngine`]s sharing one HTTP client.
*/
#[derive(Debug, Clone)]
pub struct HttpEngineFactory {
    client: Client,
    max_fragments: usize,
}

impl HttpEngineFactory {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            max_fragments: DEFAULT_MAX_FRAGMENTS,
        }
    }

    pub fn with_max_fragments(mut self, max_fragments: usize) -> Self {
        self.max_fragments = max_fragments;
        self
    }
}

impl Default for HttpEngineFactory {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl EngineFactory for HttpEngineFactory {
    /// Engines run as tokio tasks, so they need a runtime.
    fn is_supported(&self) -> bool {
        Handle::try_current().is_ok()
    }

    fn create(&self, events: EventSender) -> Box<dyn StreamEngine> {
        Box::new(HttpEngine {
            client: self.client.clone(),
            max_fragments: self.max_fragments,
            events,
            levels: Arc::new(Mutex::new(Vec::new())),
            task: None,
        })
    }
}

/**
    A probing engine that walks an HLS stream over HTTP.

    It loads the master playlist, the first level's media playlist and then
    the first few fragments one after another, reporting each step as an
    [`EngineEvent`]. Nothing is decoded.
*/
pub struct HttpEngine {
    client: Client,
    max_fragments: usize,
    events: EventSender,
    levels: Arc<Mutex<Vec<Level>>>,
    task: Option<JoinHandle<()>>,
}

impl StreamEngine for HttpEngine {
    fn load_source(&mut self, url: &str) {
        self.abort();
        self.levels.lock().clear();

        let url = match Url::parse(url) {
            Ok(url) => url,
            Err(e) => {
                self.events.send(EngineEvent::Error {
                    fatal: true,
                    details: format!("invalid source URL '{}': {}", url, e),
                });
                return;
            }
        };

        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                self.events.send(EngineEvent::Error {
                    fatal: true,
                    details: format!("no async runtime: {}", e),
                });
                return;
            }
        };

        let probe = Probe {
            client: self.client.clone(),
            events: self.events.clone(),
            levels: Arc::clone(&self.levels),
            max_fragments: self.max_fragments,
            start: Instant::now(),
        };
        self.task = Some(handle.spawn(probe.run(url)));
    }

    fn attach_media(&mut self, _surface: &mut dyn VideoSurface) {
        debug!("probe engine attached; fragments are fetched but not decoded");
    }

    fn levels(&self) -> Vec<Level> {
        self.levels.lock().clone()
    }

    fn destroy(&mut self) {
        self.abort();
    }

    fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }
}

impl HttpEngine {
    fn abort(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for HttpEngine {
    fn drop(&mut self) {
        self.abort();
    }
}

struct Probe {
    client: Client,
    events: EventSender,
    levels: Arc<Mutex<Vec<Level>>>,
    max_fragments: usize,
    start: Instant,
}

impl Probe {
    async fn run(self, url: Url) {
        let media_url = match self.load_manifest(&url).await {
            Ok(url) => url,
            Err(e) => {
                self.fail(format!("manifest load failed: {}", e));
                return;
            }
        };

        let segments = match self.load_level(&media_url).await {
            Ok(segments) => segments,
            Err(e) => {
                self.fail(format!("level load failed: {}", e));
                return;
            }
        };

        for segment in segments.iter().take(self.max_fragments) {
            let event = match self.load_fragment(segment).await {
                Ok(load) => EngineEvent::FragmentLoaded(load),
                Err(e) => {
                    warn!(uri = %segment.uri, "fragment load failed: {}", e);
                    EngineEvent::Error {
                        fatal: false,
                        details: format!("fragment load failed: {}", e),
                    }
                }
            };
            if !self.events.send(event) {
                return;
            }
        }

        debug!(url = %url, "probe finished");
    }

    /// Fetch the master playlist, publish its levels and return the first one's URL.
    async fn load_manifest(&self, url: &Url) -> Result<Url, EngineError> {
        let text = self.fetch_text(url).await?;
        let variants = playlist::parse_master(&text, url)?;

        let first = variants
            .first()
            .map(|v| v.uri.clone())
            .ok_or(PlaylistError::Empty)?;
        let count = variants.len();
        *self.levels.lock() = variants.into_iter().map(|v| v.level).collect();

        info!(url = %url, levels = count, "manifest parsed");
        self.events.send(EngineEvent::ManifestParsed { duration: None });
        Ok(first)
    }

    async fn load_level(&self, url: &Url) -> Result<Vec<Segment>, EngineError> {
        let text = self.fetch_text(url).await?;
        let media = playlist::parse_media(&text, url)?;

        let total_duration = media.total_duration();
        debug!(url = %url, segments = media.segments.len(), total_duration, "level loaded");
        self.events.send(EngineEvent::LevelLoaded {
            total_duration: Some(total_duration),
        });
        Ok(media.segments)
    }

    async fn load_fragment(&self, segment: &Segment) -> Result<FragmentLoad, EngineError> {
        let trequest = self.elapsed_ms();
        let response = self
            .client
            .get(segment.uri.clone())
            .send()
            .await?
            .error_for_status()?;
        let tfirst = self.elapsed_ms();
        let body = response.bytes().await?;
        let tload = self.elapsed_ms();

        let bytes = body.len() as u64;
        Ok(FragmentLoad {
            stats: FragmentStats {
                total: Some(bytes),
                length: None,
                loaded: Some(bytes),
                trequest: Some(trequest),
                tfirst: Some(tfirst),
                tload: Some(tload),
            },
            fragment_total: None,
            duration: segment.duration,
        })
    }

    async fn fetch_text(&self, url: &Url) -> Result<String, EngineError> {
        let response = self.client.get(url.clone()).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    fn fail(&self, details: String) {
        warn!("{}", details);
        self.events.send(EngineEvent::Error {
            fatal: true,
            details,
        });
    }
}

#[cfg(test)]
mod tests {
    use stream_types::{BandwidthSample, StreamMeta};

    use super::*;
    use crate::session::{HeadlessSurface, PlaybackSession, SessionObserver};

    #[test]
    fn unsupported_outside_runtime() {
        assert!(!HttpEngineFactory::default().is_supported());
    }

    #[tokio::test]
    async fn supported_inside_runtime() {
        assert!(HttpEngineFactory::default().with_max_fragments(1).is_supported());
    }

    struct Quiet;

    impl SessionObserver for Quiet {
        fn on_meta(&mut self, _meta: &StreamMeta) {}
        fn on_metrics(&mut self, _samples: &[BandwidthSample]) {}
    }

    #[tokio::test]
    async fn unparsable_source_is_fatal() {
        let mut session =
            PlaybackSession::new(HeadlessSurface::default(), HttpEngineFactory::default(), Quiet);
        session.attach("not a url/master.m3u8", None);
        assert!(session.has_engine());
        assert!(session.engine_finished());

        assert_eq!(session.pump(), 1);
        assert!(!session.has_engine());
        assert!(session.meta().is_none());
    }
}
