use stream_types::{BandwidthSample, BandwidthSummary, FrameInfo, RenditionInfo, StreamMeta};
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::capture;
use crate::util::time;

use super::engine::{EngineFactory, StreamEngine};
use super::events::{EngineEvent, EventSender, FragmentLoad, SessionEvent, Stamped, SurfaceEvent};
use super::sampler::BandwidthSampler;
use super::surface::VideoSurface;

/**
    Receives what a playback session learns about its stream.
*/
pub trait SessionObserver {
    /// A new metadata snapshot, replacing any previous one.
    fn on_meta(&mut self, meta: &StreamMeta);

    /// The full sample buffer, oldest first, after a new sample arrived.
    fn on_metrics(&mut self, samples: &[BandwidthSample]);
}

/**
    Returns true if the URL points at a segmented-streaming manifest.
*/
pub fn is_manifest_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.to_ascii_lowercase().ends_with(".m3u8")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Source {
    pub url: String,
    pub title: Option<String>,
}

enum Attachment {
    Idle,
    Engine(Box<dyn StreamEngine>),
    /// The engine hit a fatal error and was destroyed.
    EngineFailed,
    Native { metadata_seen: bool },
}

/**
    One playback session: a video surface, the engine currently attached to
    it, and the telemetry gathered for the current source.

    All events are consumed on the thread that owns the session, one at a
    time, in the order they were queued.
*/
pub struct PlaybackSession<S: VideoSurface, O: SessionObserver> {
    surface: Option<S>,
    engines: Box<dyn EngineFactory>,
    observer: O,
    attachment: Attachment,
    source: Option<Source>,
    meta: Option<StreamMeta>,
    sampler: BandwidthSampler,
    /// Bumped on every detach; events stamped with an older value are stale.
    generation: u64,
    events_tx: mpsc::UnboundedSender<Stamped>,
    events_rx: mpsc::UnboundedReceiver<Stamped>,
}

impl<S: VideoSurface, O: SessionObserver> PlaybackSession<S, O> {
    pub fn new(surface: S, engines: impl EngineFactory + 'static, observer: O) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            surface: Some(surface),
            engines: Box::new(engines),
            observer,
            attachment: Attachment::Idle,
            source: None,
            meta: None,
            sampler: BandwidthSampler::default(),
            generation: 0,
            events_tx,
            events_rx,
        }
    }

    /**
        Attach playback of `url`, releasing whatever was attached before.
    */
    pub fn attach(&mut self, url: impl Into<String>, title: Option<String>) {
        self.detach();

        let url = url.into();
        let Some(surface) = self.surface.as_mut() else {
            warn!("cannot attach {}: no video surface", url);
            return;
        };

        let events = EventSender::new(self.generation, self.events_tx.clone());

        if is_manifest_url(&url) && self.engines.is_supported() {
            info!(%url, "attaching streaming engine");
            let mut engine = self.engines.create(events);
            engine.load_source(&url);
            engine.attach_media(surface);
            self.attachment = Attachment::Engine(engine);
        } else {
            info!(%url, "attaching native playback");
            surface.load(&url, events);
            self.attachment = Attachment::Native {
                metadata_seen: false,
            };
        }

        self.source = Some(Source { url, title });
    }

    /**
        Release the current source: destroy the engine, unload the surface,
        and drop the metadata and samples gathered for it.
    */
    pub fn detach(&mut self) {
        if let Attachment::Engine(mut engine) =
            std::mem::replace(&mut self.attachment, Attachment::Idle)
        {
            engine.destroy();
        }

        if self.source.take().is_some()
            && let Some(surface) = self.surface.as_mut()
        {
            surface.unload();
        }

        self.generation += 1;
        self.sampler.clear();
        self.meta = None;
    }

    /**
        Detach and hand the surface back. The session can no longer play or
        capture afterwards.
    */
    pub fn release_surface(&mut self) -> Option<S> {
        self.detach();
        self.surface.take()
    }

    /**
        Dispatch every event already queued. Returns how many were handled.
    */
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(stamped) = self.events_rx.try_recv() {
            self.dispatch(stamped);
            handled += 1;
        }
        handled
    }

    /**
        Wait for the next event and dispatch it.
    */
    pub async fn next_event(&mut self) {
        // The session holds a sender, so the channel never closes
        if let Some(stamped) = self.events_rx.recv().await {
            self.dispatch(stamped);
        }
    }

    /**
        Capture the frame currently shown on the surface.

        The caller decides where the frame goes; the session keeps no record
        of it.
    */
    pub fn capture_frame(&self) -> Option<FrameInfo> {
        let surface = self.surface.as_ref().map(|s| s as &dyn VideoSurface);
        let (url, title) = match &self.source {
            Some(source) => (source.url.as_str(), source.title.as_deref()),
            None => ("", None),
        };
        capture::capture_frame(surface, url, title)
    }

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    pub fn meta(&self) -> Option<&StreamMeta> {
        self.meta.as_ref()
    }

    pub fn samples(&self) -> impl Iterator<Item = &BandwidthSample> {
        self.sampler.iter()
    }

    pub fn summary(&mut self) -> BandwidthSummary {
        self.sampler.summary()
    }

    pub fn has_engine(&self) -> bool {
        matches!(self.attachment, Attachment::Engine(_))
    }

    /// True when an engine is attached and has nothing more to deliver.
    pub fn engine_finished(&self) -> bool {
        match &self.attachment {
            Attachment::Engine(engine) => engine.is_finished(),
            _ => false,
        }
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    fn dispatch(&mut self, stamped: Stamped) {
        if stamped.generation != self.generation {
            trace!(
                generation = stamped.generation,
                current = self.generation,
                "dropping stale event"
            );
            return;
        }

        match stamped.event {
            SessionEvent::Engine(EngineEvent::ManifestParsed { duration }) => {
                self.on_manifest_parsed(duration)
            }
            SessionEvent::Engine(EngineEvent::LevelLoaded { total_duration }) => {
                self.on_level_loaded(total_duration)
            }
            SessionEvent::Engine(EngineEvent::FragmentLoaded(load)) => self.on_fragment_loaded(&load),
            SessionEvent::Engine(EngineEvent::Error { fatal, details }) => {
                self.on_engine_error(fatal, &details)
            }
            SessionEvent::Surface(SurfaceEvent::LoadedMetadata) => self.on_loaded_metadata(),
        }
    }

    fn on_manifest_parsed(&mut self, duration: Option<f64>) {
        let Some(renditions) = self.engine_renditions() else {
            return;
        };

        self.publish_meta(StreamMeta::from_renditions(
            renditions,
            duration.unwrap_or(0.0),
        ));

        if let Some(surface) = self.surface.as_mut()
            && let Err(e) = surface.play()
        {
            // Autoplay policies reject this routinely
            trace!("{}", e);
        }
    }

    fn on_level_loaded(&mut self, total_duration: Option<f64>) {
        let Some(duration) = total_duration.filter(|d| d.is_finite() && *d > 0.0) else {
            return;
        };
        let Some(renditions) = self.engine_renditions() else {
            return;
        };

        self.publish_meta(StreamMeta::from_renditions(renditions, duration));
    }

    fn on_fragment_loaded(&mut self, load: &FragmentLoad) {
        if !self.has_engine() {
            return;
        }

        if self.sampler.record(load, time::now_millis()).is_none() {
            trace!("fragment without usable size or timing");
            return;
        }

        let samples = self.sampler.as_slice();
        self.observer.on_metrics(samples);
    }

    fn on_engine_error(&mut self, fatal: bool, details: &str) {
        if !fatal {
            debug!("engine error (recoverable): {}", details);
            return;
        }

        if let Attachment::Engine(mut engine) =
            std::mem::replace(&mut self.attachment, Attachment::EngineFailed)
        {
            warn!("fatal engine error, releasing engine: {}", details);
            engine.destroy();
        } else {
            // Nothing to release; keep whatever state we were in
            debug!("fatal engine error without an engine: {}", details);
        }
    }

    fn on_loaded_metadata(&mut self) {
        let Attachment::Native { metadata_seen } = &mut self.attachment else {
            return;
        };
        if *metadata_seen {
            return;
        }
        *metadata_seen = true;

        let Some(surface) = self.surface.as_ref() else {
            return;
        };
        let meta = StreamMeta::single(
            surface.video_width(),
            surface.video_height(),
            surface.duration(),
        );
        self.publish_meta(meta);
    }

    fn engine_renditions(&self) -> Option<Vec<RenditionInfo>> {
        match &self.attachment {
            Attachment::Engine(engine) => {
                Some(engine.levels().iter().map(RenditionInfo::from).collect())
            }
            _ => None,
        }
    }

    fn publish_meta(&mut self, meta: StreamMeta) {
        debug!(
            renditions = meta.rendition_count,
            duration = meta.duration,
            "stream metadata"
        );
        self.observer.on_meta(&meta);
        self.meta = Some(meta);
    }
}

impl<S: VideoSurface, O: SessionObserver> Drop for PlaybackSession<S, O> {
    fn drop(&mut self) {
        if let Attachment::Engine(engine) = &mut self.attachment {
            engine.destroy();
        }
    }
}
