use tokio::sync::mpsc;

/**
    Transfer statistics reported by the engine for one fragment download.

    Times are milliseconds on the engine's own monotonic clock. Any field may
    be missing depending on the loader that produced the fragment.
*/
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FragmentStats {
    pub total: Option<u64>,
    pub length: Option<u64>,
    pub loaded: Option<u64>,
    pub trequest: Option<f64>,
    pub tfirst: Option<f64>,
    pub tload: Option<f64>,
}

/**
    A completed fragment download.
*/
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FragmentLoad {
    pub stats: FragmentStats,
    /// Byte total tracked on the fragment itself, used when `stats` has none.
    pub fragment_total: Option<u64>,
    /// Nominal fragment duration in seconds, from the playlist.
    pub duration: f64,
}

/**
    Events emitted by a segmented-streaming engine.
*/
#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    /// The manifest was parsed and the engine's levels are available.
    ManifestParsed { duration: Option<f64> },
    /// A level's details loaded, possibly with a more precise total duration.
    LevelLoaded { total_duration: Option<f64> },
    FragmentLoaded(FragmentLoad),
    Error { fatal: bool, details: String },
}

/**
    Events emitted by the video surface during native playback.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// The surface decoded enough to report dimensions and duration.
    LoadedMetadata,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    Engine(EngineEvent),
    Surface(SurfaceEvent),
}

impl From<EngineEvent> for SessionEvent {
    fn from(event: EngineEvent) -> Self {
        Self::Engine(event)
    }
}

impl From<SurfaceEvent> for SessionEvent {
    fn from(event: SurfaceEvent) -> Self {
        Self::Surface(event)
    }
}

/// An event tagged with the attach generation that produced it.
#[derive(Debug)]
pub(crate) struct Stamped {
    pub generation: u64,
    pub event: SessionEvent,
}

/**
    Handle given to an engine or surface for delivering events back to the
    session that attached it.

    Every sender is bound to one attach cycle. Once the session moves on to a
    new source, events sent through an old handle are discarded.
*/
#[derive(Clone, Debug)]
pub struct EventSender {
    generation: u64,
    tx: mpsc::UnboundedSender<Stamped>,
}

impl EventSender {
    pub(crate) fn new(generation: u64, tx: mpsc::UnboundedSender<Stamped>) -> Self {
        Self { generation, tx }
    }

    /**
        Queue an event for the session. Returns false if the session is gone.
    */
    pub fn send(&self, event: impl Into<SessionEvent>) -> bool {
        self.tx
            .send(Stamped {
                generation: self.generation,
                event: event.into(),
            })
            .is_ok()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
