mod engine;
mod events;
mod player;
mod sampler;
mod surface;

pub use engine::{EngineFactory, Level, NoEngine, StreamEngine};
pub use events::{EngineEvent, EventSender, FragmentLoad, FragmentStats, SessionEvent, SurfaceEvent};
pub use player::{PlaybackSession, SessionObserver, Source, is_manifest_url};
pub use sampler::{BandwidthSampler, SAMPLE_CAPACITY, throughput_kbps};
pub use surface::{HeadlessSurface, ReadyState, VideoSurface};
