use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use clap::Parser;
use stream_types::{BandwidthSample, BandwidthSummary, StreamMeta};
use tracing::{debug, info, warn};

use crate::hls::{DEFAULT_MAX_FRAGMENTS, HttpEngineFactory};
use crate::session::{HeadlessSurface, PlaybackSession, SessionObserver};
use crate::util::time;

/// How long to wait for an event before checking the engine and deadline again.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
pub struct ProbeCommand {
    /// Master (or media) playlist URL
    pub url: String,

    /// Display title for the source
    #[arg(short, long)]
    pub title: Option<String>,

    /// Number of fragments to download
    #[arg(short, long, default_value_t = DEFAULT_MAX_FRAGMENTS)]
    pub fragments: usize,

    /// Give up after this many seconds
    #[arg(long, default_value = "30")]
    pub timeout: u64,
}

impl ProbeCommand {
    pub async fn run(self) -> Result<()> {
        let engines = HttpEngineFactory::default().with_max_fragments(self.fragments);
        let mut session =
            PlaybackSession::new(HeadlessSurface::default(), engines, ProbeReport::default());

        session.attach(self.url.clone(), self.title.clone());
        if !session.has_engine() {
            bail!("'{}' is not an HLS manifest URL", self.url);
        }

        let deadline = Instant::now() + Duration::from_secs(self.timeout);
        loop {
            session.pump();
            if !session.has_engine() || session.engine_finished() {
                // Drain what the engine queued before it stopped
                session.pump();
                break;
            }
            if Instant::now() >= deadline {
                warn!("probe timed out after {}s", self.timeout);
                break;
            }
            let _ = tokio::time::timeout(POLL_INTERVAL, session.next_event()).await;
        }

        let summary = session.summary();
        print_report(&self.url, self.title.as_deref(), session.meta(), &summary);

        let report = session.observer();
        debug!(
            meta_updates = report.meta_updates,
            metric_updates = report.metric_updates,
            "probe done"
        );
        Ok(())
    }
}

/**
    Logs what the session learns while the probe runs.
*/
#[derive(Debug, Default)]
struct ProbeReport {
    meta_updates: usize,
    metric_updates: usize,
}

impl SessionObserver for ProbeReport {
    fn on_meta(&mut self, meta: &StreamMeta) {
        self.meta_updates += 1;
        info!(
            renditions = meta.rendition_count,
            duration = meta.duration,
            "stream metadata"
        );
    }

    fn on_metrics(&mut self, samples: &[BandwidthSample]) {
        self.metric_updates += 1;
        if let Some(last) = samples.last() {
            info!(kbps = last.kbps.round(), samples = samples.len(), "fragment loaded");
        }
    }
}

fn print_report(url: &str, title: Option<&str>, meta: Option<&StreamMeta>, summary: &BandwidthSummary) {
    match title {
        Some(title) => println!("Source: {} ({})", title, url),
        None => println!("Source: {}", url),
    }

    match meta {
        Some(meta) => {
            println!("Duration: {:.1}s", meta.duration);
            println!(
                "Codecs: video {}, audio {}",
                meta.video_codec.as_deref().unwrap_or("unknown"),
                meta.audio_codec.as_deref().unwrap_or("unknown")
            );
            println!("Renditions ({}):", meta.rendition_count);
            for r in &meta.renditions {
                println!("  - {}x{} @ {} kbps", r.width, r.height, r.bitrate / 1000);
            }
        }
        None => println!("No stream metadata"),
    }

    if summary.sample_count == 0 {
        println!("Bandwidth: no samples");
        return;
    }

    println!(
        "Bandwidth: {:.0} kbps average over {} samples",
        summary.average_kbps, summary.sample_count
    );
    if let Some(last) = summary.last_sample_time {
        println!("  Last sample: {}", time::format_millis(last));
    }
    if let Some(span) = summary.span_secs {
        println!("  Span: {:.1}s", span);
    }
}
