/*!
    Bandwidth sample types.
*/

use serde::{Deserialize, Serialize};

/**
    One throughput observation derived from a completed fragment download.
*/
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BandwidthSample {
    /// Wall clock time the sample was computed, in epoch milliseconds.
    pub time: i64,
    /// Observed throughput in kilobits per second.
    pub kbps: f64,
}

/**
    Aggregate view over a sequence of samples, oldest first.
*/
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct BandwidthSummary {
    pub sample_count: usize,
    /// Mean throughput, 0 when there are no samples.
    pub average_kbps: f64,
    pub last_sample_time: Option<i64>,
    /// Seconds between the first and last sample.
    pub span_secs: Option<f64>,
}

impl BandwidthSummary {
    pub fn from_samples(samples: &[BandwidthSample]) -> Self {
        let (Some(first), Some(last)) = (samples.first(), samples.last()) else {
            return Self::default();
        };

        let total: f64 = samples.iter().map(|s| s.kbps).sum();

        Self {
            sample_count: samples.len(),
            average_kbps: total / samples.len() as f64,
            last_sample_time: Some(last.time),
            span_secs: Some((last.time - first.time) as f64 / 1000.0),
        }
    }
}
