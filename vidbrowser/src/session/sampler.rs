use std::collections::VecDeque;

use stream_types::{BandwidthSample, BandwidthSummary};

use super::events::FragmentLoad;

/// Number of samples a session retains.
pub const SAMPLE_CAPACITY: usize = 100;

/**
    Rolling window of throughput samples derived from fragment downloads.
    Appending past capacity evicts the oldest sample first.
*/
#[derive(Debug, Clone)]
pub struct BandwidthSampler {
    samples: VecDeque<BandwidthSample>,
    capacity: usize,
}

impl BandwidthSampler {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /**
        Compute a sample for a completed fragment and append it.

        Returns `None` without touching the buffer when the fragment has no
        byte count or no positive duration.
    */
    pub fn record(&mut self, load: &FragmentLoad, time: i64) -> Option<BandwidthSample> {
        let kbps = throughput_kbps(load)?;
        let sample = BandwidthSample { time, kbps };
        self.push(sample);
        Some(sample)
    }

    pub fn push(&mut self, sample: BandwidthSample) {
        self.samples.push_back(sample);

        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Samples oldest first.
    pub fn as_slice(&mut self) -> &[BandwidthSample] {
        self.samples.make_contiguous()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BandwidthSample> {
        self.samples.iter()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    pub fn summary(&mut self) -> BandwidthSummary {
        BandwidthSummary::from_samples(self.as_slice())
    }
}

impl Default for BandwidthSampler {
    fn default() -> Self {
        Self::new(SAMPLE_CAPACITY)
    }
}

/**
    Throughput of a fragment download in kbps, if it can be determined.

    Bits per millisecond is numerically equal to kilobits per second.
*/
pub fn throughput_kbps(load: &FragmentLoad) -> Option<f64> {
    let bytes = byte_count(load);
    let ms = load_millis(load);

    if bytes == 0 || !ms.is_finite() || ms <= 0.0 {
        return None;
    }

    let kbps = (bytes as f64 * 8.0) / ms;
    (kbps.is_finite() && kbps > 0.0).then_some(kbps)
}

fn byte_count(load: &FragmentLoad) -> u64 {
    let stats = &load.stats;
    stats
        .total
        .or(stats.length)
        .or(stats.loaded)
        .or(load.fragment_total)
        .unwrap_or(0)
}

fn load_millis(load: &FragmentLoad) -> f64 {
    let stats = &load.stats;
    let nonzero = |t: Option<f64>| t.filter(|t| *t != 0.0);

    let mut ms: f64 = 0.0;
    if let Some(tload) = nonzero(stats.tload)
        && let Some(start) = nonzero(stats.tfirst.or(stats.trequest))
    {
        ms = tload - start;
    }

    // Timing unavailable, estimate from the nominal duration
    if !ms.is_finite() || ms <= 0.0 {
        ms = load.duration * 1000.0;
    }

    ms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::events::FragmentStats;

    fn timed(bytes: u64, trequest: f64, tload: f64) -> FragmentLoad {
        FragmentLoad {
            stats: FragmentStats {
                total: Some(bytes),
                trequest: Some(trequest),
                tload: Some(tload),
                ..Default::default()
            },
            fragment_total: None,
            duration: 4.0,
        }
    }

    #[test]
    fn kbps_from_load_timing() {
        // 250_000 bytes over 500ms = 4000 kbps
        assert_eq!(throughput_kbps(&timed(250_000, 1000.0, 1500.0)), Some(4000.0));
    }

    #[test]
    fn tfirst_preferred_over_trequest() {
        let mut load = timed(100_000, 1000.0, 1400.0);
        load.stats.tfirst = Some(1200.0);
        // 800_000 bits over 200ms
        assert_eq!(throughput_kbps(&load), Some(4000.0));
    }

    #[test]
    fn falls_back_to_nominal_duration() {
        let mut load = timed(500_000, 2000.0, 2000.0);
        load.duration = 2.0;
        // 4_000_000 bits over 2000ms
        assert_eq!(throughput_kbps(&load), Some(2000.0));

        let load = FragmentLoad {
            stats: FragmentStats {
                loaded: Some(500_000),
                ..Default::default()
            },
            fragment_total: None,
            duration: 2.0,
        };
        assert_eq!(throughput_kbps(&load), Some(2000.0));
    }

    #[test]
    fn byte_count_priority() {
        let load = FragmentLoad {
            stats: FragmentStats {
                length: Some(10),
                loaded: Some(20),
                ..Default::default()
            },
            fragment_total: Some(30),
            duration: 1.0,
        };
        assert_eq!(byte_count(&load), 10);

        let load = FragmentLoad {
            fragment_total: Some(30),
            duration: 1.0,
            ..Default::default()
        };
        assert_eq!(byte_count(&load), 30);

        // A reported zero total is not skipped over
        let load = FragmentLoad {
            stats: FragmentStats {
                total: Some(0),
                loaded: Some(20),
                ..Default::default()
            },
            fragment_total: None,
            duration: 1.0,
        };
        assert_eq!(byte_count(&load), 0);
    }

    #[test]
    fn zero_bytes_or_duration_dropped() {
        let mut sampler = BandwidthSampler::default();
        sampler.record(&timed(1000, 0.0, 100.0), 1);
        let before: Vec<_> = sampler.iter().copied().collect();

        assert_eq!(sampler.record(&timed(0, 1000.0, 1500.0), 2), None);

        let mut no_duration = timed(1000, 1000.0, 1000.0);
        no_duration.duration = 0.0;
        assert_eq!(sampler.record(&no_duration, 3), None);

        let mut negative = timed(1000, 1500.0, 1000.0);
        negative.duration = -1.0;
        assert_eq!(sampler.record(&negative, 4), None);

        let after: Vec<_> = sampler.iter().copied().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn non_finite_duration_dropped() {
        let mut sampler = BandwidthSampler::default();

        for duration in [f64::INFINITY, f64::NAN, f64::NEG_INFINITY] {
            let load = FragmentLoad {
                stats: FragmentStats {
                    total: Some(188_000),
                    ..Default::default()
                },
                fragment_total: None,
                duration,
            };
            assert_eq!(throughput_kbps(&load), None);
            assert_eq!(sampler.record(&load, 1), None);
        }

        let mut infinite_timing = timed(188_000, 10.0, f64::INFINITY);
        infinite_timing.duration = f64::INFINITY;
        assert_eq!(sampler.record(&infinite_timing, 2), None);
        assert!(sampler.is_empty());
    }

    #[test]
    fn buffer_keeps_last_hundred_in_arrival_order() {
        let mut sampler = BandwidthSampler::default();
        for i in 0..150 {
            let sample = sampler.record(&timed(1000 + i, 0.0, 1.0), i as i64);
            assert!(sample.is_some());
            assert_eq!(sampler.len(), (i as usize + 1).min(SAMPLE_CAPACITY));
        }

        let times: Vec<i64> = sampler.as_slice().iter().map(|s| s.time).collect();
        let expected: Vec<i64> = (50..150).collect();
        assert_eq!(times, expected);
    }

    #[test]
    fn clear_empties_buffer() {
        let mut sampler = BandwidthSampler::new(4);
        sampler.record(&timed(1000, 0.0, 10.0), 1);
        assert!(!sampler.is_empty());
        sampler.clear();
        assert!(sampler.is_empty());
        assert_eq!(sampler.summary().sample_count, 0);
    }
}
