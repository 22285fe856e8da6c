/*!
    Minimal HLS playlist parsing.

    Only what a probe needs: variant attributes from a master playlist and
    segment durations from a media playlist. Everything else is skipped.
*/

use reqwest::Url;

use crate::error::PlaylistError;
use crate::session::Level;

const HEADER: &str = "#EXTM3U";
const STREAM_INF: &str = "#EXT-X-STREAM-INF:";
const EXTINF: &str = "#EXTINF:";

/// A variant stream listed in a master playlist.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    pub uri: Url,
    pub level: Level,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub uri: Url,
    /// Nominal duration in seconds.
    pub duration: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaPlaylist {
    pub segments: Vec<Segment>,
}

impl MediaPlaylist {
    pub fn total_duration(&self) -> f64 {
        self.segments.iter().map(|s| s.duration).sum()
    }
}

/**
    Parse a master playlist into its variants, in playlist order.

    A media playlist is accepted as well and becomes a single variant at
    `base` with no attributes.
*/
pub fn parse_master(text: &str, base: &Url) -> Result<Vec<Variant>, PlaylistError> {
    let lines = body_lines(text)?;

    let mut variants = Vec::new();
    let mut pending: Option<Level> = None;
    let mut has_segments = false;

    for line in lines {
        if let Some(attrs) = line.strip_prefix(STREAM_INF) {
            pending = Some(level_from_attributes(attrs));
            continue;
        }
        if line.starts_with(EXTINF) {
            has_segments = true;
            continue;
        }
        if line.starts_with('#') {
            continue;
        }
        if let Some(level) = pending.take() {
            variants.push(Variant {
                uri: resolve(base, line)?,
                level,
            });
        }
    }

    if variants.is_empty() {
        if !has_segments {
            return Err(PlaylistError::Empty);
        }
        variants.push(Variant {
            uri: base.clone(),
            level: Level::default(),
        });
    }

    Ok(variants)
}

/**
    Parse a media playlist's segments.
*/
pub fn parse_media(text: &str, base: &Url) -> Result<MediaPlaylist, PlaylistError> {
    let lines = body_lines(text)?;

    let mut segments = Vec::new();
    let mut pending: Option<f64> = None;

    for line in lines {
        if let Some(info) = line.strip_prefix(EXTINF) {
            let duration = info.split(',').next().unwrap_or("").trim();
            pending = Some(segment_duration(duration));
            continue;
        }
        if line.starts_with('#') {
            continue;
        }
        if let Some(duration) = pending.take() {
            segments.push(Segment {
                uri: resolve(base, line)?,
                duration,
            });
        }
    }

    Ok(MediaPlaylist { segments })
}

/**
    Split an attribute list into key/value pairs. Quoted values may contain
    commas; the quotes are removed.
*/
pub fn parse_attributes(list: &str) -> Vec<(&str, &str)> {
    let mut attributes = Vec::new();
    let mut rest = list.trim();

    while !rest.is_empty() {
        let Some((key, after)) = rest.split_once('=') else {
            break;
        };

        let (value, remaining) = if let Some(quoted) = after.strip_prefix('"') {
            match quoted.find('"') {
                Some(end) => {
                    let remaining = quoted[end + 1..].trim_start_matches(',');
                    (&quoted[..end], remaining)
                }
                None => (quoted, ""),
            }
        } else {
            match after.find(',') {
                Some(end) => (&after[..end], &after[end + 1..]),
                None => (after, ""),
            }
        };

        attributes.push((key.trim(), value.trim()));
        rest = remaining.trim_start();
    }

    attributes
}

/// `#EXTINF` duration in seconds; anything unusable counts as 0.
fn segment_duration(value: &str) -> f64 {
    match value.parse::<f64>() {
        Ok(secs) if secs.is_finite() && secs > 0.0 => secs,
        _ => 0.0,
    }
}

fn level_from_attributes(attrs: &str) -> Level {
    let mut level = Level::default();
    for (key, value) in parse_attributes(attrs) {
        match key {
            "BANDWIDTH" => level.bitrate = value.parse().ok(),
            "RESOLUTION" => {
                if let Some((w, h)) = value.split_once(['x', 'X'])
                    && let (Ok(w), Ok(h)) = (w.parse(), h.parse())
                {
                    level.width = Some(w);
                    level.height = Some(h);
                }
            }
            "CODECS" if !value.is_empty() => level.codecs = Some(value.to_string()),
            _ => {}
        }
    }
    level
}

/// Trimmed, non-empty lines after the header.
fn body_lines(text: &str) -> Result<impl Iterator<Item = &str>, PlaylistError> {
    let mut lines = text
        .lines()
        .map(|l| l.trim().trim_start_matches('\u{feff}'))
        .filter(|l| !l.is_empty());

    match lines.next() {
        Some(first) if first.starts_with(HEADER) => Ok(lines),
        _ => Err(PlaylistError::MissingHeader),
    }
}

fn resolve(base: &Url, uri: &str) -> Result<Url, PlaylistError> {
    base.join(uri).map_err(|e| PlaylistError::InvalidUri {
        uri: uri.to_string(),
        reason: e.to_string(),
    })
}
