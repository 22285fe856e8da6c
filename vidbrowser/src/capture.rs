/*!
    Still frame capture.

    Renders the surface's current frame at its native decoded size, encodes it
    as JPEG and wraps the result in a `data:` URI so the record is
    self-contained.
*/

use base64::{Engine, engine::general_purpose::STANDARD};
use image::{DynamicImage, RgbaImage, codecs::jpeg::JpegEncoder, imageops};
use stream_types::{DEFAULT_SOURCE_TITLE, FrameInfo};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::CaptureError;
use crate::session::{ReadyState, VideoSurface};
use crate::util::time;

/// JPEG quality for captured frames (0-100).
pub const JPEG_QUALITY: u8 = 80;

/// Encoded payloads shorter than this are treated as a failed capture.
pub const MIN_ENCODED_LEN: usize = 100;

/// What a browser-style canvas returns for an image it could not encode.
const EMPTY_IMAGE: &str = "data:,";

/**
    Capture the current frame, logging the reason when nothing is produced.
*/
pub fn capture_frame(
    surface: Option<&dyn VideoSurface>,
    source_url: &str,
    source_title: Option<&str>,
) -> Option<FrameInfo> {
    match try_capture(surface, source_url, source_title) {
        Ok(frame) => {
            debug!(id = %frame.id, at = frame.current_time, "captured frame");
            Some(frame)
        }
        Err(e) => {
            warn!("frame capture failed: {}", e);
            None
        }
    }
}

/**
    Capture the current frame, reporting which step failed.
*/
pub fn try_capture(
    surface: Option<&dyn VideoSurface>,
    source_url: &str,
    source_title: Option<&str>,
) -> Result<FrameInfo, CaptureError> {
    let surface = surface.ok_or(CaptureError::NoSurface)?;

    let ready_state = surface.ready_state();
    if ready_state < ReadyState::HaveCurrentData {
        return Err(CaptureError::NotReady(ready_state));
    }

    let width = surface.video_width();
    let height = surface.video_height();
    if width == 0 || height == 0 {
        return Err(CaptureError::ZeroDimensions { width, height });
    }

    let raster = surface.snapshot().ok_or(CaptureError::NoFrame)?;
    let image_data = encode_data_uri(raster, width, height)?;

    let timestamp = time::now_millis();
    Ok(FrameInfo {
        id: frame_id(timestamp),
        timestamp,
        current_time: surface.current_time(),
        width,
        height,
        image_data,
        source_url: source_url.to_string(),
        source_title: source_title.unwrap_or(DEFAULT_SOURCE_TITLE).to_string(),
    })
}

/**
    Encode a raster as a JPEG `data:` URI at the given size.

    The raster is scaled when its size differs from the target.
*/
pub fn encode_data_uri(raster: RgbaImage, width: u32, height: u32) -> Result<String, CaptureError> {
    let raster = if raster.dimensions() == (width, height) {
        raster
    } else {
        imageops::resize(&raster, width, height, imageops::FilterType::Triangle)
    };

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgba8(raster).to_rgb8();

    let mut jpeg_bytes: Vec<u8> = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut jpeg_bytes, JPEG_QUALITY);
    encoder
        .encode_image(&rgb)
        .map_err(|e| CaptureError::Encode(e.to_string()))?;

    let data_uri = if jpeg_bytes.is_empty() {
        EMPTY_IMAGE.to_string()
    } else {
        format!("data:image/jpeg;base64,{}", STANDARD.encode(&jpeg_bytes))
    };

    check_payload(&data_uri)?;
    Ok(data_uri)
}

fn check_payload(data_uri: &str) -> Result<(), CaptureError> {
    if data_uri == EMPTY_IMAGE || data_uri.len() < MIN_ENCODED_LEN {
        return Err(CaptureError::Degenerate(data_uri.len()));
    }
    Ok(())
}

fn frame_id(timestamp: i64) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("frame-{}-{}", timestamp, &suffix[..9])
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::error::PlayRejected;
    use crate::session::EventSender;

    struct StillSurface {
        ready_state: ReadyState,
        width: u32,
        height: u32,
        position: f64,
        raster: Option<RgbaImage>,
    }

    impl StillSurface {
        fn playing(width: u32, height: u32) -> Self {
            Self {
                ready_state: ReadyState::HaveEnoughData,
                width,
                height,
                position: 12.5,
                raster: Some(RgbaImage::from_pixel(width, height, Rgba([20, 120, 200, 255]))),
            }
        }
    }

    impl VideoSurface for StillSurface {
        fn load(&mut self, _url: &str, _events: EventSender) {}
        fn unload(&mut self) {}
        fn play(&mut self) -> Result<(), PlayRejected> {
            Ok(())
        }
        fn ready_state(&self) -> ReadyState {
            self.ready_state
        }
        fn video_width(&self) -> u32 {
            self.width
        }
        fn video_height(&self) -> u32 {
            self.height
        }
        fn current_time(&self) -> f64 {
            self.position
        }
        fn duration(&self) -> f64 {
            60.0
        }
        fn snapshot(&self) -> Option<RgbaImage> {
            self.raster.clone()
        }
    }

    #[test]
    fn captures_tagged_jpeg_frame() {
        let surface = StillSurface::playing(32, 18);
        let frame = try_capture(Some(&surface), "https://cdn/a/master.m3u8", Some("Show A")).unwrap();

        assert!(frame.id.starts_with("frame-"));
        assert!(frame.image_data.starts_with("data:image/jpeg;base64,"));
        assert!(frame.image_data.len() >= MIN_ENCODED_LEN);
        assert_eq!((frame.width, frame.height), (32, 18));
        assert_eq!(frame.current_time, 12.5);
        assert_eq!(frame.source_url, "https://cdn/a/master.m3u8");
        assert_eq!(frame.source_title, "Show A");
    }

    #[test]
    fn ids_are_unique() {
        let surface = StillSurface::playing(8, 8);
        let a = try_capture(Some(&surface), "u", None).unwrap();
        let b = try_capture(Some(&surface), "u", None).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.source_title, DEFAULT_SOURCE_TITLE);
    }

    #[test]
    fn missing_surface() {
        assert_eq!(try_capture(None, "u", None), Err(CaptureError::NoSurface));
        assert!(capture_frame(None, "u", None).is_none());
    }

    #[test]
    fn surface_not_ready() {
        let mut surface = StillSurface::playing(8, 8);
        surface.ready_state = ReadyState::HaveMetadata;
        assert_eq!(
            try_capture(Some(&surface), "u", None),
            Err(CaptureError::NotReady(ReadyState::HaveMetadata))
        );
    }

    #[test]
    fn zero_width_surface() {
        let mut surface = StillSurface::playing(8, 8);
        surface.width = 0;
        assert_eq!(
            try_capture(Some(&surface), "u", None),
            Err(CaptureError::ZeroDimensions { width: 0, height: 8 })
        );
    }

    #[test]
    fn restricted_surface_yields_nothing() {
        let mut surface = StillSurface::playing(8, 8);
        surface.raster = None;
        assert_eq!(try_capture(Some(&surface), "u", None), Err(CaptureError::NoFrame));
    }

    #[test]
    fn raster_scaled_to_decoded_size() {
        let mut surface = StillSurface::playing(40, 20);
        surface.raster = Some(RgbaImage::from_pixel(10, 5, Rgba([0, 0, 0, 255])));
        let frame = try_capture(Some(&surface), "u", None).unwrap();

        let encoded = frame.image_data.trim_start_matches("data:image/jpeg;base64,");
        let bytes = STANDARD.decode(encoded).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 20));
    }

    #[test]
    fn degenerate_payloads_rejected() {
        assert_eq!(check_payload("data:,"), Err(CaptureError::Degenerate(6)));
        assert_eq!(
            check_payload("data:image/jpeg;base64,AAAA"),
            Err(CaptureError::Degenerate(27))
        );
        assert!(check_payload(&format!("data:image/jpeg;base64,{}", "A".repeat(100))).is_ok());
    }
}
