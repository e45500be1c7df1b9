//! Video-source seam and still capture.
//!
//! Capture logic never touches device APIs directly; it reads through
//! `VideoFrameSource` so the flow is testable without a camera.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};

use crate::error::{GateError, Result};

/// JPEG quality for captured stills.
const JPEG_QUALITY: u8 = 85;

/// One decoded RGB frame read non-destructively from a live stream.
#[derive(Debug, Clone)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGB8 pixel data, `width * height * 3` bytes.
    pub pixels: Vec<u8>,
}

/// Narrow seam over a live video stream.
///
/// The underlying stream handle is exclusively owned by whoever
/// constructed the source and must be released on every exit path;
/// implementations release the device in `Drop`. Acquisition failures
/// (camera missing, permission denied) surface when the source is
/// constructed, before any capture is attempted.
pub trait VideoFrameSource: Send + Sync {
    /// Decoded dimensions. `(0, 0)` until the stream has produced a
    /// frame.
    fn dimensions(&self) -> (u32, u32);

    /// Read whatever frame is current, without consuming the stream.
    fn current_frame(&self) -> Result<RawFrame>;
}

/// Encode one JPEG still from the source's current frame.
///
/// Fails with a precondition error while the source reports zero
/// dimensions; the caller should wait for the stream to become ready and
/// try again. Deterministic for a given frame, but each call draws
/// whatever frame is current.
pub fn capture_frame(source: &dyn VideoFrameSource) -> Result<Vec<u8>> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(GateError::Precondition(
            "video source not ready: no decoded dimensions yet".to_string(),
        ));
    }

    encode_jpeg(&source.current_frame()?)
}

fn encode_jpeg(frame: &RawFrame) -> Result<Vec<u8>> {
    let image = RgbImage::from_raw(frame.width, frame.height, frame.pixels.clone())
        .ok_or_else(|| GateError::Image("frame buffer does not match its dimensions".to_string()))?;

    let mut buffer = Cursor::new(Vec::new());
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    DynamicImage::ImageRgb8(image)
        .write_with_encoder(encoder)
        .map_err(|e| GateError::Image(format!("JPEG encoding failed: {e}")))?;

    Ok(buffer.into_inner())
}

/// Fixed-frame source for tests and development. Holds no device handle.
pub struct StaticFrameSource {
    frame: Option<RawFrame>,
}

impl StaticFrameSource {
    /// A source that has not decoded any frame yet.
    pub fn not_ready() -> Self {
        Self { frame: None }
    }

    /// A source holding one solid-color frame.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = rgb
            .iter()
            .copied()
            .cycle()
            .take((width * height * 3) as usize)
            .collect();
        Self {
            frame: Some(RawFrame {
                width,
                height,
                pixels,
            }),
        }
    }
}

impl VideoFrameSource for StaticFrameSource {
    fn dimensions(&self) -> (u32, u32) {
        self.frame
            .as_ref()
            .map_or((0, 0), |frame| (frame.width, frame.height))
    }

    fn current_frame(&self) -> Result<RawFrame> {
        self.frame.clone().ok_or_else(|| {
            GateError::Precondition("video source not ready: no decoded frame".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_fails_not_ready_at_zero_dimensions() {
        let source = StaticFrameSource::not_ready();
        let error = capture_frame(&source).unwrap_err();
        assert!(matches!(error, GateError::Precondition(_)));
    }

    #[test]
    fn capture_succeeds_once_dimensions_are_positive() {
        let source = StaticFrameSource::solid(64, 48, [120, 80, 200]);
        let jpeg = capture_frame(&source).unwrap();
        // JPEG SOI marker.
        assert_eq!(&jpeg[..2], &[0xff, 0xd8]);
        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.width(), 64);
        assert_eq!(decoded.height(), 48);
    }

    #[test]
    fn capture_is_deterministic_for_a_given_frame() {
        let source = StaticFrameSource::solid(32, 32, [10, 20, 30]);
        assert_eq!(capture_frame(&source).unwrap(), capture_frame(&source).unwrap());
    }

    #[test]
    fn mismatched_buffer_is_an_image_error() {
        let frame = RawFrame {
            width: 10,
            height: 10,
            pixels: vec![0; 7],
        };
        assert!(matches!(
            encode_jpeg(&frame).unwrap_err(),
            GateError::Image(_)
        ));
    }
}
