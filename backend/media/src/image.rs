//! Image normalization ahead of the vision call.
//!
//! Uploads are decoded, shrunk to fit inside `MAX_DIMENSION` on both sides
//! (aspect ratio preserved, never enlarged) and flattened to 8-bit RGB, then
//! re-encoded as JPEG for transmission.

use std::io::Cursor;

use bytes::Bytes;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView, ImageFormat};
use tracing::debug;

use sightmate_core::{ImagePayload, SightError};

/// Upper bound for either side of an image sent upstream.
pub const MAX_DIMENSION: u32 = 1024;

/// MIME type of every encoded payload.
pub const PAYLOAD_MIME: &str = "image/jpeg";

/// Decode raw upload bytes and bring them within transmission bounds.
pub fn normalize(bytes: &[u8]) -> Result<DynamicImage, SightError> {
    let image = image::load_from_memory(bytes).map_err(SightError::invalid_image)?;

    let (width, height) = image.dimensions();
    let image = if width > MAX_DIMENSION || height > MAX_DIMENSION {
        let resized = image.resize(MAX_DIMENSION, MAX_DIMENSION, FilterType::Lanczos3);
        debug!(
            from = %format!("{width}x{height}"),
            to = %format!("{}x{}", resized.width(), resized.height()),
            "Downscaled oversized image"
        );
        resized
    } else {
        image
    };

    Ok(match image {
        DynamicImage::ImageRgb8(_) => image,
        other => DynamicImage::ImageRgb8(other.to_rgb8()),
    })
}

/// Encode a normalized image into the payload handed to providers.
pub fn encode_payload(image: &DynamicImage) -> Result<ImagePayload, SightError> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Jpeg)
        .map_err(SightError::invalid_image)?;

    let (width, height) = image.dimensions();
    Ok(ImagePayload {
        mime_type: PAYLOAD_MIME.to_string(),
        data: Bytes::from(buf),
        width,
        height,
    })
}

/// Normalize and encode in one step.
pub fn prepare(bytes: &[u8]) -> Result<ImagePayload, SightError> {
    let image = normalize(bytes)?;
    encode_payload(&image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbaImage};

    fn png_bytes(image: DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    fn rgba(width: u32, height: u32) -> Vec<u8> {
        png_bytes(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([30, 120, 200, 128]),
        )))
    }

    #[test]
    fn test_wide_image_is_bounded() {
        let image = normalize(&rgba(2048, 1536)).unwrap();
        assert_eq!(image.dimensions(), (1024, 768));
        assert!(matches!(image, DynamicImage::ImageRgb8(_)));
    }

    #[test]
    fn test_tall_image_keeps_aspect_ratio() {
        let image = normalize(&rgba(400, 2400)).unwrap();
        let (width, height) = image.dimensions();

        assert_eq!(height, MAX_DIMENSION);
        // 400 / 2400 * 1024 = 170.67
        assert!((170..=171).contains(&width), "width was {width}");
    }

    #[test]
    fn test_small_image_is_not_upscaled() {
        let image = normalize(&rgba(300, 200)).unwrap();
        assert_eq!(image.dimensions(), (300, 200));
    }

    #[test]
    fn test_image_at_bound_is_untouched() {
        let image = normalize(&rgba(1024, 1024)).unwrap();
        assert_eq!(image.dimensions(), (1024, 1024));
    }

    #[test]
    fn test_grayscale_becomes_rgb() {
        let gray = png_bytes(DynamicImage::ImageLuma8(GrayImage::from_pixel(
            64,
            32,
            image::Luma([90]),
        )));
        let image = normalize(&gray).unwrap();

        let DynamicImage::ImageRgb8(rgb) = image else {
            panic!("expected an RGB8 image");
        };
        assert_eq!(rgb.get_pixel(0, 0).0, [90, 90, 90]);
    }

    #[test]
    fn test_undecodable_bytes_are_rejected() {
        let err = normalize(b"definitely not an image").unwrap_err();
        assert!(matches!(err, SightError::InvalidImage(_)));
    }

    #[test]
    fn test_prepare_emits_jpeg_payload() {
        let payload = prepare(&rgba(1600, 800)).unwrap();

        assert_eq!(payload.mime_type, "image/jpeg");
        assert_eq!((payload.width, payload.height), (1024, 512));
        assert_eq!(&payload.data[..2], &[0xFF, 0xD8]);
    }
}
