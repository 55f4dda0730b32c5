//! # Photo Normalizer
//!
//! Transforms an arbitrary-resolution, arbitrary-format photo into a
//! size-bounded JPEG suitable for inclusion in an inference request,
//! preserving aspect ratio and enough legibility for the model to read the
//! printed nutrition-label text.
//!
//! The pipeline per photo: decode → fit plan (width bound, never upscale) →
//! SIMD resample → JPEG re-encode at the configured quality. Output media
//! type is always `image/jpeg` regardless of input format, and the result is
//! deterministic for a fixed input and config (modulo encoder float
//! nondeterminism).
//!
//! Batches run each photo on the blocking thread pool concurrently and join
//! with a gather barrier: a single failure aborts the whole batch with that
//! photo's specific error, because a partial submission (say, the package
//! front without the nutrition table) would skew the model's multi-image
//! read.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures_util::future::try_join_all;
use image::codecs::jpeg::JpegEncoder;
use image::{GenericImageView, RgbImage};
use snap_prep::plan::{build_plan, Size};
use snap_prep::resample::resample_rgb;

use crate::config::NormalizeConfig;
use crate::error::{SnapError, SnapResult};

/// An unprocessed image exactly as the user selected it: opaque bytes plus
/// the media type declared at the selection boundary. The declared type is
/// informational; decoding sniffs the real format from the bytes.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl RawImage {
    pub fn new(bytes: Vec<u8>, mime: impl Into<String>) -> Self {
        Self {
            bytes,
            mime: mime.into(),
        }
    }
}

/// A normalized photo: width-bounded JPEG bytes, immutable once produced.
#[derive(Debug, Clone)]
pub struct NormalizedImage {
    width: u32,
    height: u32,
    bytes: Vec<u8>,
}

impl NormalizedImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The encoded JPEG bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Always `image/jpeg`, whatever the input format was.
    pub fn media_type(&self) -> &'static str {
        "image/jpeg"
    }

    /// Base64 of the JPEG bytes, the wire payload for inline image parts.
    pub fn base64_payload(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// Data-URI transport encoding of the payload.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.media_type(), self.base64_payload())
    }
}

/// Normalize one photo.
///
/// Pure CPU transform: no I/O, no mutation of the input beyond consuming it.
/// Fails with a decode error when the bytes are not a decodable image and
/// with an encode error when the fit plan degenerates to a zero dimension or
/// JPEG encoding fails.
pub fn normalize(raw: RawImage, config: &NormalizeConfig) -> SnapResult<NormalizedImage> {
    config.validate()?;

    // TODO: honor EXIF orientation before planning; phone cameras routinely
    // store rotated sensor data, and the decoder does not auto-rotate.
    let decoded = image::load_from_memory(&raw.bytes).map_err(|e| {
        SnapError::decode(format!("{} (declared media type: {})", e, raw.mime))
    })?;

    let (w, h) = decoded.dimensions();
    let plan = build_plan(Size { w, h }, config.max_width);
    if plan.is_degenerate() {
        return Err(SnapError::encode(format!(
            "{}x{} would resample to a zero dimension at max width {}",
            w, h, config.max_width
        )));
    }

    let rgb = decoded.to_rgb8();
    let resampled = if plan.is_identity() {
        rgb
    } else {
        let mut dst = vec![0u8; (plan.out.w as usize) * (plan.out.h as usize) * 3];
        let mut resizer = fast_image_resize::Resizer::new();
        resample_rgb(&mut resizer, rgb.as_raw(), plan.input, &plan, &mut dst)
            .map_err(|e| SnapError::encode(e.to_string()))?;
        RgbImage::from_raw(plan.out.w, plan.out.h, dst)
            .ok_or_else(|| SnapError::encode("resampled buffer length mismatch"))?
    };

    let quality = (config.quality * 100.0).round().clamp(1.0, 100.0) as u8;
    let mut encoded = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut encoded, quality);
    resampled
        .write_with_encoder(encoder)
        .map_err(|e| SnapError::encode(e.to_string()))?;

    log::debug!(
        "normalized {}x{} -> {}x{} jpeg q{} ({} bytes)",
        w,
        h,
        plan.out.w,
        plan.out.h,
        quality,
        encoded.len()
    );

    Ok(NormalizedImage {
        width: plan.out.w,
        height: plan.out.h,
        bytes: encoded,
    })
}

/// Normalize a batch of photos concurrently.
///
/// Each photo is an independent, CPU-bound transform, so they are dispatched
/// to the blocking thread pool and gathered with a join barrier. Output
/// order equals input order. The first failure aborts the batch with that
/// photo's error and zero outputs; no partial result ever reaches the
/// network call.
pub async fn normalize_batch(
    raws: Vec<RawImage>,
    config: &NormalizeConfig,
) -> SnapResult<Vec<NormalizedImage>> {
    if raws.is_empty() {
        return Err(SnapError::NoImages);
    }
    config.validate()?;

    let tasks: Vec<_> = raws
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            let config = config.clone();
            let handle = tokio::task::spawn_blocking(move || normalize(raw, &config));
            async move {
                match handle.await {
                    Ok(Ok(normalized)) => Ok(normalized),
                    Ok(Err(err)) => {
                        log::warn!("photo {} failed to normalize: {}", index + 1, err);
                        Err(err)
                    }
                    Err(join) => Err(SnapError::encode(format!(
                        "normalize worker for photo {} did not finish: {}",
                        index + 1,
                        join
                    ))),
                }
            }
        })
        .collect();

    try_join_all(tasks).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let mut img = RgbImage::new(w, h);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            pixel.0 = [
                ((x as f32 / w as f32) * 255.0) as u8,
                ((y as f32 / h as f32) * 255.0) as u8,
                128,
            ];
        }
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn wide_photo_shrinks_to_bound() {
        let raw = RawImage::new(png_bytes(2000, 1000), "image/png");
        let normalized = normalize(raw, &NormalizeConfig::default()).unwrap();
        assert_eq!(normalized.width(), 1200);
        assert_eq!(normalized.height(), 600);
        // JPEG SOI marker, whatever the input format was.
        assert_eq!(&normalized.as_bytes()[..2], &[0xFF, 0xD8]);
        assert_eq!(normalized.media_type(), "image/jpeg");
    }

    #[test]
    fn narrow_photo_keeps_dimensions() {
        let raw = RawImage::new(png_bytes(640, 480), "image/png");
        let normalized = normalize(raw, &NormalizeConfig::default()).unwrap();
        assert_eq!((normalized.width(), normalized.height()), (640, 480));
    }

    #[test]
    fn normalize_is_idempotent_on_its_own_output() {
        let raw = RawImage::new(png_bytes(2000, 1000), "image/png");
        let config = NormalizeConfig::default();
        let first = normalize(raw, &config).unwrap();
        let again = normalize(
            RawImage::new(first.as_bytes().to_vec(), first.media_type()),
            &config,
        )
        .unwrap();
        assert_eq!((again.width(), again.height()), (first.width(), first.height()));
    }

    #[test]
    fn garbage_bytes_fail_with_decode_error() {
        let raw = RawImage::new(vec![0x00, 0x01, 0x02, 0x03], "image/png");
        let err = normalize(raw, &NormalizeConfig::default()).unwrap_err();
        assert_eq!(err.category(), "decode");

        let raw = RawImage::new(Vec::new(), "image/png");
        let err = normalize(raw, &NormalizeConfig::default()).unwrap_err();
        assert_eq!(err.category(), "decode");
    }

    #[test]
    fn data_uri_has_jpeg_prefix() {
        let raw = RawImage::new(png_bytes(64, 64), "image/png");
        let normalized = normalize(raw, &NormalizeConfig::default()).unwrap();
        assert!(normalized.data_uri().starts_with("data:image/jpeg;base64,"));
    }

    #[tokio::test]
    async fn batch_preserves_input_order() {
        let raws = vec![
            RawImage::new(png_bytes(2000, 1000), "image/png"),
            RawImage::new(png_bytes(300, 500), "image/png"),
            RawImage::new(png_bytes(1300, 1300), "image/png"),
        ];
        let outputs = normalize_batch(raws, &NormalizeConfig::default())
            .await
            .unwrap();
        assert_eq!(outputs.len(), 3);
        assert_eq!((outputs[0].width(), outputs[0].height()), (1200, 600));
        assert_eq!((outputs[1].width(), outputs[1].height()), (300, 500));
        assert_eq!((outputs[2].width(), outputs[2].height()), (1200, 1200));
    }

    #[tokio::test]
    async fn one_bad_photo_aborts_the_whole_batch() {
        let raws = vec![
            RawImage::new(png_bytes(800, 600), "image/png"),
            RawImage::new(vec![0xde, 0xad, 0xbe, 0xef], "image/png"),
            RawImage::new(png_bytes(800, 600), "image/png"),
        ];
        let err = normalize_batch(raws, &NormalizeConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.category(), "decode");
    }

    #[tokio::test]
    async fn empty_batch_is_rejected() {
        let err = normalize_batch(Vec::new(), &NormalizeConfig::default())
            .await
            .unwrap_err();
        assert_eq!(err.category(), "no_images");
    }
}
