//! Integration tests for the photo normalization pipeline.
//!
//! These drive the public API exactly as the driver does: real encoded
//! images in, width-bounded JPEGs out.

use std::io::Cursor;

use image::{GenericImageView, RgbImage};
use nutri_snap::config::NormalizeConfig;
use nutri_snap::normalize::{normalize, normalize_batch, RawImage};

fn encoded_photo(w: u32, h: u32, format: image::ImageFormat) -> Vec<u8> {
    let mut img = RgbImage::new(w, h);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        pixel.0 = [(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8];
    }
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut bytes), format)
        .unwrap();
    bytes
}

#[test]
fn reference_case_2000x1000_at_1200() {
    let raw = RawImage::new(encoded_photo(2000, 1000, image::ImageFormat::Png), "image/png");
    let normalized = normalize(raw, &NormalizeConfig::default()).unwrap();
    assert_eq!((normalized.width(), normalized.height()), (1200, 600));

    // The emitted bytes really are a JPEG of those dimensions.
    let reread = image::load_from_memory(normalized.as_bytes()).unwrap();
    assert_eq!(reread.dimensions(), (1200, 600));
    assert_eq!(
        image::guess_format(normalized.as_bytes()).unwrap(),
        image::ImageFormat::Jpeg
    );
}

#[test]
fn jpeg_input_is_handled_like_png() {
    let raw = RawImage::new(
        encoded_photo(1600, 1200, image::ImageFormat::Jpeg),
        "image/jpeg",
    );
    let normalized = normalize(raw, &NormalizeConfig::default()).unwrap();
    assert_eq!((normalized.width(), normalized.height()), (1200, 900));
}

#[test]
fn no_upscaling_below_the_bound() {
    for (w, h) in [(100, 100), (1199, 2400), (1200, 50)] {
        let raw = RawImage::new(encoded_photo(w, h, image::ImageFormat::Png), "image/png");
        let normalized = normalize(raw, &NormalizeConfig::default()).unwrap();
        assert_eq!((normalized.width(), normalized.height()), (w, h));
    }
}

#[test]
fn custom_width_bound_is_honored() {
    let config = NormalizeConfig {
        max_width: 640,
        quality: 0.6,
    };
    let raw = RawImage::new(encoded_photo(1920, 1080, image::ImageFormat::Png), "image/png");
    let normalized = normalize(raw, &config).unwrap();
    assert_eq!((normalized.width(), normalized.height()), (640, 360));
}

#[test]
fn invalid_quality_is_a_config_error() {
    let config = NormalizeConfig {
        max_width: 1200,
        quality: 0.0,
    };
    let raw = RawImage::new(encoded_photo(64, 64, image::ImageFormat::Png), "image/png");
    let err = normalize(raw, &config).unwrap_err();
    assert_eq!(err.category(), "config");
}

#[test]
fn corrupt_bytes_produce_decode_error_and_nothing_else() {
    let raw = RawImage::new(b"definitely not an image".to_vec(), "image/jpeg");
    let err = normalize(raw, &NormalizeConfig::default()).unwrap_err();
    assert_eq!(err.category(), "decode");
}

#[tokio::test]
async fn batch_of_three_keeps_order() {
    let raws = vec![
        RawImage::new(encoded_photo(2000, 1000, image::ImageFormat::Png), "image/png"),
        RawImage::new(encoded_photo(500, 700, image::ImageFormat::Jpeg), "image/jpeg"),
        RawImage::new(encoded_photo(1440, 1440, image::ImageFormat::Png), "image/png"),
    ];
    let outputs = normalize_batch(raws, &NormalizeConfig::default())
        .await
        .unwrap();
    let dims: Vec<_> = outputs.iter().map(|n| (n.width(), n.height())).collect();
    assert_eq!(dims, vec![(1200, 600), (500, 700), (1200, 1200)]);
}

#[tokio::test]
async fn batch_with_one_bad_photo_yields_zero_outputs() {
    let raws = vec![
        RawImage::new(encoded_photo(800, 600, image::ImageFormat::Png), "image/png"),
        RawImage::new(Vec::new(), "image/png"),
        RawImage::new(encoded_photo(800, 600, image::ImageFormat::Png), "image/png"),
    ];
    let err = normalize_batch(raws, &NormalizeConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err.category(), "decode");
}
