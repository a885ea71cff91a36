//! Pads portrait photos out to a landscape canvas.
//!
//! The staged images are shown in a 10:7 frame, so a portrait photo is centred
//! on a white canvas `height / 0.7` wide rather than being cropped or rotated.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageReader, Rgb, RgbImage, imageops};
use tracing::debug;

use crate::constants::LANDSCAPE_RATIO;
use crate::error::StageError;

/// Quality used when a padded image has to be re-encoded.
const JPEG_QUALITY: u8 = 90;

/// Background colour for the padding.
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Image bytes ready to be written out.
#[derive(Debug)]
pub struct PreparedImage {
    /// JPEG bytes
    pub bytes: Vec<u8>,
    /// Final width
    pub width: u32,
    /// Final height
    pub height: u32,
    /// Whether the image was padded (and so re-encoded)
    pub reoriented: bool,
}

/// Portrait and square images get padded, anything wider than tall is left alone.
pub fn needs_reorientation(width: u32, height: u32) -> bool {
    height >= width
}

/// Canvas size for an image of the given height.
pub fn landscape_canvas(height: u32) -> (u32, u32) {
    let width = (f64::from(height) / LANDSCAPE_RATIO).round() as u32;
    (width, height)
}

/// Centres `image` on a white landscape canvas.
///
/// Callers check [`needs_reorientation`] first, this doesn't.
pub fn reorient(image: &DynamicImage) -> RgbImage {
    let (width, height) = (image.width(), image.height());
    let (canvas_width, canvas_height) = landscape_canvas(height);
    let mut canvas = RgbImage::from_pixel(canvas_width, canvas_height, WHITE);

    let offset_x = canvas_width.saturating_sub(width) / 2;
    let offset_y = canvas_height.saturating_sub(height) / 2;
    imageops::overlay(
        &mut canvas,
        &image.to_rgb8(),
        i64::from(offset_x),
        i64::from(offset_y),
    );
    canvas
}

/// Decodes downloaded bytes and pads them if they're portrait.
///
/// Landscape images come back byte-for-byte, so they're never recompressed.
pub fn prepare_image(bytes: &[u8]) -> Result<PreparedImage, StageError> {
    let image = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;
    let (width, height) = (image.width(), image.height());

    if !needs_reorientation(width, height) {
        debug!("{}x{} is landscape, keeping original bytes", width, height);
        return Ok(PreparedImage {
            bytes: bytes.to_vec(),
            width,
            height,
            reoriented: false,
        });
    }

    let canvas = reorient(&image);
    debug!(
        "Padded {}x{} to {}x{}",
        width,
        height,
        canvas.width(),
        canvas.height()
    );
    let mut output = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut output, JPEG_QUALITY);
    encoder.encode_image(&canvas)?;
    Ok(PreparedImage {
        bytes: output,
        width: canvas.width(),
        height: canvas.height(),
        reoriented: true,
    })
}
