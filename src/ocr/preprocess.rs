use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage, ImageFormat, Rgb, RgbImage};
use rayon::prelude::*;
use std::io::Cursor;

/// Background colour of achievement rows, used to pad title captures.
pub const TITLE_BORDER_FILL: Rgb<u8> = Rgb([0xf0, 0xe9, 0xdc]);
/// Padding added around title captures.
pub const TITLE_BORDER: u32 = 20;

const WHITE: [u8; 3] = [255, 255, 255];

/// How a capture is cleaned before it goes to OCR.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapturePolicy {
    /// Achievement title: padded, masked against dark text, grayscale.
    Title,
    /// Achievement status ("Completed", progress, date)
    Status,
    /// Category label
    Category,
}

impl CapturePolicy {
    /// Text colour and distance threshold used by the colour mask.
    pub fn mask(&self) -> ([u8; 3], u32) {
        match self {
            Self::Title => ([85, 85, 85], 50),
            Self::Status => ([187, 167, 145], 50),
            Self::Category => ([73, 83, 102], 100),
        }
    }
}

/// Keeps pixels close to the text colour and paints everything else white.
///
/// A pixel is kept when the squared Euclidean distance between its RGB value
/// and `target` is at most `threshold²`. Every output pixel is therefore
/// either pure white or exactly the input pixel.
pub fn color_mask(img: &RgbImage, target: [u8; 3], threshold: u32) -> RgbImage {
    let (width, height) = img.dimensions();
    let limit = threshold * threshold;
    let mut buf = img.as_raw().clone();

    buf.par_chunks_exact_mut(3).for_each(|px| {
        let distance: u32 = px
            .iter()
            .zip(target.iter())
            .map(|(&a, &b)| {
                let d = a as i32 - b as i32;
                (d * d) as u32
            })
            .sum();
        if distance > limit {
            px.copy_from_slice(&WHITE);
        }
    });

    // Buffer length is unchanged, so this cannot fail
    RgbImage::from_raw(width, height, buf).unwrap_or_else(|| img.clone())
}

/// Pads the image with a solid border on every side.
pub fn add_border(img: &RgbImage, border: u32, fill: Rgb<u8>) -> RgbImage {
    let (width, height) = img.dimensions();
    let mut out = RgbImage::from_pixel(width + border * 2, height + border * 2, fill);
    image::imageops::replace(&mut out, img, border as i64, border as i64);
    out
}

fn to_gray(img: &RgbImage) -> GrayImage {
    image::imageops::grayscale(img)
}

/// Applies a capture policy. With `disabled` the raw capture is returned.
pub fn prepare(img: RgbImage, policy: CapturePolicy, disabled: bool) -> DynamicImage {
    if disabled {
        return DynamicImage::ImageRgb8(img);
    }

    let (target, threshold) = policy.mask();
    let masked = match policy {
        CapturePolicy::Title => {
            let padded = add_border(&img, TITLE_BORDER, TITLE_BORDER_FILL);
            color_mask(&padded, target, threshold)
        }
        CapturePolicy::Status | CapturePolicy::Category => color_mask(&img, target, threshold),
    };

    DynamicImage::ImageLuma8(to_gray(&masked))
}

/// Encodes an image as PNG bytes for the OCR engine.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("Failed to encode capture as PNG")?;
    Ok(bytes)
}
