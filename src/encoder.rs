//! Image encoding
//!
//! [`PageEncoder`] implementation on the `image` crate codecs.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::engine::PageEncoder;
use crate::error::EngineError;
use crate::types::ImageFormat;

/// JPEG/PNG encoder using `image` 0.25
#[derive(Debug, Clone, Copy, Default)]
pub struct CodecEncoder;

impl CodecEncoder {
    pub fn new() -> Self {
        Self
    }
}

/// Map `[0, 1]` onto the codec's 1..=100 quality scale
fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

impl PageEncoder for CodecEncoder {
    fn encode(
        &self,
        pixels: &[u8],
        width: u32,
        height: u32,
        format: ImageFormat,
        quality: f32,
    ) -> Result<Vec<u8>, EngineError> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(EngineError::new(format!(
                "pixel buffer has {} bytes, expected {} for {}x{} RGBA",
                pixels.len(),
                expected,
                width,
                height
            )));
        }

        let mut output = Vec::new();
        match format {
            ImageFormat::Png => {
                PngEncoder::new(&mut output).write_image(
                    pixels,
                    width,
                    height,
                    ExtendedColorType::Rgba8,
                )?;
            }
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb: Vec<u8> = pixels
                    .chunks_exact(4)
                    .flat_map(|px| [px[0], px[1], px[2]])
                    .collect();
                JpegEncoder::new_with_quality(&mut output, jpeg_quality(quality)).write_image(
                    &rgb,
                    width,
                    height,
                    ExtendedColorType::Rgb8,
                )?;
            }
        }

        Ok(output)
    }
}
