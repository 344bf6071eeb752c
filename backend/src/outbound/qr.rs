//! PNG QR rendering for session tokens.

use std::io::Cursor;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};

use crate::domain::ports::{QrEncoder, QrEncodingError};

/// Side length of the rendered raster in pixels.
pub const QR_IMAGE_SIZE: u32 = 256;

/// Renders payloads with medium error correction as a fixed-size PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngQrEncoder;

impl PngQrEncoder {
    /// Create the encoder.
    pub const fn new() -> Self {
        Self
    }

    fn png_bytes(payload: &str) -> Result<Vec<u8>, QrEncodingError> {
        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
            .map_err(|err| QrEncodingError::symbol(err.to_string()))?;
        let raster = code
            .render::<Luma<u8>>()
            .min_dimensions(QR_IMAGE_SIZE, QR_IMAGE_SIZE)
            .build();
        let scaled = imageops::resize(&raster, QR_IMAGE_SIZE, QR_IMAGE_SIZE, FilterType::Nearest);

        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(scaled)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|err| QrEncodingError::image(err.to_string()))?;
        Ok(bytes)
    }
}

impl QrEncoder for PngQrEncoder {
    fn encode_png_base64(&self, payload: &str) -> Result<String, QrEncodingError> {
        Self::png_bytes(payload).map(|bytes| STANDARD.encode(bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[rstest]
    fn renders_a_square_png_of_fixed_size() {
        let encoded = PngQrEncoder::new()
            .encode_png_base64("7c9e6679-7425-40de-944b-e07fc1f90ae7")
            .expect("encodes");
        let bytes = STANDARD.decode(encoded).expect("standard base64");

        assert!(bytes.starts_with(&PNG_SIGNATURE));
        let image = image::load_from_memory_with_format(&bytes, ImageFormat::Png).expect("png");
        assert_eq!((image.width(), image.height()), (QR_IMAGE_SIZE, QR_IMAGE_SIZE));
    }

    #[rstest]
    fn oversized_payloads_fail_as_symbol_errors() {
        let payload = "x".repeat(4_000);
        let err = PngQrEncoder::new()
            .encode_png_base64(&payload)
            .expect_err("too long for a QR symbol");

        assert!(matches!(err, QrEncodingError::Symbol { .. }));
    }
}
