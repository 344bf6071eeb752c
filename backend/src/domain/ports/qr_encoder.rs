//! Port for rendering a session token as a QR image.

use super::define_port_error;

define_port_error! {
    /// Errors raised while encoding a QR payload.
    pub enum QrEncodingError {
        /// The payload could not be encoded as a QR symbol.
        Symbol { message: String } => "qr symbol encoding failed: {message}",
        /// The rendered raster could not be written as an image.
        Image { message: String } => "qr image encoding failed: {message}",
    }
}

/// Renders a token as a base64-encoded PNG.
#[cfg_attr(test, mockall::automock)]
pub trait QrEncoder: Send + Sync {
    /// Encode `payload` verbatim.
    fn encode_png_base64(&self, payload: &str) -> Result<String, QrEncodingError>;
}
