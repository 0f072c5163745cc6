//! Binary frame payload decoding.

use image::RgbImage;
use std::io::Cursor;
use thiserror::Error;

/// A frame payload that could not be turned into pixels.
///
/// Recoverable: the caller reports it per-frame and the session continues.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("empty frame payload")]
    Empty,

    #[error("unrecognized or corrupt image payload: {0}")]
    Malformed(#[from] image::ImageError),
}

/// A decoded still image, normalized to RGB8.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    image: RgbImage,
}

impl DecodedFrame {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw interleaved RGB8 pixel data.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Re-encode as JPEG, for the remote detector and the frame sink.
    pub fn encode_jpeg(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut buf = Cursor::new(Vec::new());
        self.image.write_to(&mut buf, image::ImageFormat::Jpeg)?;
        Ok(buf.into_inner())
    }
}

/// Decode a binary payload into a pixel buffer.
///
/// Accepts any encoding `image` recognizes (JPEG, PNG, WebP, ...). No retry;
/// the caller decides how to report failure. Side-effect-free.
pub fn decode(payload: &[u8]) -> Result<DecodedFrame, DecodeError> {
    if payload.is_empty() {
        return Err(DecodeError::Empty);
    }

    let image = image::load_from_memory(payload)?;
    Ok(DecodedFrame {
        image: image.to_rgb8(),
    })
}
