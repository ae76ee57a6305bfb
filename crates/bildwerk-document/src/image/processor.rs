// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor — decode uploads, convert to grayscale, re-encode as PNG.
// Operates on in-memory images using the `image` crate.

use std::io::Cursor;

use bildwerk_core::error::BildwerkError;
use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::{debug, info, instrument};

/// A decoded upload together with the codec it arrived in.
///
/// Transformations consume `self` and return a new `ImageProcessor`, so calls
/// chain:
///
/// ```ignore
/// let png = ImageProcessor::from_bytes(&upload.content)?
///     .grayscale()
///     .to_png_bytes()?;
/// ```
pub struct ImageProcessor {
    /// The current working image.
    image: DynamicImage,
    /// Codec detected from the source bytes, if any.
    source_format: Option<ImageFormat>,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Create a processor from raw encoded bytes (JPEG, PNG, GIF, ...).
    ///
    /// The codec is sniffed from the content, not from any filename.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, BildwerkError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|err| BildwerkError::Decode(format!("failed to sniff image format: {err}")))?;
        let source_format = reader.format();
        let image = reader
            .decode()
            .map_err(|err| BildwerkError::Decode(format!("failed to decode image: {err}")))?;
        debug!(
            width = image.width(),
            height = image.height(),
            format = ?source_format,
            "Image decoded from bytes"
        );
        Ok(Self {
            image,
            source_format,
        })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            image,
            source_format: None,
        }
    }

    // -- Accessors ------------------------------------------------------------

    /// Current image width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Current image height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Codec the image was decoded from.
    pub fn source_format(&self) -> Option<ImageFormat> {
        self.source_format
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    // -- Transformations ------------------------------------------------------

    /// Convert to single-channel 8-bit luminance. Any alpha channel is
    /// discarded.
    #[instrument(skip(self))]
    pub fn grayscale(self) -> Self {
        info!("Converting to grayscale");
        Self {
            image: DynamicImage::ImageLuma8(self.image.to_luma8()),
            source_format: self.source_format,
        }
    }

    // -- Output ---------------------------------------------------------------

    /// Encode the current image as PNG bytes.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>, BildwerkError> {
        encode_to_format(&self.image, ImageFormat::Png)
    }
}

/// Encode a `DynamicImage` into the specified format, returning the raw bytes.
fn encode_to_format(image: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>, BildwerkError> {
    let mut buffer = Vec::new();
    let mut cursor = Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, format)
        .map_err(|err| BildwerkError::Encode(format!("image encoding failed: {err}")))?;
    Ok(buffer)
}
