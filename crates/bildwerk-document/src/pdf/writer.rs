// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — wrap a single image in a one-page PDF using `lopdf`.
//
// The image is never lossily re-encoded. JPEG streams are copied byte for byte
// behind a /DCTDecode filter; PNG and GIF pixels are stored uncompressed in the
// object graph and Flate-compressed on save, which is lossless. The page is
// exactly the size of the image at the configured resolution.

use bildwerk_core::error::BildwerkError;
use image::{DynamicImage, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use tracing::{debug, info, instrument};

use crate::image::ImageProcessor;

/// Resource name the page content uses for the embedded image.
const IMAGE_RESOURCE: &str = "Im0";

/// Points per inch in PDF user space.
const POINTS_PER_INCH: f32 = 72.0;

/// Creates single-page PDF documents around raster images.
pub struct PdfWriter {
    /// Pixels per inch used to turn image pixels into page points.
    dpi: f32,
}

impl PdfWriter {
    pub fn new(dpi: f32) -> Self {
        Self { dpi }
    }

    /// Page size in points for an image of the given pixel dimensions.
    pub fn page_size(&self, width_px: u32, height_px: u32) -> (f32, f32) {
        let scale = POINTS_PER_INCH / self.dpi;
        (width_px as f32 * scale, height_px as f32 * scale)
    }

    /// Create a single-page PDF containing the given image.
    ///
    /// Fails with `Decode` if the bytes are not an image and with
    /// `UnsupportedImage` if the image cannot be placed on a page without
    /// re-encoding (transparency, unsupported codec or sample type).
    #[instrument(skip(self, image_bytes), fields(bytes_len = image_bytes.len()))]
    pub fn create_from_image(&self, image_bytes: &[u8]) -> Result<Vec<u8>, BildwerkError> {
        let processor = ImageProcessor::from_bytes(image_bytes)?;
        let (width, height) = (processor.width(), processor.height());
        let xobject = image_xobject(image_bytes, &processor)?;
        let (page_w, page_h) = self.page_size(width, height);

        info!(width, height, page_w, page_h, "Creating image PDF");

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let image_id = doc.add_object(xobject);

        // Scale the unit square the image occupies up to the full page.
        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        page_w.into(),
                        0.into(),
                        0.into(),
                        page_h.into(),
                        0.into(),
                        0.into(),
                    ],
                ),
                Operation::new("Do", vec![IMAGE_RESOURCE.into()]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_bytes = content.encode().map_err(|err| {
            BildwerkError::Encode(format!("failed to encode page content: {err}"))
        })?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content_bytes));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), page_w.into(), page_h.into()],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    IMAGE_RESOURCE => image_id,
                },
            },
        });

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut output = Vec::new();
        doc.save_to(&mut output)
            .map_err(|err| BildwerkError::Encode(format!("failed to serialise PDF: {err}")))?;

        debug!(output_bytes = output.len(), "Image PDF complete");
        Ok(output)
    }
}

/// Build the image XObject stream for `image_bytes`.
fn image_xobject(
    image_bytes: &[u8],
    processor: &ImageProcessor,
) -> Result<Stream, BildwerkError> {
    match processor.source_format() {
        Some(ImageFormat::Jpeg) => jpeg_xobject(image_bytes, processor),
        Some(ImageFormat::Png | ImageFormat::Gif) => raw_xobject(processor.as_dynamic()),
        Some(other) => Err(BildwerkError::UnsupportedImage(format!(
            "{other:?} images cannot be embedded in a PDF page without re-encoding"
        ))),
        None => Err(BildwerkError::UnsupportedImage(
            "unrecognised image codec cannot be embedded in a PDF page".into(),
        )),
    }
}

/// Copy a JPEG stream verbatim behind /DCTDecode.
fn jpeg_xobject(image_bytes: &[u8], processor: &ImageProcessor) -> Result<Stream, BildwerkError> {
    let components = jpeg_component_count(image_bytes).ok_or_else(|| {
        BildwerkError::UnsupportedImage("JPEG frame header not found".into())
    })?;

    let mut dict = image_dictionary(processor.width(), processor.height(), 8);
    match components {
        1 => dict.set("ColorSpace", "DeviceGray"),
        3 => dict.set("ColorSpace", "DeviceRGB"),
        4 => {
            // Adobe CMYK JPEGs store inverted samples.
            dict.set("ColorSpace", "DeviceCMYK");
            dict.set(
                "Decode",
                vec![1, 0, 1, 0, 1, 0, 1, 0]
                    .into_iter()
                    .map(Object::Integer)
                    .collect::<Vec<_>>(),
            );
        }
        n => {
            return Err(BildwerkError::UnsupportedImage(format!(
                "JPEG with {n} colour components cannot be embedded in a PDF page"
            )));
        }
    }
    dict.set("Filter", "DCTDecode");

    debug!(components, "Embedding JPEG stream verbatim");
    Ok(Stream::new(dict, image_bytes.to_vec()).with_compression(false))
}

/// Store decoded pixels as-is; `Document::compress` deflates them on save.
fn raw_xobject(image: &DynamicImage) -> Result<Stream, BildwerkError> {
    let opaque = drop_opaque_alpha(image)?;
    let (width, height) = (opaque.width(), opaque.height());

    let (colour_space, bits, samples) = match &opaque {
        DynamicImage::ImageLuma8(buf) => ("DeviceGray", 8, buf.as_raw().clone()),
        DynamicImage::ImageRgb8(buf) => ("DeviceRGB", 8, buf.as_raw().clone()),
        DynamicImage::ImageLuma16(buf) => ("DeviceGray", 16, u16_be_bytes(buf.as_raw())),
        DynamicImage::ImageRgb16(buf) => ("DeviceRGB", 16, u16_be_bytes(buf.as_raw())),
        other => {
            return Err(BildwerkError::UnsupportedImage(format!(
                "{:?} pixels cannot be embedded in a PDF page without re-encoding",
                other.color()
            )));
        }
    };

    let mut dict = image_dictionary(width, height, bits);
    dict.set("ColorSpace", colour_space);

    debug!(colour_space, bits, "Embedding lossless pixel data");
    Ok(Stream::new(dict, samples))
}

/// Strip an alpha channel that carries no transparency. Images with any
/// non-opaque pixel are refused: PDF image XObjects have no alpha.
fn drop_opaque_alpha(image: &DynamicImage) -> Result<DynamicImage, BildwerkError> {
    let transparent = || {
        BildwerkError::UnsupportedImage(
            "images with transparency cannot be embedded in a PDF page".into(),
        )
    };

    match image {
        DynamicImage::ImageLumaA8(buf) => {
            if buf.pixels().all(|p| p.0[1] == u8::MAX) {
                Ok(DynamicImage::ImageLuma8(image.to_luma8()))
            } else {
                Err(transparent())
            }
        }
        DynamicImage::ImageRgba8(buf) => {
            if buf.pixels().all(|p| p.0[3] == u8::MAX) {
                Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
            } else {
                Err(transparent())
            }
        }
        DynamicImage::ImageLumaA16(buf) => {
            if buf.pixels().all(|p| p.0[1] == u16::MAX) {
                Ok(DynamicImage::ImageLuma16(image.to_luma16()))
            } else {
                Err(transparent())
            }
        }
        DynamicImage::ImageRgba16(buf) => {
            if buf.pixels().all(|p| p.0[3] == u16::MAX) {
                Ok(DynamicImage::ImageRgb16(image.to_rgb16()))
            } else {
                Err(transparent())
            }
        }
        other => Ok(other.clone()),
    }
}

fn image_dictionary(width: u32, height: u32, bits_per_component: i64) -> Dictionary {
    dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => i64::from(width),
        "Height" => i64::from(height),
        "BitsPerComponent" => bits_per_component,
    }
}

fn u16_be_bytes(samples: &[u16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_be_bytes()).collect()
}

/// Number of colour components declared in the JPEG frame header (SOFn).
fn jpeg_component_count(data: &[u8]) -> Option<u8> {
    if !data.starts_with(&[0xFF, 0xD8]) {
        return None;
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        match marker {
            // Fill byte before a marker.
            0xFF => {
                pos += 1;
                continue;
            }
            // Standalone markers carry no length.
            0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            // Start of scan before any frame header.
            0xDA | 0xD9 => return None,
            // SOF0..SOF15 except DHT (C4), JPG (C8) and DAC (CC).
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                return data.get(pos + 9).copied();
            }
            _ => {}
        }
        let length = u16::from_be_bytes([*data.get(pos + 2)?, *data.get(pos + 3)?]) as usize;
        pos += 2 + length;
    }
    None
}
