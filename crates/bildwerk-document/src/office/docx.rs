// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DOCX writer — a Title-styled heading followed by one inline picture.

use bildwerk_core::error::BildwerkError;
use image::ImageFormat;
use tracing::{debug, info, instrument};

use super::package::{OoxmlPackage, XML_DECLARATION, escape_xml};
use crate::image::ImageProcessor;

/// Heading placed above the picture.
pub const HEADING: &str = "Converted Image";

/// English Metric Units per inch (DrawingML length unit).
pub const EMU_PER_INCH: f32 = 914_400.0;

const NS_MAIN: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PACKAGE_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

/// Picture payload as stored inside the package.
struct EmbeddedPicture {
    bytes: Vec<u8>,
    extension: &'static str,
    content_type: &'static str,
}

/// Creates word-processor documents around a single image.
pub struct DocxWriter {
    /// Display width of the picture; height follows the aspect ratio.
    image_width_inches: f32,
}

impl DocxWriter {
    pub fn new(image_width_inches: f32) -> Self {
        Self { image_width_inches }
    }

    /// Display size of a `width_px` x `height_px` image in EMU.
    pub fn extent_emu(&self, width_px: u32, height_px: u32) -> (i64, i64) {
        let cx = (self.image_width_inches * EMU_PER_INCH).round() as i64;
        let cy = if width_px == 0 {
            0
        } else {
            (cx as f64 * f64::from(height_px) / f64::from(width_px)).round() as i64
        };
        (cx, cy)
    }

    /// Create a DOCX containing the heading and the image.
    ///
    /// JPEG, PNG and GIF sources are embedded byte for byte; any other codec
    /// is re-encoded as PNG first.
    #[instrument(skip(self, image_bytes), fields(bytes_len = image_bytes.len()))]
    pub fn create_from_image(&self, image_bytes: &[u8]) -> Result<Vec<u8>, BildwerkError> {
        let processor = ImageProcessor::from_bytes(image_bytes)?;
        let (cx, cy) = self.extent_emu(processor.width(), processor.height());
        info!(
            width = processor.width(),
            height = processor.height(),
            cx,
            cy,
            "Creating image DOCX"
        );

        let picture = embedded_picture(image_bytes, &processor)?;
        let media_name = format!("image1.{}", picture.extension);

        let mut package = OoxmlPackage::new();
        package
            .add_part("[Content_Types].xml", content_types(&picture))
            .add_part("_rels/.rels", root_relationships())
            .add_part("word/document.xml", document_xml(&media_name, cx, cy))
            .add_part("word/styles.xml", styles_xml())
            .add_part("word/_rels/document.xml.rels", document_relationships(&media_name))
            .add_part(format!("word/media/{media_name}"), picture.bytes);

        let output = package.finish()?;
        debug!(output_bytes = output.len(), "Image DOCX complete");
        Ok(output)
    }
}

fn embedded_picture(
    image_bytes: &[u8],
    processor: &ImageProcessor,
) -> Result<EmbeddedPicture, BildwerkError> {
    let (extension, content_type) = match processor.source_format() {
        Some(ImageFormat::Jpeg) => ("jpeg", "image/jpeg"),
        Some(ImageFormat::Png) => ("png", "image/png"),
        Some(ImageFormat::Gif) => ("gif", "image/gif"),
        _ => {
            return Ok(EmbeddedPicture {
                bytes: processor.to_png_bytes()?,
                extension: "png",
                content_type: "image/png",
            });
        }
    };
    Ok(EmbeddedPicture {
        bytes: image_bytes.to_vec(),
        extension,
        content_type,
    })
}

fn content_types(picture: &EmbeddedPicture) -> String {
    format!(
        r#"{XML_DECLARATION}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="{ext}" ContentType="{ct}"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#,
        ext = picture.extension,
        ct = picture.content_type,
    )
}

fn root_relationships() -> String {
    format!(
        r#"{XML_DECLARATION}
<Relationships xmlns="{NS_PACKAGE_REL}"><Relationship Id="rId1" Type="{NS_REL}/officeDocument" Target="word/document.xml"/></Relationships>"#
    )
}

fn document_relationships(media_name: &str) -> String {
    format!(
        r#"{XML_DECLARATION}
<Relationships xmlns="{NS_PACKAGE_REL}"><Relationship Id="rId1" Type="{NS_REL}/styles" Target="styles.xml"/><Relationship Id="rId2" Type="{NS_REL}/image" Target="media/{media_name}"/></Relationships>"#
    )
}

fn document_xml(media_name: &str, cx: i64, cy: i64) -> String {
    let heading = escape_xml(HEADING);
    format!(
        r#"{XML_DECLARATION}
<w:document xmlns:w="{NS_MAIN}" xmlns:r="{NS_REL}" xmlns:wp="{NS_WP}" xmlns:a="{NS_A}" xmlns:pic="{NS_PIC}"><w:body><w:p><w:pPr><w:pStyle w:val="Title"/></w:pPr><w:r><w:t>{heading}</w:t></w:r></w:p><w:p><w:r><w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx="{cx}" cy="{cy}"/><wp:docPr id="1" name="Picture 1"/><wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr><a:graphic><a:graphicData uri="{NS_PIC}"><pic:pic><pic:nvPicPr><pic:cNvPr id="0" name="{media_name}"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing></w:r></w:p><w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1800" w:bottom="1440" w:left="1800" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr></w:body></w:document>"#
    )
}

fn styles_xml() -> String {
    format!(
        r#"{XML_DECLARATION}
<w:styles xmlns:w="{NS_MAIN}"><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:spacing w:after="300"/></w:pPr><w:rPr><w:sz w:val="52"/><w:szCs w:val="52"/></w:rPr></w:style></w:styles>"#
    )
}
