// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OOXML package writer. A .docx or .xlsx file is a zip archive of XML parts
// plus binary media; this assembles one in memory.

use std::borrow::Cow;
use std::io::{Cursor, Write};

use bildwerk_core::error::BildwerkError;
use tracing::debug;
use zip::write::{FileOptions, ZipWriter};
use zip::{CompressionMethod, DateTime};

/// XML declaration every part starts with.
pub const XML_DECLARATION: &str =
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// An in-memory list of package parts, written out in insertion order.
///
/// Entries carry a fixed timestamp so the same parts always produce the same
/// archive bytes.
#[derive(Debug, Default)]
pub struct OoxmlPackage {
    parts: Vec<(String, Vec<u8>)>,
}

impl OoxmlPackage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a part. `[Content_Types].xml` should be added first.
    pub fn add_part(&mut self, name: impl Into<String>, content: impl Into<Vec<u8>>) -> &mut Self {
        self.parts.push((name.into(), content.into()));
        self
    }

    /// Serialise the package as a zip archive.
    pub fn finish(self) -> Result<Vec<u8>, BildwerkError> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            let options = FileOptions::default()
                .compression_method(CompressionMethod::Deflated)
                .last_modified_time(DateTime::default());

            for (name, content) in &self.parts {
                zip.start_file(name.as_str(), options).map_err(|err| {
                    BildwerkError::Encode(format!("failed to add {name} to package: {err}"))
                })?;
                zip.write_all(content).map_err(|err| {
                    BildwerkError::Encode(format!("failed to write {name} to package: {err}"))
                })?;
            }

            zip.finish().map_err(|err| {
                BildwerkError::Encode(format!("failed to finalise package: {err}"))
            })?;
        }

        debug!(parts = self.parts.len(), bytes = buffer.len(), "OOXML package written");
        Ok(buffer)
    }
}

/// Escape text for use in XML character data and attribute values.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn parts_round_trip_through_zip() {
        let mut package = OoxmlPackage::new();
        package
            .add_part("[Content_Types].xml", "<Types/>")
            .add_part("word/media/image1.png", vec![1u8, 2, 3]);
        let bytes = package.finish().expect("finish");

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open zip");
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.by_index(0).expect("first").name(), "[Content_Types].xml");

        let mut media = Vec::new();
        archive
            .by_name("word/media/image1.png")
            .expect("media part")
            .read_to_end(&mut media)
            .expect("read");
        assert_eq!(media, vec![1, 2, 3]);
    }

    #[test]
    fn identical_parts_give_identical_archives() {
        let build = || {
            let mut package = OoxmlPackage::new();
            package.add_part("a.xml", "<a/>");
            package.finish().expect("finish")
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(escape_xml("plain.png"), "plain.png");
        assert_eq!(escape_xml("a&b<c>\"d'"), "a&amp;b&lt;c&gt;&quot;d&apos;");
    }
}
