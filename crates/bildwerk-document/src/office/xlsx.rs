// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// XLSX writer — a single worksheet with a bold header row. Strings are
// written inline so no shared-string table is needed.

use bildwerk_core::error::BildwerkError;
use tracing::{debug, instrument};

use super::package::{OoxmlPackage, XML_DECLARATION, escape_xml};

/// Name of the only worksheet.
pub const SHEET_NAME: &str = "Sheet1";

const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const NS_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_PACKAGE_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Style index of the bold header cell format in `styles.xml`.
const HEADER_STYLE: u32 = 1;

/// A single worksheet cell value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Integer(i64),
}

impl Cell {
    /// The value as it would appear in a CSV field.
    pub fn display(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Integer(value) => value.to_string(),
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Cell {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<u32> for Cell {
    fn from(value: u32) -> Self {
        Self::Integer(i64::from(value))
    }
}

/// Writes one header row plus data rows into a workbook.
pub struct XlsxWriter;

impl XlsxWriter {
    #[instrument(skip_all, fields(columns = header.len(), rows = rows.len()))]
    pub fn create(header: &[&str], rows: &[Vec<Cell>]) -> Result<Vec<u8>, BildwerkError> {
        let mut package = OoxmlPackage::new();
        package
            .add_part("[Content_Types].xml", content_types())
            .add_part("_rels/.rels", root_relationships())
            .add_part("xl/workbook.xml", workbook_xml())
            .add_part("xl/_rels/workbook.xml.rels", workbook_relationships())
            .add_part("xl/styles.xml", styles_xml())
            .add_part("xl/worksheets/sheet1.xml", sheet_xml(header, rows));

        let output = package.finish()?;
        debug!(output_bytes = output.len(), "Workbook complete");
        Ok(output)
    }
}

/// Spreadsheet column letters for a zero-based index (0 → A, 26 → AA).
pub fn column_name(mut index: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name.reverse();
    String::from_utf8(name).unwrap_or_default()
}

fn sheet_xml(header: &[&str], rows: &[Vec<Cell>]) -> String {
    let mut xml = format!(r#"{XML_DECLARATION}
<worksheet xmlns="{NS_MAIN}"><sheetData>"#);

    let header_cells: Vec<Cell> = header.iter().map(|&text| Cell::from(text)).collect();
    write_row(&mut xml, 1, &header_cells, Some(HEADER_STYLE));
    for (offset, row) in rows.iter().enumerate() {
        write_row(&mut xml, offset + 2, row, None);
    }

    xml.push_str("</sheetData></worksheet>");
    xml
}

fn write_row(xml: &mut String, row_number: usize, cells: &[Cell], style: Option<u32>) {
    xml.push_str(&format!(r#"<row r="{row_number}">"#));
    for (column, cell) in cells.iter().enumerate() {
        let reference = format!("{}{row_number}", column_name(column));
        let style_attr = style.map(|s| format!(r#" s="{s}""#)).unwrap_or_default();
        let cell_xml = match cell {
            Cell::Text(text) => format!(
                r#"<c r="{reference}" t="inlineStr"{style_attr}><is><t xml:space="preserve">{}</t></is></c>"#,
                escape_xml(text)
            ),
            Cell::Integer(value) => {
                format!(r#"<c r="{reference}"{style_attr}><v>{value}</v></c>"#)
            }
        };
        xml.push_str(&cell_xml);
    }
    xml.push_str("</row>");
}

fn content_types() -> String {
    format!(
        r#"{XML_DECLARATION}
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/><Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/></Types>"#
    )
}

fn root_relationships() -> String {
    format!(
        r#"{XML_DECLARATION}
<Relationships xmlns="{NS_PACKAGE_REL}"><Relationship Id="rId1" Type="{NS_REL}/officeDocument" Target="xl/workbook.xml"/></Relationships>"#
    )
}

fn workbook_xml() -> String {
    format!(
        r#"{XML_DECLARATION}
<workbook xmlns="{NS_MAIN}" xmlns:r="{NS_REL}"><sheets><sheet name="{SHEET_NAME}" sheetId="1" r:id="rId1"/></sheets></workbook>"#
    )
}

fn workbook_relationships() -> String {
    format!(
        r#"{XML_DECLARATION}
<Relationships xmlns="{NS_PACKAGE_REL}"><Relationship Id="rId1" Type="{NS_REL}/worksheet" Target="worksheets/sheet1.xml"/><Relationship Id="rId2" Type="{NS_REL}/styles" Target="styles.xml"/></Relationships>"#
    )
}

fn styles_xml() -> String {
    format!(
        r#"{XML_DECLARATION}
<styleSheet xmlns="{NS_MAIN}"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/></cellXfs><cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles></styleSheet>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn sheet(xlsx: &[u8]) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(xlsx)).expect("open xlsx");
        let mut part = archive.by_name("xl/worksheets/sheet1.xml").expect("sheet");
        let mut xml = String::new();
        part.read_to_string(&mut xml).expect("read");
        xml
    }

    #[test]
    fn column_names() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(1), "B");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(27), "AB");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
    }

    #[test]
    fn header_is_bold_and_values_are_typed() {
        let rows = vec![
            vec![Cell::from("Filename"), Cell::from("cat & dog.png")],
            vec![Cell::from("Width"), Cell::from(100u32)],
        ];
        let xlsx = XlsxWriter::create(&["Attribute", "Value"], &rows).expect("xlsx");
        let xml = sheet(&xlsx);

        assert!(xml.contains(r#"<c r="A1" t="inlineStr" s="1">"#));
        assert!(xml.contains("cat &amp; dog.png"));
        assert!(xml.contains(r#"<c r="B3"><v>100</v></c>"#));
        assert_eq!(xml.matches("<row ").count(), 3);
    }
}
