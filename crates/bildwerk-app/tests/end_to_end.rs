// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end checks: upload in, artifact out, staging left empty.

use std::io::{Cursor, Read};
use std::path::Path;

use bildwerk_app::ConversionService;
use bildwerk_core::config::ConverterConfig;
use bildwerk_core::error::BildwerkError;
use bildwerk_core::types::{MediaKind, UploadedImage};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

fn service(root: &Path) -> ConversionService {
    ConversionService::new(ConverterConfig {
        staging_dir: root.join("uploads"),
        output_dir: root.join("static").join("processed"),
        ..ConverterConfig::default()
    })
    .expect("service")
}

fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format).expect("encode");
    buffer.into_inner()
}

fn cat_png() -> Vec<u8> {
    let cat = RgbImage::from_fn(50, 50, |x, y| Rgb([x as u8 * 5, y as u8 * 5, 128]));
    encode(&DynamicImage::ImageRgb8(cat), ImageFormat::Png)
}

fn staged_files(service: &ConversionService) -> Vec<String> {
    std::fs::read_dir(service.staging().root())
        .expect("read staging")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect()
}

fn zip_part(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("zip");
    let mut part = archive.by_name(name).expect("part");
    let mut text = String::new();
    part.read_to_string(&mut text).expect("read part");
    text
}

#[test]
fn xlsx_upload_lands_in_output_and_leaves_staging_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = service(dir.path());

    let receipt = service
        .handle(Some(UploadedImage::new("cat.png", cat_png())), Some("xlsx"))
        .expect("convert");

    assert_eq!(receipt.artifact_name(), "cat.xlsx");
    assert_eq!(receipt.artifact.media_kind, MediaKind::Xlsx);
    assert!(receipt.cleanup_warning.is_none());
    assert_eq!(receipt.output_path, service.output().root().join("cat.xlsx"));
    assert!(staged_files(&service).is_empty());

    let stored = std::fs::read(&receipt.output_path).expect("stored artifact");
    assert_eq!(stored, receipt.artifact.content);

    let sheet = zip_part(&stored, "xl/worksheets/sheet1.xml");
    assert!(sheet.contains("cat.png"));
    assert!(sheet.contains("<v>50</v>"));
}

#[test]
fn every_operation_produces_its_named_artifact() {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = service(dir.path());
    let cases = [
        ("pdf", "cat.pdf"),
        ("docx", "cat.docx"),
        ("xlsx", "cat.xlsx"),
        ("csv", "cat.csv"),
        ("grayscale", "cat_edited.png"),
        ("sepia", "cat_edited.png"),
    ];

    for (operation, expected) in cases {
        let receipt = service
            .handle(Some(UploadedImage::new("cat.png", cat_png())), Some(operation))
            .expect("convert");
        assert_eq!(receipt.artifact_name(), expected, "operation {operation}");
        assert!(service.output().exists(expected));
    }
    assert!(staged_files(&service).is_empty());
}

#[test]
fn csv_reports_the_sanitised_upload_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = service(dir.path());

    let receipt = service
        .handle(
            Some(UploadedImage::new("my holiday.photo.PNG", cat_png())),
            Some("csv"),
        )
        .expect("convert");

    assert_eq!(receipt.artifact_name(), "my_holiday.photo.csv");
    let text = String::from_utf8(receipt.artifact.content).expect("utf8");
    assert_eq!(
        text.lines().collect::<Vec<_>>(),
        vec![
            "Attribute,Value",
            "Filename,my_holiday.photo.PNG",
            "Width,50",
            "Height,50"
        ]
    );
}

#[test]
fn jpeg_to_pdf_keeps_the_original_stream() {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = service(dir.path());
    let photo = DynamicImage::ImageRgb8(RgbImage::from_pixel(32, 24, Rgb([200, 100, 50])));
    let jpeg = encode(&photo, ImageFormat::Jpeg);

    let receipt = service
        .handle(Some(UploadedImage::new("photo.jpg", jpeg.clone())), Some("pdf"))
        .expect("convert");

    let pdf = &receipt.artifact.content;
    assert!(pdf.starts_with(b"%PDF-"));
    assert!(
        pdf.windows(jpeg.len()).any(|window| window == jpeg.as_slice()),
        "JPEG bytes should be embedded unchanged"
    );
}

#[test]
fn docx_carries_heading_and_picture() {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = service(dir.path());

    let receipt = service
        .handle(Some(UploadedImage::new("cat.png", cat_png())), Some("docx"))
        .expect("convert");

    let document = zip_part(&receipt.artifact.content, "word/document.xml");
    assert!(document.contains("Converted Image"));
    assert!(document.contains("<w:drawing>"));
}

#[test]
fn rejected_uploads_touch_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = service(dir.path());

    let cases = [
        None,
        Some(UploadedImage::new("", cat_png())),
        Some(UploadedImage::new("cat", cat_png())),
        Some(UploadedImage::new("cat.bmp", cat_png())),
        Some(UploadedImage::new("cat.png", Vec::new())),
    ];
    for upload in cases {
        let result = service.handle(upload, Some("pdf"));
        assert!(matches!(result, Err(BildwerkError::Validation(_))));
    }

    assert!(staged_files(&service).is_empty());
    assert_eq!(
        std::fs::read_dir(service.output().root()).expect("output").count(),
        0
    );
}

#[test]
fn corrupt_image_fails_and_cleans_staging() {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = service(dir.path());

    let result = service.handle(
        Some(UploadedImage::new("broken.png", b"definitely not a png".to_vec())),
        Some("grayscale"),
    );

    assert!(matches!(result, Err(BildwerkError::Decode(_))));
    assert!(staged_files(&service).is_empty());
    assert!(!service.output().exists("broken_edited.png"));
}

#[test]
fn transparent_image_cannot_become_a_pdf() {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = service(dir.path());
    let ghost = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 10])));

    let result = service.handle(
        Some(UploadedImage::new("ghost.png", encode(&ghost, ImageFormat::Png))),
        Some("pdf"),
    );

    assert!(matches!(result, Err(BildwerkError::UnsupportedImage(_))));
    assert!(staged_files(&service).is_empty());
}

#[test]
fn same_name_overwrites_previous_artifact() {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = service(dir.path());

    let small = encode(
        &DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([0, 0, 0]))),
        ImageFormat::Png,
    );
    service
        .handle(Some(UploadedImage::new("cat.png", small)), Some("csv"))
        .expect("first");
    let receipt = service
        .handle(Some(UploadedImage::new("cat.png", cat_png())), Some("csv"))
        .expect("second");

    let stored = std::fs::read_to_string(&receipt.output_path).expect("stored");
    assert!(stored.contains("Width,50"));
}

#[test]
fn output_write_failure_still_empties_staging() {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = service(dir.path());
    std::fs::remove_dir_all(service.output().root()).expect("remove output dir");

    let result = service.handle(Some(UploadedImage::new("cat.png", cat_png())), Some("csv"));

    assert!(matches!(result, Err(BildwerkError::Io(_))));
    assert!(staged_files(&service).is_empty());
    assert!(!service.output().root().exists());
}

#[test]
fn accented_upload_names_keep_their_letters() {
    let dir = tempfile::tempdir().expect("tempdir");
    let service = service(dir.path());

    let receipt = service
        .handle(
            Some(UploadedImage::new("r\u{e9}sum\u{e9} caf\u{e9}.png", cat_png())),
            Some("csv"),
        )
        .expect("convert");

    assert_eq!(receipt.artifact_name(), "resume_cafe.csv");
    let text = String::from_utf8(receipt.artifact.content).expect("utf8");
    assert!(text.contains("Filename,resume_cafe.png"));
}
