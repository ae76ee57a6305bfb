// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the bildwerk-document conversion dispatch.
// Runs every operation on a small synthetic photo so regressions in one
// branch show up in isolation.

use std::io::Cursor;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use bildwerk_core::ConversionOperation;
use bildwerk_document::FormatConverter;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Benchmark each conversion on a 256x256 gradient PNG.
fn bench_conversions(c: &mut Criterion) {
    let image = DynamicImage::ImageRgb8(RgbImage::from_fn(256, 256, |x, y| {
        Rgb([x as u8, y as u8, ((x + y) / 2) as u8])
    }));
    let mut png = Cursor::new(Vec::new());
    image
        .write_to(&mut png, ImageFormat::Png)
        .expect("encode benchmark image");
    let png = png.into_inner();

    let converter = FormatConverter::default();
    let mut group = c.benchmark_group("convert (256x256 png)");
    for operation in ConversionOperation::ALL {
        group.bench_function(operation.keyword(), |b| {
            b.iter(|| {
                let artifact = converter
                    .convert_bytes(black_box(&png), "bench.png", operation)
                    .expect("conversion");
                black_box(artifact.content);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_conversions);
criterion_main!(benches);
