// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the diffpress-document crate: drawing and
// serialising a laid-out multi-page diff.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use diffpress_core::RenderConfig;
use diffpress_diff::parse_unified_diff;
use diffpress_document::{FontSet, PdfWriter};
use diffpress_layout::layout_document;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// 20 files of 60 changed lines, drawn with built-in Courier.
fn bench_render(c: &mut Criterion) {
    let mut text = String::new();
    for f in 0..20 {
        text.push_str(&format!("--- a/f{f}.rs\n+++ b/f{f}.rs\n@@ -1,60 +1,60 @@\n"));
        for l in 0..60 {
            text.push_str(&format!("-old line {l}\n+new line {l} with more text\n"));
        }
    }
    let config = RenderConfig::default();
    let fonts = FontSet::default();
    let layout = layout_document(&parse_unified_diff(&text), &fonts, &config);
    let writer = PdfWriter::from_config(&config);

    c.bench_function("render 20-file layout", |b| {
        b.iter(|| black_box(writer.render(black_box(&layout), &fonts)));
    });
}

criterion_group!(benches, bench_render);
criterion_main!(benches);
