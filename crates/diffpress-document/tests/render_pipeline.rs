// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// End-to-end: raw diff bytes -> parsed model -> layout -> PDF (checked back
// with lopdf) and .docx (checked back with docx-rs).

use diffpress_core::{RenderConfig, ViewMode};
use diffpress_diff::parse_bytes;
use diffpress_document::{DocxWriter, FontSet, PdfWriter};
use diffpress_layout::layout_document;

fn big_diff(files: usize, lines: usize) -> String {
    let mut out = String::new();
    for f in 0..files {
        out.push_str(&format!(
            "diff --git a/src/m{f}.rs b/src/m{f}.rs\n--- a/src/m{f}.rs\n+++ b/src/m{f}.rs\n@@ -1,{lines} +1,{lines} @@ impl M{f}\n"
        ));
        for l in 0..lines {
            out.push_str(&format!("-\tlet old_{l} = {l};\n+\tlet new_{l} = {l} * 2;\n"));
        }
    }
    out
}

fn page_count(bytes: &[u8]) -> usize {
    lopdf::Document::load_mem(bytes)
        .expect("output parses as PDF")
        .get_pages()
        .len()
}

#[test]
fn small_diff_renders_one_page() {
    let raw = b"diff --git a/f.py b/f.py\n--- a/f.py\n+++ b/f.py\n@@ -1,2 +1,3 @@\n context\n-old\n+new1\n+new2\n";
    let files = parse_bytes(raw);
    let config = RenderConfig::default();
    let fonts = FontSet::resolve(&config);
    let layout = layout_document(&files, &fonts, &config);

    let bytes = PdfWriter::from_config(&config).render(&layout, &fonts).unwrap();
    assert_eq!(page_count(&bytes), 1);
}

#[test]
fn page_count_matches_layout() {
    let files = parse_bytes(big_diff(8, 40).as_bytes());
    for view in [ViewMode::Unified, ViewMode::SideBySide] {
        let config = RenderConfig {
            view,
            ..RenderConfig::default()
        };
        let fonts = FontSet::default();
        let layout = layout_document(&files, &fonts, &config);
        assert!(layout.page_count() > 1);

        let bytes = PdfWriter::from_config(&config).render(&layout, &fonts).unwrap();
        assert_eq!(page_count(&bytes), layout.page_count());
    }
}

#[test]
fn utf16_input_renders_like_utf8() {
    let text = big_diff(2, 5);
    let mut utf16 = vec![0xFF, 0xFE];
    utf16.extend(text.encode_utf16().flat_map(|u| u.to_le_bytes()));

    let config = RenderConfig::default();
    let fonts = FontSet::default();
    let from_utf8 = layout_document(&parse_bytes(text.as_bytes()), &fonts, &config);
    let from_utf16 = layout_document(&parse_bytes(&utf16), &fonts, &config);
    assert_eq!(from_utf8.blocks, from_utf16.blocks);
}

#[test]
fn writes_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.pdf");
    let files = parse_bytes(big_diff(1, 3).as_bytes());
    let config = RenderConfig {
        landscape: true,
        title: "Review".into(),
        ..RenderConfig::default()
    };
    let fonts = FontSet::default();
    let layout = layout_document(&files, &fonts, &config);

    PdfWriter::from_config(&config)
        .write_to_file(&layout, &fonts, &path)
        .unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(page_count(&bytes), 1);
}

#[test]
fn word_export_shares_the_pdf_layout() {
    let files = parse_bytes(big_diff(3, 30).as_bytes());
    let config = RenderConfig::default();
    let fonts = FontSet::default();
    let layout = layout_document(&files, &fonts, &config);

    let pdf = PdfWriter::from_config(&config).render(&layout, &fonts).unwrap();
    assert!(page_count(&pdf) > 1);

    let bytes = DocxWriter::from_config(&config).render(&layout).unwrap();
    let mut docx = docx_rs::read_docx(&bytes).unwrap();
    let tables = docx
        .document
        .children
        .iter()
        .filter(|c| matches!(c, docx_rs::DocumentChild::Table(_)))
        .count();
    assert_eq!(tables, layout.blocks.len());
    let json = docx.json();
    for f in 0..3 {
        assert!(json.contains(&format!("src/m{f}.rs")));
    }
    assert!(json.contains("let new_29 = 29 * 2;"));
}
