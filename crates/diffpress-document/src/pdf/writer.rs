// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — draws a paginated diff layout using `printpdf` 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. All positions coming from the layout are measured
// top-down; they are flipped into PDF's bottom-up space here.

use std::path::Path;

use diffpress_core::error::{DiffpressError, Result};
use diffpress_core::theme::Rgb;
use diffpress_core::{LineKind, RenderConfig, Theme};
use diffpress_layout::{
    Block, BlockContent, DocumentLayout, FontRole, LineContent, PlacedBlock, SideCell,
    TextMeasure, TextStyle,
};
use printpdf::{
    Color, Line, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg,
    Point, Polygon, PolygonRing, Pt, TextItem, WindingOrder,
};
use tracing::{debug, info, instrument};

use crate::fonts::{FontHandle, FontHandles, FontSet};

/// Width of the coloured bar at the left edge of changed rows.
const CHANGE_BAR: f32 = 2.5;
/// Horizontal padding inside file badges and hunk header bars.
const PAD_X: f32 = 7.0;
/// Thickness of the rule under the page header.
const HEADER_RULE: f32 = 0.8;

fn pt_to_mm(pt: f32) -> Mm {
    Mm(pt * 25.4 / 72.0)
}

fn pdf_color(c: Rgb) -> Color {
    Color::Rgb(printpdf::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
        icc_profile: None,
    })
}

/// Background, text colour, and change bar for a line kind.
fn line_colors(theme: &Theme, kind: LineKind) -> (Rgb, Rgb, Option<Rgb>) {
    match kind {
        LineKind::Addition => (theme.bg_added, theme.tx_added, Some(theme.bar_added)),
        LineKind::Deletion => (theme.bg_removed, theme.tx_removed, Some(theme.bar_removed)),
        LineKind::Context => (theme.bg_context, theme.tx_context, None),
    }
}

/// Renders a [`DocumentLayout`] into PDF bytes.
pub struct PdfWriter {
    /// Printed in every page header and stored in the PDF /Info dictionary.
    title: String,
    theme: Theme,
    /// Printed right-aligned in every page header.
    timestamp: String,
}

impl PdfWriter {
    pub fn new(title: impl Into<String>, theme: Theme) -> Self {
        Self {
            title: title.into(),
            theme,
            timestamp: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.title.clone(), Theme::for_kind(config.theme))
    }

    /// Override the header timestamp.
    pub fn set_timestamp(&mut self, timestamp: impl Into<String>) {
        self.timestamp = timestamp.into();
    }

    /// Draw every page of `layout`. An empty layout yields one blank page
    /// carrying only the header and footer.
    #[instrument(skip_all, fields(pages = layout.pages.len(), title = %self.title))]
    pub fn render(&self, layout: &DocumentLayout, fonts: &FontSet) -> Result<Vec<u8>> {
        let geometry = &layout.geometry;
        let (page_w, page_h) = (pt_to_mm(geometry.width), pt_to_mm(geometry.height));

        let mut doc = PdfDocument::new(&self.title);
        let handles = fonts.register(&mut doc);

        let total = layout.pages.len().max(1);
        let mut pages: Vec<PdfPage> = Vec::with_capacity(total);
        for number in 1..=total {
            let mut canvas = Canvas::new(layout, fonts, &handles, &self.theme);
            canvas.page_header(&self.title, &self.timestamp);
            if let Some(page) = layout.pages.get(number - 1) {
                for placed in &page.blocks {
                    let block = layout.blocks.get(placed.block).ok_or_else(|| {
                        DiffpressError::PdfError(format!(
                            "page {number} references missing block {}",
                            placed.block
                        ))
                    })?;
                    canvas.block(block, placed);
                }
            }
            canvas.footer(number, total);
            pages.push(PdfPage::new(page_w, page_h, canvas.ops));
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        debug!(
            bytes = output.len(),
            warnings = warnings.len(),
            "PDF serialised"
        );
        Ok(output)
    }

    /// Render and write straight to a file.
    pub fn write_to_file(
        &self,
        layout: &DocumentLayout,
        fonts: &FontSet,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let bytes = self.render(layout, fonts)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote PDF to {}", path.as_ref().display());
        Ok(())
    }
}

// -- Page drawing -------------------------------------------------------------

/// Op list for one page plus what is needed to fill it.
struct Canvas<'a> {
    layout: &'a DocumentLayout,
    fonts: &'a FontSet,
    handles: &'a FontHandles,
    theme: &'a Theme,
    ops: Vec<Op>,
}

impl<'a> Canvas<'a> {
    fn new(
        layout: &'a DocumentLayout,
        fonts: &'a FontSet,
        handles: &'a FontHandles,
        theme: &'a Theme,
    ) -> Self {
        Self {
            layout,
            fonts,
            handles,
            theme,
            ops: Vec::new(),
        }
    }

    fn size(&self) -> f32 {
        self.layout.font_size
    }

    fn line_h(&self) -> f32 {
        self.fonts.line_height(TextStyle::mono(self.size()))
    }

    /// Flip a top-down page coordinate into PDF space.
    fn flip(&self, y: f32) -> Pt {
        Pt(self.layout.geometry.height - y)
    }

    fn point(&self, x: f32, y: f32) -> LinePoint {
        LinePoint {
            p: Point {
                x: Pt(x),
                y: self.flip(y),
            },
            bezier: false,
        }
    }

    // -- Primitives --

    fn fill_rect(&mut self, x: f32, top: f32, width: f32, height: f32, color: Rgb) {
        let points = vec![
            self.point(x, top),
            self.point(x + width, top),
            self.point(x + width, top + height),
            self.point(x, top + height),
        ];
        self.ops.push(Op::SetFillColor {
            col: pdf_color(color),
        });
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![PolygonRing { points }],
                mode: PaintMode::Fill,
                winding_order: WindingOrder::NonZero,
            },
        });
    }

    fn rule(&mut self, x0: f32, x1: f32, y: f32, color: Rgb) {
        let points = vec![self.point(x0, y), self.point(x1, y)];
        self.ops.push(Op::SetOutlineColor {
            col: pdf_color(color),
        });
        self.ops.push(Op::SetOutlineThickness {
            pt: Pt(HEADER_RULE),
        });
        self.ops.push(Op::DrawLine {
            line: Line {
                points,
                is_closed: false,
            },
        });
    }

    /// Write `text` with its baseline at top-down `baseline`.
    fn text(&mut self, x: f32, baseline: f32, text: &str, style: TextStyle, color: Rgb) {
        if text.is_empty() {
            return;
        }
        let items = vec![TextItem::Text(text.to_string())];
        let size = Pt(style.size);
        self.ops.push(Op::StartTextSection);
        self.ops.push(Op::SetFillColor {
            col: pdf_color(color),
        });
        self.ops.push(Op::SetTextCursor {
            pos: Point {
                x: Pt(x),
                y: self.flip(baseline),
            },
        });
        match self.handles.get(style.role) {
            FontHandle::Embedded(font) => {
                self.ops.push(Op::SetFontSize {
                    size,
                    font: font.clone(),
                });
                self.ops.push(Op::WriteText {
                    items,
                    font: font.clone(),
                });
            }
            FontHandle::Builtin(font) => {
                self.ops.push(Op::SetFontSizeBuiltinFont { size, font: *font });
                self.ops.push(Op::WriteTextBuiltinFont { items, font: *font });
            }
        }
        self.ops.push(Op::EndTextSection);
    }

    fn width(&self, text: &str, style: TextStyle) -> f32 {
        self.fonts.text_width(text, style)
    }

    // -- Page furniture --

    fn page_header(&mut self, title: &str, timestamp: &str) {
        let geo = self.layout.geometry;
        let (x0, x1, y0) = (geo.content_left(), geo.content_right(), geo.spacing.margin);
        let fs = self.size();
        let theme = *self.theme;

        self.text(
            x0,
            y0,
            title,
            TextStyle::new(FontRole::UiBold, fs + 2.0),
            theme.ui_text,
        );
        let stamp_style = TextStyle::new(FontRole::Ui, fs);
        let stamp_w = self.width(timestamp, stamp_style);
        self.text(x1 - stamp_w, y0, timestamp, stamp_style, theme.ui_subtle);
        self.rule(x0, x1, y0 + 2.0 * fs + 2.0, theme.header_line);
    }

    fn footer(&mut self, number: usize, total: usize) {
        let geo = self.layout.geometry;
        let label = format!("Page {number} / {total}");
        let style = TextStyle::new(FontRole::Ui, self.size());
        let x = (geo.content_left() + geo.content_right()) / 2.0 - self.width(&label, style) / 2.0;
        let subtle = self.theme.ui_subtle;
        self.text(x, geo.height - geo.spacing.margin, &label, style, subtle);
    }

    // -- Blocks --

    fn block(&mut self, block: &Block, placed: &PlacedBlock) {
        let top = self.layout.geometry.content_top() + placed.y;
        match &block.content {
            BlockContent::FileBadge { label } => self.file_badge(label, top),
            BlockContent::HunkHeader {
                header,
                section_rows,
            } => self.hunk_header(header, section_rows, top),
            BlockContent::LineGroup { lines } => {
                let range = placed.lines.clone().unwrap_or(0..lines.len());
                let mut row_top = top;
                for line in lines.get(range).unwrap_or_default() {
                    match &line.content {
                        LineContent::Unified {
                            kind,
                            line_no,
                            rows,
                        } => self.unified_line(*kind, *line_no, rows, row_top),
                        LineContent::SideBySide { left, right } => {
                            self.side_by_side_line(left.as_ref(), right.as_ref(), row_top)
                        }
                    }
                    row_top += line.height;
                }
            }
        }
    }

    fn file_badge(&mut self, label: &str, top: f32) {
        let geo = self.layout.geometry;
        let x0 = geo.content_left();
        let style = TextStyle::new(FontRole::UiBold, self.size());
        let width = (PAD_X + self.width(label, style) + PAD_X).min(geo.content_width());
        let theme = *self.theme;

        self.fill_rect(x0, top, width, self.line_h(), theme.bg_hunk);
        self.text(x0 + PAD_X, top + self.size(), label, style, theme.tx_hunk);
    }

    fn hunk_header(&mut self, header: &str, section_rows: &[String], top: f32) {
        let geo = self.layout.geometry;
        let x0 = geo.content_left();
        let line_h = self.line_h();
        let fs = self.size();
        let theme = *self.theme;

        self.fill_rect(x0, top, geo.content_width(), line_h, theme.bg_hunk);
        self.text(x0 + PAD_X, top + fs, header, TextStyle::mono(fs), theme.tx_hunk);

        let text_x = x0 + self.layout.columns.text_offset;
        let mut row_top = top + line_h + geo.spacing.gap_hunk_to_code;
        for row in section_rows {
            self.fill_rect(x0, row_top, geo.content_width(), line_h, theme.bg_added);
            self.fill_rect(x0, row_top, CHANGE_BAR, line_h, theme.bar_added);
            self.text(text_x, row_top + fs, row, TextStyle::mono(fs), theme.tx_added);
            row_top += line_h;
        }
    }

    fn gutter_number(&mut self, x: f32, baseline: f32, number: u32) {
        let digits = self.layout.geometry.spacing.gutter_chars;
        let text = format!("{number:>digits$} ");
        let subtle = self.theme.ui_subtle;
        self.text(x, baseline, &text, TextStyle::mono(self.size()), subtle);
    }

    fn unified_line(&mut self, kind: LineKind, line_no: Option<u32>, rows: &[String], top: f32) {
        let geo = self.layout.geometry;
        let x0 = geo.content_left();
        let text_x = x0 + self.layout.columns.text_offset;
        let (line_h, fs) = (self.line_h(), self.size());
        let (bg, fg, bar) = line_colors(self.theme, kind);

        for (j, row) in rows.iter().enumerate() {
            let row_top = top + j as f32 * line_h;
            self.fill_rect(x0, row_top, geo.content_width(), line_h, bg);
            if let Some(bar) = bar {
                self.fill_rect(x0, row_top, CHANGE_BAR, line_h, bar);
            }
            if let (0, Some(n)) = (j, line_no) {
                self.gutter_number(x0, row_top + fs, n);
            }
            self.text(text_x, row_top + fs, row, TextStyle::mono(fs), fg);
        }
    }

    fn side_by_side_line(
        &mut self,
        left: Option<&SideCell>,
        right: Option<&SideCell>,
        top: f32,
    ) {
        let x0 = self.layout.geometry.content_left();
        let right_x = x0 + self.layout.columns.right_column_x;
        let rows = left
            .map_or(1, |c| c.rows.len())
            .max(right.map_or(1, |c| c.rows.len()));

        if let Some(cell) = left {
            self.side_cell(cell, x0, top, rows);
        }
        if let Some(cell) = right {
            self.side_cell(cell, right_x, top, rows);
        }
    }

    /// One cell of a side-by-side row; backgrounds span all `rows` so both
    /// sides stay level.
    fn side_cell(&mut self, cell: &SideCell, x: f32, top: f32, rows: usize) {
        let columns = self.layout.columns;
        let (line_h, fs) = (self.line_h(), self.size());
        let (bg, fg, bar) = line_colors(self.theme, cell.kind);

        for j in 0..rows {
            let row_top = top + j as f32 * line_h;
            self.fill_rect(x, row_top, columns.column_width, line_h, bg);
            if let Some(bar) = bar {
                self.fill_rect(x, row_top, CHANGE_BAR, line_h, bar);
            }
            if let (0, Some(n)) = (j, cell.line_no) {
                self.gutter_number(x, row_top + fs, n);
            }
            if let Some(text) = cell.rows.get(j) {
                self.text(x + columns.text_offset, row_top + fs, text, TextStyle::mono(fs), fg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diffpress_core::ViewMode;
    use diffpress_layout::{FixedAdvance, layout_document};

    const SAMPLE: &str = "diff --git a/f.py b/f.py\n--- a/f.py\n+++ b/f.py\n@@ -1,2 +1,3 @@ def main():\n context\n-old\n+new1\n+new2\n";

    fn layout_for(config: &RenderConfig) -> DocumentLayout {
        let files = diffpress_diff::parse_unified_diff(SAMPLE);
        layout_document(&files, &FixedAdvance::COURIER, config)
    }

    #[test]
    fn renders_a_pdf() {
        let config = RenderConfig::default();
        let writer = PdfWriter::from_config(&config);
        let bytes = writer.render(&layout_for(&config), &FontSet::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn empty_layout_still_has_one_page() {
        let config = RenderConfig::default();
        let layout = layout_document(&[], &FixedAdvance::COURIER, &config);
        assert_eq!(layout.page_count(), 0);
        let bytes = PdfWriter::from_config(&config)
            .render(&layout, &FontSet::default())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn dangling_block_reference_is_an_error() {
        let config = RenderConfig::default();
        let mut layout = layout_for(&config);
        layout.pages[0].blocks[0].block = 999;
        let err = PdfWriter::from_config(&config)
            .render(&layout, &FontSet::default())
            .unwrap_err();
        assert!(matches!(err, DiffpressError::PdfError(_)));
    }

    #[test]
    fn side_by_side_renders() {
        let config = RenderConfig {
            view: ViewMode::SideBySide,
            theme: diffpress_core::ThemeKind::Dark,
            ..RenderConfig::default()
        };
        let bytes = PdfWriter::from_config(&config)
            .render(&layout_for(&config), &FontSet::default())
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn canvas_flips_into_pdf_space() {
        let config = RenderConfig::default();
        let layout = layout_for(&config);
        let fonts = FontSet::default();
        let handles = fonts.register(&mut PdfDocument::new("t"));
        let canvas = Canvas::new(&layout, &fonts, &handles, &Theme::LIGHT);
        let Pt(y) = canvas.flip(100.0);
        assert!((y - (layout.geometry.height - 100.0)).abs() < 1e-3);
    }

    #[test]
    fn blank_rows_emit_no_text() {
        let config = RenderConfig::default();
        let layout = layout_for(&config);
        let fonts = FontSet::default();
        let handles = fonts.register(&mut PdfDocument::new("t"));
        let mut canvas = Canvas::new(&layout, &fonts, &handles, &Theme::LIGHT);
        canvas.text(0.0, 0.0, "", TextStyle::mono(9.5), Theme::LIGHT.ui_text);
        assert!(canvas.ops.is_empty());
        canvas.unified_line(LineKind::Addition, Some(3), &["x".to_string()], 0.0);
        let texts = canvas
            .ops
            .iter()
            .filter(|op| matches!(op, Op::WriteTextBuiltinFont { .. }))
            .count();
        // Line number and content.
        assert_eq!(texts, 2);
    }
}
