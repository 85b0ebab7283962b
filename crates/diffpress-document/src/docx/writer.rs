// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Word writer — writes the measured diff blocks as a .docx using `docx-rs`.
//
// Word paginates on its own, so only the block sequence is used: every block
// becomes a borderless table (badge, hunk header, one row per logical line).
// Rows wrapped by the layout engine stay together in one cell, separated by
// soft line breaks.

use std::io::Cursor;
use std::path::Path;

use diffpress_core::error::{DiffpressError, Result};
use diffpress_core::theme::Rgb;
use diffpress_core::{LineKind, RenderConfig, Theme};
use diffpress_layout::{Block, BlockContent, DocumentLayout, GroupLine, LineContent, SideCell};
use docx_rs::{
    BreakType, Docx, LineSpacing, PageMargin, Paragraph, Run, RunFonts, Shading, Table,
    TableBorders, TableCell, TableRow, WidthType,
};
use tracing::{debug, info, instrument};

const MONO_FACE: &str = "Consolas";
const UI_FACE: &str = "Calibri";

/// `RRGGBB` as used by WordprocessingML colour attributes.
fn hex(c: Rgb) -> String {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("{:02X}{:02X}{:02X}", channel(c.r), channel(c.g), channel(c.b))
}

/// Points to twentieths of a point.
fn twips(pt: f32) -> usize {
    (pt.max(0.0) * 20.0).round() as usize
}

/// Points to the half-point unit used for font sizes.
fn half_points(pt: f32) -> usize {
    (pt.max(1.0) * 2.0).round() as usize
}

/// Background and text colour for a line kind.
fn line_colors(theme: &Theme, kind: LineKind) -> (Rgb, Rgb) {
    match kind {
        LineKind::Addition => (theme.bg_added, theme.tx_added),
        LineKind::Deletion => (theme.bg_removed, theme.tx_removed),
        LineKind::Context => (theme.bg_context, theme.tx_context),
    }
}

/// Writes a [`DocumentLayout`]'s blocks into .docx bytes.
pub struct DocxWriter {
    title: String,
    theme: Theme,
    /// Printed under the title as `Generated: ...`.
    timestamp: String,
}

impl DocxWriter {
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

    /// Override the generation timestamp.
    pub fn set_timestamp(&mut self, timestamp: impl Into<String>) {
        self.timestamp = timestamp.into();
    }

    #[instrument(skip_all, fields(blocks = layout.blocks.len(), title = %self.title))]
    pub fn render(&self, layout: &DocumentLayout) -> Result<Vec<u8>> {
        let sheet = Sheet::new(layout, &self.theme);
        let geometry = &layout.geometry;
        let margin = twips(geometry.spacing.margin) as i32;
        let fs = layout.font_size;

        let mut docx = Docx::new()
            .page_size(twips(geometry.width) as u32, twips(geometry.height) as u32)
            .page_margin(
                PageMargin::new()
                    .top(margin)
                    .bottom(margin)
                    .left(margin)
                    .right(margin),
            )
            .add_paragraph(Paragraph::new().add_run(sheet.run(
                &self.title,
                UI_FACE,
                fs + 4.0,
                self.theme.ui_text,
                true,
            )))
            .add_paragraph(Paragraph::new().add_run(sheet.run(
                &format!("Generated: {}", self.timestamp),
                UI_FACE,
                (fs - 1.0).max(1.0),
                self.theme.ui_subtle,
                false,
            )))
            .add_paragraph(Paragraph::new());

        for (index, block) in layout.blocks.iter().enumerate() {
            docx = docx.add_table(sheet.block(block));
            let file_ends = layout
                .blocks
                .get(index + 1)
                .is_none_or(|next| next.file_index != block.file_index);
            if file_ends {
                docx = docx.add_paragraph(Paragraph::new());
            }
        }

        let mut out = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut out)
            .map_err(|e| DiffpressError::DocxError(e.to_string()))?;
        let bytes = out.into_inner();
        debug!(bytes = bytes.len(), "DOCX serialised");
        Ok(bytes)
    }

    pub fn write_to_file(&self, layout: &DocumentLayout, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.render(layout)?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!("Wrote Word document to {}", path.as_ref().display());
        Ok(())
    }
}

// -- Tables -------------------------------------------------------------------

/// Builds tables for one layout.
struct Sheet<'a> {
    layout: &'a DocumentLayout,
    theme: &'a Theme,
}

impl<'a> Sheet<'a> {
    fn new(layout: &'a DocumentLayout, theme: &'a Theme) -> Self {
        Self { layout, theme }
    }

    fn size(&self) -> f32 {
        self.layout.font_size
    }

    fn content_width(&self) -> usize {
        twips(self.layout.geometry.content_width())
    }

    fn run(&self, text: &str, face: &str, size: f32, color: Rgb, bold: bool) -> Run {
        let run = Run::new()
            .add_text(text)
            .fonts(RunFonts::new().ascii(face).hi_ansi(face))
            .size(half_points(size))
            .color(hex(color));
        if bold { run.bold() } else { run }
    }

    fn paragraph(&self) -> Paragraph {
        Paragraph::new().line_spacing(LineSpacing::new().before(0).after(0))
    }

    fn cell(&self, paragraph: Paragraph, bg: Rgb, width: usize) -> TableCell {
        TableCell::new()
            .add_paragraph(paragraph)
            .shading(Shading::new().fill(hex(bg)))
            .width(width, WidthType::Dxa)
    }

    fn table(&self, rows: Vec<TableRow>, columns: usize) -> Table {
        let total = self.content_width();
        let column = total / columns.max(1);
        Table::new(rows)
            .set_grid(vec![column; columns.max(1)])
            .width(total, WidthType::Dxa)
            .set_borders(TableBorders::with_empty())
    }

    fn block(&self, block: &Block) -> Table {
        match &block.content {
            BlockContent::FileBadge { label } => self.file_badge(label),
            BlockContent::HunkHeader {
                header,
                section_rows,
            } => self.hunk_header(header, section_rows),
            BlockContent::LineGroup { lines } => self.line_group(lines),
        }
    }

    fn file_badge(&self, label: &str) -> Table {
        let theme = self.theme;
        let text = self.run(label, UI_FACE, self.size(), theme.tx_hunk, true);
        let cell = self.cell(self.paragraph().add_run(text), theme.bg_hunk, self.content_width());
        self.table(vec![TableRow::new(vec![cell])], 1)
    }

    fn hunk_header(&self, header: &str, section_rows: &[String]) -> Table {
        let theme = self.theme;
        let width = self.content_width();
        let bar = self.run(header, MONO_FACE, self.size(), theme.tx_hunk, false);
        let mut rows = vec![TableRow::new(vec![self.cell(
            self.paragraph().add_run(bar),
            theme.bg_hunk,
            width,
        )])];
        if !section_rows.is_empty() {
            let section = self.wrapped(self.paragraph(), section_rows, theme.tx_added);
            rows.push(TableRow::new(vec![self.cell(section, theme.bg_added, width)]));
        }
        self.table(rows, 1)
    }

    fn line_group(&self, lines: &[GroupLine]) -> Table {
        let columns = match lines.first().map(|l| &l.content) {
            Some(LineContent::SideBySide { .. }) => 2,
            _ => 1,
        };
        let rows = lines
            .iter()
            .map(|line| match &line.content {
                LineContent::Unified {
                    kind,
                    line_no,
                    rows,
                } => TableRow::new(vec![self.unified_cell(*kind, *line_no, rows)]),
                LineContent::SideBySide { left, right } => TableRow::new(vec![
                    self.side_cell(left.as_ref()),
                    self.side_cell(right.as_ref()),
                ]),
            })
            .collect();
        self.table(rows, columns)
    }

    /// `    12  ` for numbered rows, blanks of the same width otherwise.
    fn gutter(&self, line_no: Option<u32>) -> String {
        let digits = self.layout.geometry.spacing.gutter_chars;
        match line_no {
            Some(n) => format!("{n:>digits$}  "),
            None => " ".repeat(digits + 2),
        }
    }

    /// Visual rows joined by soft breaks; only the first carries a number.
    fn numbered(&self, line_no: Option<u32>, rows: &[String], color: Rgb) -> Paragraph {
        let mut paragraph = self.paragraph();
        for (j, row) in rows.iter().enumerate() {
            if j > 0 {
                paragraph = paragraph.add_run(Run::new().add_break(BreakType::TextWrapping));
            }
            let number = if j == 0 { line_no } else { None };
            paragraph = paragraph
                .add_run(self.run(
                    &self.gutter(number),
                    MONO_FACE,
                    self.size(),
                    self.theme.ui_subtle,
                    false,
                ))
                .add_run(self.run(row, MONO_FACE, self.size(), color, false));
        }
        paragraph
    }

    fn wrapped(&self, mut paragraph: Paragraph, rows: &[String], color: Rgb) -> Paragraph {
        for (j, row) in rows.iter().enumerate() {
            if j > 0 {
                paragraph = paragraph.add_run(Run::new().add_break(BreakType::TextWrapping));
            }
            paragraph = paragraph.add_run(self.run(row, MONO_FACE, self.size(), color, false));
        }
        paragraph
    }

    fn unified_cell(&self, kind: LineKind, line_no: Option<u32>, rows: &[String]) -> TableCell {
        let (bg, fg) = line_colors(self.theme, kind);
        self.cell(self.numbered(line_no, rows, fg), bg, self.content_width())
    }

    /// A missing side is an empty context-coloured cell.
    fn side_cell(&self, cell: Option<&SideCell>) -> TableCell {
        let width = self.content_width() / 2;
        match cell {
            Some(cell) => {
                let (bg, fg) = line_colors(self.theme, cell.kind);
                self.cell(self.numbered(cell.line_no, &cell.rows, fg), bg, width)
            }
            None => self.cell(self.paragraph(), self.theme.bg_context, width),
        }
    }
}
