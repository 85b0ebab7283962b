// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page geometry and column positions.
//
// Layout works top-down inside the content box: y = 0 is the first row under
// the page-header band, y = capacity is the bottom margin. The renderer flips
// into PDF coordinates.

use diffpress_core::{Orientation, PaperSize, RenderConfig, ViewMode};

use crate::measure::{TextMeasure, TextStyle};

/// Fixed spacing constants, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spacing {
    pub margin: f32,
    /// Band at the top of every page holding title and timestamp.
    pub header_band: f32,
    pub gap_badge_to_hunk: f32,
    pub gap_hunk_to_code: f32,
    /// Whitespace after every hunk and again after every file.
    pub block_gap: f32,
    /// Gap between the two side-by-side columns.
    pub col_gap: f32,
    /// Gap between the line-number gutter and the code.
    pub gutter_gap: f32,
    /// Digits reserved for line numbers.
    pub gutter_chars: usize,
    /// Narrowest text column ever used for wrapping.
    pub min_text_width: f32,
}

impl Default for Spacing {
    fn default() -> Self {
        Self {
            margin: 44.0,
            header_band: 28.0,
            gap_badge_to_hunk: 2.0,
            gap_hunk_to_code: 4.0,
            block_gap: 6.0,
            col_gap: 16.0,
            gutter_gap: 6.0,
            gutter_chars: 5,
            min_text_width: 12.0,
        }
    }
}

/// Page size plus spacing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub spacing: Spacing,
}

impl PageGeometry {
    pub fn new(paper: PaperSize, orientation: Orientation, spacing: Spacing) -> Self {
        let (width, height) = paper.dimensions_pt(orientation);
        Self {
            width,
            height,
            spacing,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(config.paper_size, config.orientation(), Spacing::default())
    }

    pub fn content_left(&self) -> f32 {
        self.spacing.margin
    }

    pub fn content_right(&self) -> f32 {
        self.width - self.spacing.margin
    }

    pub fn content_width(&self) -> f32 {
        self.content_right() - self.content_left()
    }

    /// Distance from the top edge of the page to layout y = 0.
    pub fn content_top(&self) -> f32 {
        self.spacing.margin + self.spacing.header_band
    }

    /// Usable vertical space per page.
    pub fn capacity(&self) -> f32 {
        self.height - 2.0 * self.spacing.margin - self.spacing.header_band
    }
}

/// Horizontal positions for code rows, relative to the content box's left
/// edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Columns {
    pub view: ViewMode,
    /// Width of the line-number gutter text (`99999 `).
    pub gutter_width: f32,
    /// Width of one column: the whole content box for unified, half of it
    /// minus the gap for side-by-side.
    pub column_width: f32,
    /// Offset of the right column (side-by-side only).
    pub right_column_x: f32,
    /// Offset of the code text within a column.
    pub text_offset: f32,
    /// Wrapping width for code text within a column.
    pub text_width: f32,
}

impl Columns {
    pub fn compute<M: TextMeasure + ?Sized>(
        measure: &M,
        geometry: &PageGeometry,
        font_size: f32,
        view: ViewMode,
    ) -> Self {
        let spacing = geometry.spacing;
        let sample = format!("{} ", "9".repeat(spacing.gutter_chars));
        let gutter_width = measure.text_width(&sample, TextStyle::mono(font_size));
        let text_offset = gutter_width + spacing.gutter_gap;

        let (column_width, right_column_x) = match view {
            ViewMode::Unified => (geometry.content_width(), 0.0),
            ViewMode::SideBySide => {
                let col = (geometry.content_width() - spacing.col_gap) / 2.0;
                (col, col + spacing.col_gap)
            }
        };

        Self {
            view,
            gutter_width,
            column_width,
            right_column_x,
            text_offset,
            text_width: (column_width - text_offset).max(spacing.min_text_width),
        }
    }
}
