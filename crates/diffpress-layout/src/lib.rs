// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// diffpress-layout — Measurement, block building, and pagination.
//
// Takes the parsed diff model and decides where every row goes: text is
// measured through the `TextMeasure` seam, wrapped to the column width,
// grouped into blocks, and distributed over fixed-size pages under
// keep-together and widow rules. Nothing here draws.

pub mod blocks;
pub mod geometry;
pub mod measure;
pub mod paginate;
pub mod wrap;

pub use blocks::{Block, BlockBuilder, BlockContent, BlockKind, GroupLine, LineContent, SideCell};
pub use geometry::{Columns, PageGeometry, Spacing};
pub use measure::{FixedAdvance, FontRole, TextMeasure, TextStyle};
pub use paginate::{Page, PaginationPolicy, PlacedBlock, paginate};
pub use wrap::{expand_tabs, wrap_text};

use diffpress_core::{FileDiff, RenderConfig};
use tracing::{info, instrument};

/// Everything the renderer needs to draw a document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub geometry: PageGeometry,
    pub columns: Columns,
    pub font_size: f32,
    pub blocks: Vec<Block>,
    pub pages: Vec<Page>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

impl PaginationPolicy {
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            view: config.view,
            min_lines_after_header: config.min_lines_after_header,
            keep_hunks_together: config.keep_hunks_together,
        }
    }
}

/// Measure, build, and paginate `files` in one pass.
#[instrument(skip_all, fields(files = files.len()))]
pub fn layout_document<M: TextMeasure + ?Sized>(
    files: &[FileDiff],
    measure: &M,
    config: &RenderConfig,
) -> DocumentLayout {
    let geometry = PageGeometry::from_config(config);
    let builder = BlockBuilder::new(measure, &geometry, config);
    let blocks = builder.build(files);
    let pages = paginate(
        &blocks,
        geometry.capacity(),
        PaginationPolicy::from_config(config),
    );
    info!(
        blocks = blocks.len(),
        pages = pages.len(),
        view = ?config.view,
        "Layout complete"
    );
    DocumentLayout {
        geometry,
        columns: builder.columns(),
        font_size: config.font_size,
        blocks,
        pages,
    }
}
