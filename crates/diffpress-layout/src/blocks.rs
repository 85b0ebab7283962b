// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Block builder: turns the parsed diff model into measured, renderable blocks.
//
// Every file yields a FileBadge, then per hunk a HunkHeader and (when the hunk
// has visible lines) one LineGroup. Heights are computed here, once, through
// the `TextMeasure` seam; pagination only ever reads them.

use diffpress_core::{FileDiff, Hunk, LineKind, RenderConfig, ViewMode};
use tracing::{debug, instrument};

use crate::geometry::{Columns, PageGeometry, Spacing};
use crate::measure::{TextMeasure, TextStyle};
use crate::wrap::{expand_tabs, wrap_text};

/// Discriminant of [`BlockContent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    FileBadge,
    HunkHeader,
    LineGroup,
}

/// One side of a side-by-side row.
#[derive(Debug, Clone, PartialEq)]
pub struct SideCell {
    pub kind: LineKind,
    /// Old number on the left side, new number on the right side.
    pub line_no: Option<u32>,
    /// Wrapped visual rows, tabs already expanded.
    pub rows: Vec<String>,
}

/// Content of one logical diff line.
#[derive(Debug, Clone, PartialEq)]
pub enum LineContent {
    Unified {
        kind: LineKind,
        line_no: Option<u32>,
        rows: Vec<String>,
    },
    /// A missing side is drawn as a blank cell.
    SideBySide {
        left: Option<SideCell>,
        right: Option<SideCell>,
    },
}

/// A logical line inside a LineGroup. Never split across pages.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupLine {
    pub content: LineContent,
    pub height: f32,
}

impl GroupLine {
    /// Number of visual rows this line occupies.
    pub fn row_count(&self) -> usize {
        match &self.content {
            LineContent::Unified { rows, .. } => rows.len(),
            LineContent::SideBySide { left, right } => {
                let l = left.as_ref().map_or(1, |c| c.rows.len());
                let r = right.as_ref().map_or(1, |c| c.rows.len());
                l.max(r)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BlockContent {
    FileBadge {
        label: String,
    },
    /// The bar with the normalised `@@` header, followed by any wrapped
    /// section text.
    HunkHeader {
        header: String,
        section_rows: Vec<String>,
    },
    LineGroup {
        lines: Vec<GroupLine>,
    },
}

/// A measured, renderable unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub content: BlockContent,
    /// Index of the owning file in the input sequence.
    pub file_index: usize,
    /// Index of the owning hunk within its file; `None` for badges.
    pub hunk_index: Option<usize>,
    /// Drawn height in points.
    pub height: f32,
    /// Whitespace that follows the block on the same page.
    pub gap_after: f32,
}

impl Block {
    pub fn kind(&self) -> BlockKind {
        match self.content {
            BlockContent::FileBadge { .. } => BlockKind::FileBadge,
            BlockContent::HunkHeader { .. } => BlockKind::HunkHeader,
            BlockContent::LineGroup { .. } => BlockKind::LineGroup,
        }
    }

    /// Badges and headers are never split; line groups split between lines.
    pub fn is_atomic(&self) -> bool {
        !matches!(self.content, BlockContent::LineGroup { .. })
    }

    pub fn total_height(&self) -> f32 {
        self.height + self.gap_after
    }

    /// Logical lines of a LineGroup; empty for other kinds.
    pub fn lines(&self) -> &[GroupLine] {
        match &self.content {
            BlockContent::LineGroup { lines } => lines,
            _ => &[],
        }
    }
}

/// Measures diff content into [`Block`]s for one view mode.
pub struct BlockBuilder<'a, M: TextMeasure + ?Sized> {
    measure: &'a M,
    spacing: Spacing,
    columns: Columns,
    /// Wrapping width for section rows, which span the whole content box.
    full_text_width: f32,
    font_size: f32,
    tab_size: usize,
    view: ViewMode,
    hide_context: bool,
}

impl<'a, M: TextMeasure + ?Sized> BlockBuilder<'a, M> {
    pub fn new(measure: &'a M, geometry: &PageGeometry, config: &RenderConfig) -> Self {
        let columns = Columns::compute(measure, geometry, config.font_size, config.view);
        let full_text_width = if config.view == ViewMode::Unified {
            columns.text_width
        } else {
            Columns::compute(measure, geometry, config.font_size, ViewMode::Unified).text_width
        };
        Self {
            measure,
            spacing: geometry.spacing,
            columns,
            full_text_width,
            font_size: config.font_size,
            tab_size: config.tab_size,
            view: config.view,
            hide_context: config.hide_context,
        }
    }

    pub fn columns(&self) -> Columns {
        self.columns
    }

    fn mono(&self) -> TextStyle {
        TextStyle::mono(self.font_size)
    }

    fn row_height(&self) -> f32 {
        self.measure.line_height(self.mono())
    }

    fn wrap(&self, text: &str, width: f32) -> Vec<String> {
        wrap_text(&expand_tabs(text, self.tab_size), width, self.measure, self.mono())
    }

    /// Build the block sequence for every file, in input order.
    #[instrument(skip_all, fields(files = files.len(), view = ?self.view))]
    pub fn build(&self, files: &[FileDiff]) -> Vec<Block> {
        let mut blocks = Vec::new();
        for (file_index, file) in files.iter().enumerate() {
            self.build_file(file_index, file, &mut blocks);
        }
        debug!(blocks = blocks.len(), "Blocks measured");
        blocks
    }

    fn build_file(&self, file_index: usize, file: &FileDiff, out: &mut Vec<Block>) {
        let badge_style = TextStyle::ui_bold(self.font_size);
        out.push(Block {
            content: BlockContent::FileBadge {
                label: file.label().to_string(),
            },
            file_index,
            hunk_index: None,
            height: self.measure.line_height(badge_style),
            gap_after: self.spacing.gap_badge_to_hunk,
        });

        for (hunk_index, hunk) in file.hunks.iter().enumerate() {
            self.build_hunk(file_index, hunk_index, hunk, out);
        }

        // Every file ends with one extra gap on top of its last hunk's.
        if let Some(last) = out.last_mut() {
            last.gap_after += self.spacing.block_gap;
        }
    }

    fn build_hunk(
        &self,
        file_index: usize,
        hunk_index: usize,
        hunk: &Hunk,
        out: &mut Vec<Block>,
    ) {
        let line_h = self.row_height();
        let section_rows = match hunk.section.as_deref() {
            Some(section) if !section.is_empty() => self.wrap(section, self.full_text_width),
            _ => Vec::new(),
        };
        let header_height =
            line_h + self.spacing.gap_hunk_to_code + section_rows.len() as f32 * line_h;

        let lines = match self.view {
            ViewMode::Unified => self.unified_lines(hunk),
            ViewMode::SideBySide => self.side_by_side_lines(hunk),
        };

        out.push(Block {
            content: BlockContent::HunkHeader {
                header: hunk.header.clone(),
                section_rows,
            },
            file_index,
            hunk_index: Some(hunk_index),
            height: header_height,
            gap_after: if lines.is_empty() {
                self.spacing.block_gap
            } else {
                0.0
            },
        });

        if lines.is_empty() {
            return;
        }
        let height = lines.iter().map(|l| l.height).sum();
        out.push(Block {
            content: BlockContent::LineGroup { lines },
            file_index,
            hunk_index: Some(hunk_index),
            height,
            gap_after: self.spacing.block_gap,
        });
    }

    fn unified_lines(&self, hunk: &Hunk) -> Vec<GroupLine> {
        let line_h = self.row_height();
        hunk.lines
            .iter()
            .filter(|line| !(self.hide_context && line.kind == LineKind::Context))
            .map(|line| {
                let rows = self.wrap(&line.content, self.columns.text_width);
                GroupLine {
                    height: rows.len() as f32 * line_h,
                    content: LineContent::Unified {
                        kind: line.kind,
                        line_no: line.display_line_no(),
                        rows,
                    },
                }
            })
            .collect()
    }

    /// Pair old and new lines into rows.
    ///
    /// Context lines fill both cells. A run of deletions and the run of
    /// additions right after it are paired by position; whichever run is
    /// longer continues with one-sided rows.
    fn side_by_side_lines(&self, hunk: &Hunk) -> Vec<GroupLine> {
        let mut rows = Vec::new();
        let lines = &hunk.lines;
        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];
            if line.kind == LineKind::Context {
                rows.push(self.side_row(
                    Some(self.cell(line.kind, line.old_line_no, &line.content)),
                    Some(self.cell(line.kind, line.new_line_no, &line.content)),
                ));
                i += 1;
                continue;
            }

            let del_start = i;
            while i < lines.len() && lines[i].kind == LineKind::Deletion {
                i += 1;
            }
            let add_start = i;
            while i < lines.len() && lines[i].kind == LineKind::Addition {
                i += 1;
            }
            let deletions = &lines[del_start..add_start];
            let additions = &lines[add_start..i];

            for k in 0..deletions.len().max(additions.len()) {
                let left = deletions
                    .get(k)
                    .map(|l| self.cell(l.kind, l.old_line_no, &l.content));
                let right = additions
                    .get(k)
                    .map(|l| self.cell(l.kind, l.new_line_no, &l.content));
                rows.push(self.side_row(left, right));
            }
        }
        rows
    }

    fn cell(&self, kind: LineKind, line_no: Option<u32>, content: &str) -> SideCell {
        SideCell {
            kind,
            line_no,
            rows: self.wrap(content, self.columns.text_width),
        }
    }

    fn side_row(&self, left: Option<SideCell>, right: Option<SideCell>) -> GroupLine {
        let mut line = GroupLine {
            content: LineContent::SideBySide { left, right },
            height: 0.0,
        };
        line.height = line.row_count() as f32 * self.row_height();
        line
    }
}
