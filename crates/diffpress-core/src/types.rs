// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Diffpress: the parsed diff model and the page
// settings the layout engine works against.

use serde::{Deserialize, Serialize};

/// Classification of a single line inside a hunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineKind {
    /// Unchanged line, present on both sides.
    Context,
    /// Line introduced by the new side (`+`).
    Addition,
    /// Line removed from the old side (`-`).
    Deletion,
}

impl LineKind {
    /// Whether this line occupies a slot on the old side of the hunk.
    pub fn on_old_side(&self) -> bool {
        matches!(self, Self::Context | Self::Deletion)
    }

    /// Whether this line occupies a slot on the new side of the hunk.
    pub fn on_new_side(&self) -> bool {
        matches!(self, Self::Context | Self::Addition)
    }
}

/// One line of a hunk with its resolved line numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    pub kind: LineKind,
    /// Sanitized text after the diff marker. Tabs are not expanded yet.
    pub content: String,
    /// Present for context and deletion lines.
    pub old_line_no: Option<u32>,
    /// Present for context and addition lines.
    pub new_line_no: Option<u32>,
    /// Set when a `\ No newline at end of file` marker followed this line.
    pub no_newline: bool,
}

impl DiffLine {
    pub fn new(kind: LineKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
            old_line_no: None,
            new_line_no: None,
            no_newline: false,
        }
    }

    /// The number shown in a unified gutter: new side for additions, old
    /// side for everything else.
    pub fn display_line_no(&self) -> Option<u32> {
        match self.kind {
            LineKind::Addition => self.new_line_no,
            LineKind::Context | LineKind::Deletion => self.old_line_no,
        }
    }
}

/// A contiguous `@@ -a,b +c,d @@` section of a file diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// Normalised header, e.g. `@@ -1,2 +1,3 @@`.
    pub header: String,
    /// Function/section context that followed the closing `@@`, if any.
    pub section: Option<String>,
    pub old_start: u32,
    pub old_count: u32,
    pub new_start: u32,
    pub new_count: u32,
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// Number of lines that carry an old-side line number.
    pub fn old_side_lines(&self) -> usize {
        self.lines.iter().filter(|l| l.old_line_no.is_some()).count()
    }

    /// Number of lines that carry a new-side line number.
    pub fn new_side_lines(&self) -> usize {
        self.lines.iter().filter(|l| l.new_line_no.is_some()).count()
    }

    /// True when the body agrees with the counts declared in the header.
    pub fn counts_match(&self) -> bool {
        self.old_side_lines() == self.old_count as usize
            && self.new_side_lines() == self.new_count as usize
    }
}

/// All hunks for one file. Paths differ for renames.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDiff {
    pub old_path: String,
    pub new_path: String,
    pub hunks: Vec<Hunk>,
}

impl FileDiff {
    /// Label used on the file badge.
    pub fn label(&self) -> &str {
        if !self.new_path.is_empty() {
            &self.new_path
        } else if !self.old_path.is_empty() {
            &self.old_path
        } else {
            "(Unnamed)"
        }
    }

    /// True when old and new paths differ and both are known.
    pub fn is_rename(&self) -> bool {
        !self.old_path.is_empty() && !self.new_path.is_empty() && self.old_path != self.new_path
    }
}

/// Diff presentation mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    /// Interleaved `-`/`+` rows in a single column.
    #[default]
    Unified,
    /// Old side on the left, new side on the right.
    SideBySide,
}

/// Colour scheme selector. The palettes live in [`crate::theme`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Light,
    Dark,
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: u32, height_mm: u32 },
}

/// Points per millimetre (72 pt per inch, 25.4 mm per inch).
const PT_PER_MM: f32 = 72.0 / 25.4;

/// Shortest side a custom paper may have. Anything smaller leaves no room
/// for the margins and the page header in one orientation or the other.
pub const MIN_PAPER_SIDE_MM: u32 = 100;

impl PaperSize {
    /// Dimensions in millimetres (width, height), portrait.
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Tabloid => (279, 432),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Dimensions in points (width, height) for the given orientation.
    pub fn dimensions_pt(&self, orientation: Orientation) -> (f32, f32) {
        let (w_mm, h_mm) = self.dimensions_mm();
        let (w, h) = (w_mm as f32 * PT_PER_MM, h_mm as f32 * PT_PER_MM);
        match orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Page orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}
