// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// diffpress-document — Font resolution, PDF output, and Word output for
// Diffpress.
//
// Resolves the four document faces (never failing, always ending at built-in
// Courier), measures text for the layout engine, draws paginated layouts with
// printpdf, and writes the same blocks as a Word document with docx-rs.

pub mod docx;
pub mod fonts;
pub mod pdf;

pub use docx::writer::DocxWriter;
pub use fonts::{FaceSource, FontSet};
pub use pdf::writer::PdfWriter;
