// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Word module — the same diff blocks as flowing .docx tables.

pub mod writer;

pub use writer::DocxWriter;
