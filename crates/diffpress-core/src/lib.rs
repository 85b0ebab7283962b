// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Diffpress — Core types and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod theme;
pub mod types;

pub use config::RenderConfig;
pub use error::DiffpressError;
pub use theme::Theme;
pub use types::*;
