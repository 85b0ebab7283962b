// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Colour palettes for rendered diffs.

use serde::{Deserialize, Serialize};

use crate::types::ThemeKind;

/// An RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    /// Build from 8-bit channel values.
    pub const fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }
}

/// Every colour the renderer needs, grouped by role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub ui_text: Rgb,
    pub ui_subtle: Rgb,
    pub header_line: Rgb,

    pub bg_added: Rgb,
    pub bg_removed: Rgb,
    pub bg_context: Rgb,
    pub bg_hunk: Rgb,

    pub tx_added: Rgb,
    pub tx_removed: Rgb,
    pub tx_context: Rgb,
    pub tx_hunk: Rgb,

    pub bar_added: Rgb,
    pub bar_removed: Rgb,
}

impl Theme {
    pub const LIGHT: Theme = Theme {
        ui_text: Rgb::from_u8(40, 40, 40),
        ui_subtle: Rgb::from_u8(125, 125, 125),
        header_line: Rgb::from_u8(210, 210, 210),
        bg_added: Rgb::from_u8(225, 245, 234),
        bg_removed: Rgb::from_u8(252, 232, 232),
        bg_context: Rgb::from_u8(247, 247, 249),
        bg_hunk: Rgb::from_u8(232, 240, 252),
        tx_added: Rgb::from_u8(22, 125, 57),
        tx_removed: Rgb::from_u8(178, 36, 30),
        tx_context: Rgb::from_u8(60, 60, 60),
        tx_hunk: Rgb::from_u8(30, 90, 200),
        bar_added: Rgb::from_u8(34, 170, 84),
        bar_removed: Rgb::from_u8(220, 64, 52),
    };

    pub const DARK: Theme = Theme {
        ui_text: Rgb::from_u8(230, 230, 230),
        ui_subtle: Rgb::from_u8(170, 170, 170),
        header_line: Rgb::from_u8(80, 80, 80),
        bg_added: Rgb::from_u8(36, 64, 52),
        bg_removed: Rgb::from_u8(72, 40, 40),
        bg_context: Rgb::from_u8(36, 36, 40),
        bg_hunk: Rgb::from_u8(44, 60, 84),
        tx_added: Rgb::from_u8(170, 235, 190),
        tx_removed: Rgb::from_u8(255, 170, 170),
        tx_context: Rgb::from_u8(230, 230, 230),
        tx_hunk: Rgb::from_u8(160, 190, 255),
        bar_added: Rgb::from_u8(60, 200, 110),
        bar_removed: Rgb::from_u8(240, 90, 80),
    };

    pub fn for_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Light => Self::LIGHT,
            ThemeKind::Dark => Self::DARK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channels_are_normalised() {
        let c = Rgb::from_u8(255, 0, 51);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 0.2).abs() < 1e-6);
    }

    #[test]
    fn dark_theme_inverts_text_contrast() {
        let light = Theme::for_kind(ThemeKind::Light);
        let dark = Theme::for_kind(ThemeKind::Dark);
        assert!(light.ui_text.r < 0.5);
        assert!(dark.ui_text.r > 0.5);
    }
}
