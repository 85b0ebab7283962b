// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text measurement seam.
//
// Layout never assumes a monospaced width. Every width and line height goes
// through `TextMeasure`, implemented by the font collaborator in
// `diffpress-document`. Implementations must be total: a font that cannot
// measure something falls back internally instead of failing.

/// Extra leading added to the font size to get a line height.
pub const DEFAULT_LINE_GAP: f32 = 2.2;

/// Which of the four document faces a piece of text uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontRole {
    /// File badges, page headers and footers.
    Ui,
    UiBold,
    /// Code, line numbers, and hunk headers.
    Mono,
    MonoBold,
}

/// A face role at a given size in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub role: FontRole,
    pub size: f32,
}

impl TextStyle {
    pub fn new(role: FontRole, size: f32) -> Self {
        Self { role, size }
    }

    pub fn mono(size: f32) -> Self {
        Self::new(FontRole::Mono, size)
    }

    pub fn ui_bold(size: f32) -> Self {
        Self::new(FontRole::UiBold, size)
    }
}

/// Width and height queries used by wrapping and block sizing.
pub trait TextMeasure {
    /// Advance width of `text` in points.
    fn text_width(&self, text: &str, style: TextStyle) -> f32;

    /// Height of one visual row in points.
    fn line_height(&self, style: TextStyle) -> f32;
}

impl<T: TextMeasure + ?Sized> TextMeasure for &T {
    fn text_width(&self, text: &str, style: TextStyle) -> f32 {
        (**self).text_width(text, style)
    }

    fn line_height(&self, style: TextStyle) -> f32 {
        (**self).line_height(style)
    }
}

/// Every character advances the same fraction of an em.
///
/// Exact for the built-in Courier faces (600/1000 em), which are the final
/// fallback of the font chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedAdvance {
    pub advance_em: f32,
    pub line_gap: f32,
}

impl FixedAdvance {
    /// Metrics of PDF base-14 Courier and Courier-Bold.
    pub const COURIER: FixedAdvance = FixedAdvance {
        advance_em: 0.6,
        line_gap: DEFAULT_LINE_GAP,
    };
}

impl TextMeasure for FixedAdvance {
    fn text_width(&self, text: &str, style: TextStyle) -> f32 {
        text.chars().count() as f32 * self.advance_em * style.size
    }

    fn line_height(&self, style: TextStyle) -> f32 {
        style.size + self.line_gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn courier_width_is_six_tenths_em_per_char() {
        let w = FixedAdvance::COURIER.text_width("abcde", TextStyle::mono(10.0));
        assert!((w - 30.0).abs() < 1e-4);
    }

    #[test]
    fn width_counts_chars_not_bytes() {
        let m = FixedAdvance::COURIER;
        let style = TextStyle::mono(10.0);
        assert_eq!(m.text_width("\u{e9}\u{e9}", style), m.text_width("ee", style));
    }

    #[test]
    fn line_height_adds_gap() {
        let h = FixedAdvance::COURIER.line_height(TextStyle::mono(9.5));
        assert!((h - 11.7).abs() < 1e-4);
    }
}
