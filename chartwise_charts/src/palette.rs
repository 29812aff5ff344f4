// Copyright 2026 the Chartwise Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Series colors and legend entries.

extern crate alloc;

use alloc::format;
use alloc::string::String;

use peniko::Color;

/// Default categorical palette for series and pie slices.
///
/// Colors repeat when there are more series (or slices) than entries.
pub const SERIES_PALETTE: [Color; 6] = [
    Color::from_rgb8(0x63, 0x66, 0xf1),
    Color::from_rgb8(0x8b, 0x5c, 0xf6),
    Color::from_rgb8(0xd9, 0x46, 0xef),
    Color::from_rgb8(0x06, 0xb6, 0xd4),
    Color::from_rgb8(0x10, 0xb9, 0x81),
    Color::from_rgb8(0xf5, 0x9e, 0x0b),
];

/// Returns the palette color for a series or slice index.
pub fn palette_color(index: usize) -> Color {
    SERIES_PALETTE[index % SERIES_PALETTE.len()]
}

/// Formats a color as a CSS hex string (`#rrggbb`, or `#rrggbbaa` when translucent).
pub fn to_hex(color: Color) -> String {
    let c = color.to_rgba8();
    if c.a == u8::MAX {
        format!("#{:02x}{:02x}{:02x}", c.r, c.g, c.b)
    } else {
        format!("#{:02x}{:02x}{:02x}{:02x}", c.r, c.g, c.b, c.a)
    }
}

/// A legend entry: a label and its swatch color.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendItem {
    /// Label text.
    pub label: String,
    /// Swatch color.
    pub fill: Color,
}
