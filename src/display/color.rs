/*
 *  display/color.rs
 *
 *  inkstat - meeting room status on e-paper
 *  (c) 2020-26 Stuart Hunter
 *
 *  Three colour e-paper palette
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use clap::ValueEnum;
use embedded_graphics::pixelcolor::raw::{RawData, RawU2};
use embedded_graphics::pixelcolor::PixelColor;
use inkstat_driver_inky::{Ink, Variant};
use serde::{Deserialize, Serialize};

/// Palette of the tri-colour panel
///
/// The discriminants match the panel palette indices (white 0, black 1,
/// accent 2) so a 2-bit raw value round-trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InkyColor {
    White = 0,
    Black = 1,
    /// Red or yellow depending on the panel, black on black/white panels
    Accent = 2,
}

impl PixelColor for InkyColor {
    type Raw = RawU2;
}

impl From<RawU2> for InkyColor {
    fn from(raw: RawU2) -> Self {
        match raw.into_inner() {
            0 => InkyColor::White,
            1 => InkyColor::Black,
            _ => InkyColor::Accent,
        }
    }
}

impl From<InkyColor> for RawU2 {
    fn from(color: InkyColor) -> Self {
        RawU2::new(color as u8)
    }
}

impl From<InkyColor> for Ink {
    fn from(color: InkyColor) -> Self {
        match color {
            InkyColor::White => Ink::White,
            InkyColor::Black => Ink::Black,
            InkyColor::Accent => Ink::Accent,
        }
    }
}

/// RGB used when authoring assets
pub const RGB_WHITE: [u8; 3] = [255, 255, 255];
pub const RGB_BLACK: [u8; 3] = [0, 0, 0];
pub const RGB_RED: [u8; 3] = [255, 0, 0];
pub const RGB_YELLOW: [u8; 3] = [255, 255, 0];

impl InkyColor {
    /// Exact palette match for an RGBA source pixel.
    ///
    /// Fully transparent pixels and any RGB outside the authoring palette
    /// (e.g. a magenta "transparent" sentinel) do not classify.
    pub fn from_rgba(rgba: [u8; 4]) -> Option<Self> {
        if rgba[3] == 0 {
            return None;
        }
        match [rgba[0], rgba[1], rgba[2]] {
            RGB_WHITE => Some(InkyColor::White),
            RGB_BLACK => Some(InkyColor::Black),
            RGB_RED | RGB_YELLOW => Some(InkyColor::Accent),
            _ => None,
        }
    }

    /// Closest palette entry by squared RGB distance, used for backgrounds.
    pub fn nearest(rgb: [u8; 3]) -> Self {
        let candidates = [
            (InkyColor::White, RGB_WHITE),
            (InkyColor::Black, RGB_BLACK),
            (InkyColor::Accent, RGB_RED),
            (InkyColor::Accent, RGB_YELLOW),
        ];
        let dist = |p: [u8; 3]| -> u32 {
            (0..3)
                .map(|i| {
                    let d = rgb[i] as i32 - p[i] as i32;
                    (d * d) as u32
                })
                .sum()
        };
        candidates
            .iter()
            .min_by_key(|(_, p)| dist(*p))
            .map(|(c, _)| *c)
            .unwrap_or(InkyColor::White)
    }

    /// RGB as it appears on a given panel.
    pub fn to_rgb(&self, panel: PanelColour) -> [u8; 3] {
        match self {
            InkyColor::White => RGB_WHITE,
            InkyColor::Black => RGB_BLACK,
            InkyColor::Accent => panel.accent_rgb(),
        }
    }
}

/// Panel hardware variant (the third pigment)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PanelColour {
    Red,
    Yellow,
    #[default]
    Black,
}

impl PanelColour {
    pub fn accent_rgb(&self) -> [u8; 3] {
        match self {
            PanelColour::Red => RGB_RED,
            PanelColour::Yellow => RGB_YELLOW,
            PanelColour::Black => RGB_BLACK,
        }
    }
}

impl From<PanelColour> for Variant {
    fn from(colour: PanelColour) -> Self {
        match colour {
            PanelColour::Red => Variant::Red,
            PanelColour::Yellow => Variant::Yellow,
            PanelColour::Black => Variant::Black,
        }
    }
}
