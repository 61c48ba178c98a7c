//! This module contains global constants used across the display and other modules.

use crate::display::color::InkyColor;

/// The total width of the e-paper panel in pixels.
pub const DISPLAY_WIDTH: u32 = 212;
/// The total height of the e-paper panel in pixels.
pub const DISPLAY_HEIGHT: u32 = 104;

const W: i32 = DISPLAY_WIDTH as i32;
const H: i32 = DISPLAY_HEIGHT as i32;

/// Ink for text and the solid clock fill.
pub const PRIMARY_INK: InkyColor = InkyColor::White;
/// Ink for the clock halo.
pub const SECONDARY_INK: InkyColor = InkyColor::Black;
/// Border colour for a normal render.
pub const RENDER_BORDER: InkyColor = InkyColor::Black;

// Meeting title block
/// Characters per wrapped title line.
pub const TITLE_WRAP_CHARS: usize = 20;
/// Top-left of the first title line.
pub const TITLE_X: i32 = W / 2 - 15;
pub const TITLE_Y: i32 = H / 2 + 5;

// Meeting time, right aligned
/// Gap between the end of the meeting time and the right edge.
pub const MEETING_TIME_RIGHT_MARGIN: i32 = 5;
pub const MEETING_TIME_BASELINE_Y: i32 = 88;

// Temperature, top-left of the digits
pub const TEMPERATURE_X: i32 = W / 2 + 5;
pub const TEMPERATURE_Y: i32 = 15;

// Availability icon
/// Icons are authored square at this size.
pub const ICON_SIZE: i32 = 48;
pub const ICON_X: i32 = W - ICON_SIZE - 5;
pub const ICON_Y: i32 = 15;

// Clock
/// Left edge of the hour and minute digits.
pub const CLOCK_X: i32 = W / 4 - 16;
/// Vertical centre of the hour digits (first quarter).
pub const CLOCK_HOURS_Y: i32 = H / 4;
/// Vertical centre of the minute digits (third quarter).
pub const CLOCK_MINUTES_Y: i32 = H / 4 * 3;
/// Extra gap after each hour digit.
pub const CLOCK_KERNING: i32 = 3;
/// Halo offset for the hour digits.
pub const CLOCK_HALO: i32 = 2;

// Cleaning cycle
pub const CLEANING_CYCLES: usize = 3;
/// Colours pushed per sweep, in order.
pub const CLEANING_SEQUENCE: [InkyColor; 3] = [InkyColor::Accent, InkyColor::Black, InkyColor::White];
/// Settling pause after each cleaning frame.
pub const CLEANING_PAUSE_MS: u32 = 1_000;

// Assets
pub const BACKGROUND_FILE: &str = "background.png";
pub const ICON_DIR: &str = "assets";
pub const ICON_PREFIX: &str = "icon-";
pub const ICON_SUFFIX: &str = ".png";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_anchor_points() {
        assert_eq!((TITLE_X, TITLE_Y), (91, 57));
        assert_eq!((TEMPERATURE_X, TEMPERATURE_Y), (111, 15));
        assert_eq!((ICON_X, ICON_Y), (159, 15));
        assert_eq!(CLOCK_X, 37);
        assert_eq!((CLOCK_HOURS_Y, CLOCK_MINUTES_Y), (26, 78));
    }
}
