//! Compiled-in u8g2 faces used by the compositor.

use u8g2_fonts::{fonts, FontRenderer};

/// Large numeric face for the hour and minute digits.
pub const CLOCK_FONT: FontRenderer = FontRenderer::new::<fonts::u8g2_font_logisoso42_tn>();

/// Meeting title, wrapped over several lines.
pub const TITLE_FONT: FontRenderer =
    FontRenderer::new::<fonts::u8g2_font_helvB10_tf>().with_ignore_unknown_chars(true);

/// Meeting start time, right aligned.
pub const MEETING_TIME_FONT: FontRenderer =
    FontRenderer::new::<fonts::u8g2_font_helvB12_tf>().with_ignore_unknown_chars(true);

/// Temperature digits.
pub const TEMPERATURE_FONT: FontRenderer =
    FontRenderer::new::<fonts::u8g2_font_helvB14_tf>().with_ignore_unknown_chars(true);

/// The small "o" standing in for a degree sign.
pub const DEGREE_FONT: FontRenderer = FontRenderer::new::<fonts::u8g2_font_helvR08_tf>();
