/*
 *  compositor.rs
 *
 *  inkstat - meeting room status on e-paper
 *	(c) 2020-26 Stuart Hunter
 *
 *	Draws the status screen: background, availability icon, meeting,
 *	temperature and the outlined clock
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use std::collections::HashMap;
use std::convert::Infallible;

use chrono::Timelike;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::{debug, warn};
use thiserror::Error;
use u8g2_fonts::types::{FontColor, HorizontalAlignment, VerticalPosition};
use u8g2_fonts::FontRenderer;

use crate::assets::IconEntry;
use crate::constants::*;
use crate::fonts::{CLOCK_FONT, DEGREE_FONT, MEETING_TIME_FONT, TEMPERATURE_FONT, TITLE_FONT};
use crate::status::StatusSnapshot;
use crate::vframebuf::Frame;
use crate::wrap::wrap;

#[derive(Debug, Error)]
pub enum RenderError {
    /// A glyph the font cannot produce
    #[error("font error: {0}")]
    Font(String),
}

impl From<u8g2_fonts::Error<Infallible>> for RenderError {
    fn from(err: u8g2_fonts::Error<Infallible>) -> Self {
        RenderError::Font(format!("{:?}", err))
    }
}

impl From<u8g2_fonts::LookupError> for RenderError {
    fn from(err: u8g2_fonts::LookupError) -> Self {
        RenderError::Font(format!("{:?}", err))
    }
}

/// Compose a full status frame on a copy of `background`.
///
/// Optional parts of the snapshot that are absent are not drawn, and an
/// availability key with no matching icon is skipped.
pub fn render<T: Timelike>(
    background: &Frame,
    snapshot: &StatusSnapshot,
    icons: &HashMap<String, IconEntry>,
    now: &T,
) -> Result<Frame, RenderError> {
    let mut frame = background.clone();

    if let Some(key) = snapshot.availability.as_deref() {
        match icons.get(key) {
            Some(icon) => draw_icon(&mut frame, icon),
            None => warn!("no icon for availability '{}', skipped", key),
        }
    }

    if let Some(meeting) = &snapshot.meeting {
        draw_title(&mut frame, &meeting.title)?;
        draw_meeting_time(&mut frame, &meeting.time)?;
    }

    if let Some(text) = snapshot.temperature_text() {
        draw_temperature(&mut frame, &text)?;
    }

    let (hours, minutes) = clock_text(now);
    draw_hours(&mut frame, &hours)?;
    draw_minutes(&mut frame, &minutes)?;
    debug!("composed {}:{} {:?}", hours, minutes, snapshot);

    Ok(frame)
}

/// Zero padded hour and minute strings, `09:07` -> ("09", "07").
pub fn clock_text<T: Timelike>(now: &T) -> (String, String) {
    (format!("{:02}", now.hour()), format!("{:02}", now.minute()))
}

pub fn draw_icon(frame: &mut Frame, icon: &IconEntry) {
    frame.paste_masked(&icon.bitmap, &icon.mask, Point::new(ICON_X, ICON_Y));
}

/// Word-wrapped title, one line under the other. Returns the area covered.
pub fn draw_title(frame: &mut Frame, title: &str) -> Result<Option<Rectangle>, RenderError> {
    let mut y = TITLE_Y;
    let mut covered: Option<Rectangle> = None;
    for line in wrap(title, TITLE_WRAP_CHARS) {
        let dims = TITLE_FONT.render(
            line.as_str(),
            Point::new(TITLE_X, y),
            VerticalPosition::Top,
            FontColor::Transparent(PRIMARY_INK),
            frame,
        )?;
        if let Some(bbox) = dims.bounding_box {
            y += bbox.size.height as i32;
            covered = Some(match covered {
                Some(prev) => envelope(&prev, &bbox),
                None => bbox,
            });
        }
    }
    Ok(covered)
}

/// Meeting time ending `MEETING_TIME_RIGHT_MARGIN` from the right edge.
pub fn draw_meeting_time(frame: &mut Frame, time: &str) -> Result<Option<Rectangle>, RenderError> {
    let right = frame.width() as i32 - MEETING_TIME_RIGHT_MARGIN;
    Ok(MEETING_TIME_FONT.render_aligned(
        time,
        Point::new(right, MEETING_TIME_BASELINE_Y),
        VerticalPosition::Baseline,
        HorizontalAlignment::Right,
        FontColor::Transparent(PRIMARY_INK),
        frame,
    )?)
}

/// Temperature digits with a small "o" right after them in place of a degree sign.
pub fn draw_temperature(frame: &mut Frame, text: &str) -> Result<(), RenderError> {
    let origin = Point::new(TEMPERATURE_X, TEMPERATURE_Y);
    let width = text_width(&TEMPERATURE_FONT, text)?;
    TEMPERATURE_FONT.render(
        text,
        origin,
        VerticalPosition::Top,
        FontColor::Transparent(PRIMARY_INK),
        frame,
    )?;
    DEGREE_FONT.render(
        "o",
        origin + Point::new(width, 0),
        VerticalPosition::Top,
        FontColor::Transparent(PRIMARY_INK),
        frame,
    )?;
    Ok(())
}

/// Hours, one digit at a time: a halo in the secondary ink offset by
/// `CLOCK_HALO` in each direction, then the fill on top.
pub fn draw_hours(frame: &mut Frame, hours: &str) -> Result<(), RenderError> {
    let halo = [
        Point::new(-CLOCK_HALO, 0),
        Point::new(CLOCK_HALO, 0),
        Point::new(0, -CLOCK_HALO),
        Point::new(0, CLOCK_HALO),
    ];
    let mut x = CLOCK_X;
    for ch in hours.chars() {
        let at = Point::new(x, CLOCK_HOURS_Y);
        for offset in halo {
            CLOCK_FONT.render(
                ch,
                at + offset,
                VerticalPosition::Center,
                FontColor::Transparent(SECONDARY_INK),
                frame,
            )?;
        }
        let dims = CLOCK_FONT.render(
            ch,
            at,
            VerticalPosition::Center,
            FontColor::Transparent(PRIMARY_INK),
            frame,
        )?;
        x += dims.advance.x + CLOCK_KERNING;
    }
    Ok(())
}

/// Minutes as one string in the primary ink, no halo.
pub fn draw_minutes(frame: &mut Frame, minutes: &str) -> Result<(), RenderError> {
    CLOCK_FONT.render(
        minutes,
        Point::new(CLOCK_X, CLOCK_MINUTES_Y),
        VerticalPosition::Center,
        FontColor::Transparent(PRIMARY_INK),
        frame,
    )?;
    Ok(())
}

fn text_width(font: &FontRenderer, text: &str) -> Result<i32, RenderError> {
    let dims = font.get_rendered_dimensions(text, Point::zero(), VerticalPosition::Top)?;
    Ok(dims.advance.x)
}

fn envelope(a: &Rectangle, b: &Rectangle) -> Rectangle {
    let top_left = a.top_left.component_min(b.top_left);
    let a_br = a.top_left + a.size;
    let b_br = b.top_left + b.size;
    let bottom_right = a_br.component_max(b_br);
    Rectangle::with_corners(top_left, bottom_right - Point::new(1, 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::color::InkyColor;
    use crate::status::Meeting;
    use crate::vframebuf::Mask;
    use chrono::NaiveTime;

    fn blank() -> Frame {
        Frame::new(DISPLAY_WIDTH, DISPLAY_HEIGHT, InkyColor::Black)
    }

    fn busy_icon() -> IconEntry {
        IconEntry {
            bitmap: Frame::new(ICON_SIZE as u32, ICON_SIZE as u32, InkyColor::Accent),
            mask: Mask::from_fn(ICON_SIZE as u32, ICON_SIZE as u32, |_, _| true),
        }
    }

    /// Extent of `color` inside a window of the frame, as (min_x, min_y, max_x, max_y).
    fn extent(
        frame: &Frame,
        color: InkyColor,
        xs: std::ops::Range<i32>,
        ys: std::ops::Range<i32>,
    ) -> Option<(i32, i32, i32, i32)> {
        let mut out: Option<(i32, i32, i32, i32)> = None;
        for y in ys {
            for x in xs.clone() {
                if frame.pixel(x, y) == Some(color) {
                    out = Some(match out {
                        None => (x, y, x, y),
                        Some((a, b, c, d)) => (a.min(x), b.min(y), c.max(x), d.max(y)),
                    });
                }
            }
        }
        out
    }

    #[test]
    fn test_clock_text_is_zero_padded() {
        let t = NaiveTime::from_hms_opt(9, 7, 0).unwrap();
        assert_eq!(clock_text(&t), ("09".to_string(), "07".to_string()));
        let t = NaiveTime::from_hms_opt(23, 59, 0).unwrap();
        assert_eq!(clock_text(&t), ("23".to_string(), "59".to_string()));
    }

    #[test]
    fn test_title_wraps_and_starts_at_anchor() {
        let mut frame = blank();
        let area = draw_title(&mut frame, "Quarterly Planning And Budget Review")
            .unwrap()
            .unwrap();
        let (min_x, min_y, _, max_y) =
            extent(&frame, PRIMARY_INK, 0..DISPLAY_WIDTH as i32, 0..DISPLAY_HEIGHT as i32).unwrap();
        assert!((TITLE_X..=TITLE_X + 2).contains(&min_x), "left edge {min_x}");
        assert!((TITLE_Y..=TITLE_Y + 4).contains(&min_y), "top edge {min_y}");
        // two lines stack downwards
        assert!(max_y - min_y > 14, "height {}", max_y - min_y);
        assert!(area.size.height > 14);
    }

    #[test]
    fn test_meeting_time_right_aligned() {
        let mut frame = blank();
        draw_meeting_time(&mut frame, "09:30").unwrap();
        let (_, _, max_x, max_y) =
            extent(&frame, PRIMARY_INK, 0..DISPLAY_WIDTH as i32, 0..DISPLAY_HEIGHT as i32).unwrap();
        let right = DISPLAY_WIDTH as i32 - MEETING_TIME_RIGHT_MARGIN;
        assert!((right - 4..=right).contains(&max_x), "right edge {max_x}");
        assert!(max_y <= MEETING_TIME_BASELINE_Y);
    }

    #[test]
    fn test_temperature_then_degree_glyph() {
        let mut frame = blank();
        draw_temperature(&mut frame, "22").unwrap();
        let (min_x, min_y, max_x, _) =
            extent(&frame, PRIMARY_INK, 0..DISPLAY_WIDTH as i32, 0..DISPLAY_HEIGHT as i32).unwrap();
        assert!(min_x >= TEMPERATURE_X);
        assert!(min_y >= TEMPERATURE_Y);
        let digits = text_width(&TEMPERATURE_FONT, "22").unwrap();
        // the "o" sits past the digits
        assert!(max_x >= TEMPERATURE_X + digits);
    }

    #[test]
    fn test_hours_have_halo_minutes_do_not() {
        let mut frame = Frame::new(DISPLAY_WIDTH, DISPLAY_HEIGHT, InkyColor::Accent);
        draw_hours(&mut frame, "09").unwrap();
        assert!(frame.count(SECONDARY_INK) > 0);
        assert!(frame.count(PRIMARY_INK) > 0);

        let mut frame = Frame::new(DISPLAY_WIDTH, DISPLAY_HEIGHT, InkyColor::Accent);
        draw_minutes(&mut frame, "07").unwrap();
        assert_eq!(frame.count(SECONDARY_INK), 0);
        assert!(frame.count(PRIMARY_INK) > 0);
    }

    /// Pixels `ch` covers when drawn alone at `at` the way the clock draws it.
    fn clock_glyph(ch: char, at: Point) -> Vec<Point> {
        let mut frame = Frame::new(DISPLAY_WIDTH, DISPLAY_HEIGHT, InkyColor::Accent);
        CLOCK_FONT
            .render(ch, at, VerticalPosition::Center, FontColor::Transparent(PRIMARY_INK), &mut frame)
            .unwrap();
        let mut on = Vec::new();
        for y in 0..DISPLAY_HEIGHT as i32 {
            for x in 0..DISPLAY_WIDTH as i32 {
                if frame.pixel(x, y) == Some(PRIMARY_INK) {
                    on.push(Point::new(x, y));
                }
            }
        }
        on
    }

    #[test]
    fn test_hour_halo_and_kerning_geometry() {
        let mut frame = Frame::new(DISPLAY_WIDTH, DISPLAY_HEIGHT, InkyColor::Accent);
        draw_hours(&mut frame, "11").unwrap();

        let first = Point::new(CLOCK_X, CLOCK_HOURS_Y);
        let advance = CLOCK_FONT
            .get_rendered_dimensions('1', first, VerticalPosition::Center)
            .unwrap()
            .advance
            .x;
        let second = Point::new(CLOCK_X + advance + CLOCK_KERNING, CLOCK_HOURS_Y);
        assert_eq!(CLOCK_KERNING, 3);

        // per digit: the glyph 2px left, right, up and down in the halo ink, then the fill
        let mut expected = Frame::new(DISPLAY_WIDTH, DISPLAY_HEIGHT, InkyColor::Accent);
        for at in [first, second] {
            let glyph = clock_glyph('1', at);
            assert!(!glyph.is_empty());
            for offset in [Point::new(-2, 0), Point::new(2, 0), Point::new(0, -2), Point::new(0, 2)] {
                expected
                    .draw_iter(glyph.iter().map(|p| Pixel(*p + offset, SECONDARY_INK)))
                    .unwrap();
            }
            expected
                .draw_iter(glyph.iter().map(|p| Pixel(*p, PRIMARY_INK)))
                .unwrap();
        }
        for y in 0..DISPLAY_HEIGHT as i32 {
            for x in 0..DISPLAY_WIDTH as i32 {
                assert_eq!(frame.pixel(x, y), expected.pixel(x, y), "pixel ({x}, {y})");
            }
        }

        // the second digit is the first one moved by its advance plus the kerning gap
        let shifted: Vec<Point> = clock_glyph('1', first)
            .into_iter()
            .map(|p| p + Point::new(advance + CLOCK_KERNING, 0))
            .collect();
        assert_eq!(clock_glyph('1', second), shifted);
        assert!(shifted.iter().all(|p| frame.pixel(p.x, p.y) == Some(PRIMARY_INK)));

        // the halo reaches exactly 2px past the fill on every side
        let all_x = 0..DISPLAY_WIDTH as i32;
        let all_y = 0..DISPLAY_HEIGHT as i32;
        let (fx0, fy0, fx1, fy1) = extent(&frame, PRIMARY_INK, all_x.clone(), all_y.clone()).unwrap();
        let (hx0, hy0, hx1, hy1) = extent(&frame, SECONDARY_INK, all_x, all_y).unwrap();
        assert_eq!((hx0, hy0, hx1, hy1), (fx0 - 2, fy0 - 2, fx1 + 2, fy1 + 2));
    }

    #[test]
    fn test_missing_icon_is_skipped() {
        let snapshot = StatusSnapshot {
            meeting: None,
            temperature: None,
            availability: Some("away".into()),
        };
        let icons = HashMap::from([("busy".to_string(), busy_icon())]);
        let now = NaiveTime::from_hms_opt(12, 1, 0).unwrap();
        let frame = render(&blank(), &snapshot, &icons, &now).unwrap();
        assert_eq!(frame.count(InkyColor::Accent), 0);
    }

    #[test]
    fn test_standup_scenario() {
        let snapshot = StatusSnapshot {
            meeting: Some(Meeting { title: "Standup".into(), time: "09:30".into() }),
            temperature: Some(18.0),
            availability: Some("busy".into()),
        };
        let icons = HashMap::from([("busy".to_string(), busy_icon())]);
        let now = NaiveTime::from_hms_opt(9, 7, 0).unwrap();
        let background = blank();
        let frame = render(&background, &snapshot, &icons, &now).unwrap();

        // background untouched
        assert_eq!(background.count(InkyColor::Black), (DISPLAY_WIDTH * DISPLAY_HEIGHT) as usize);

        // icon pasted at its anchor, nothing else is accent
        assert_eq!(frame.count(InkyColor::Accent), (ICON_SIZE * ICON_SIZE) as usize);
        assert_eq!(frame.pixel(ICON_X, ICON_Y), Some(InkyColor::Accent));
        assert_eq!(frame.pixel(ICON_X - 1, ICON_Y), Some(InkyColor::Black));
        assert_eq!(frame.pixel(ICON_X, ICON_Y - 1), Some(InkyColor::Black));
        assert_eq!((ICON_X, ICON_Y), (159, 15));

        // meeting time ends 5px from the right edge, below the icon
        let (_, _, max_x, _) = extent(&frame, PRIMARY_INK, 150..DISPLAY_WIDTH as i32, 70..90).unwrap();
        let right = DISPLAY_WIDTH as i32 - MEETING_TIME_RIGHT_MARGIN;
        assert!((right - 4..=right).contains(&max_x), "right edge {max_x}");
    }
}
