/*
 *  vframebuf.rs
 *
 *  inkstat - meeting room status on e-paper
 *	(c) 2020-26 Stuart Hunter
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

use core::convert::Infallible;
use embedded_graphics::geometry::{OriginDimensions, Size};
use embedded_graphics::pixelcolor::PixelColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

use crate::display::color::InkyColor;

/// The panel frame: background, text and icons are all drawn into one of these.
pub type Frame = VarFrameBuf<InkyColor>;

/// A runtime-sized framebuffer for embedded-graphics.
#[derive(Debug, Clone, PartialEq)]
pub struct VarFrameBuf<C: PixelColor> {
    buf: Vec<C>,
    w: usize,
    h: usize,
}

/// 1-bit stencil; `true` pixels are transferred by `paste_masked`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    bits: Vec<bool>,
    w: usize,
    h: usize,
}

impl Mask {
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        let (w, h) = (width as usize, height as usize);
        let mut bits = Vec::with_capacity(w * h);
        for y in 0..height {
            for x in 0..width {
                bits.push(f(x, y));
            }
        }
        Self { bits, w, h }
    }

    pub fn is_on(&self, x: u32, y: u32) -> bool {
        let (x, y) = (x as usize, y as usize);
        x < self.w && y < self.h && self.bits[y * self.w + x]
    }

    pub fn count_on(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }
}

impl<C: PixelColor + Clone> VarFrameBuf<C> {
    pub fn new(width: u32, height: u32, fill: C) -> Self {
        let (w, h) = (width as usize, height as usize);
        Self { buf: vec![fill; w * h], w, h }
    }

    /// Build from row-major pixels; `None` when the length is wrong.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<C>) -> Option<Self> {
        let (w, h) = (width as usize, height as usize);
        (pixels.len() == w * h).then_some(Self { buf: pixels, w, h })
    }

    pub fn width(&self) -> usize { self.w }
    pub fn height(&self) -> usize { self.h }

    /// Immutable raw access, row-major
    pub fn as_slice(&self) -> &[C] { &self.buf }

    /// Clear to a color
    pub fn clear_color(&mut self, color: C) {
        self.buf.fill(color);
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<C> {
        self.idx(Point::new(x, y)).map(|i| self.buf[i])
    }

    /// Turn the image upside down in place.
    ///
    /// Row-major storage makes a half turn a plain reversal.
    pub fn rotate_180(&mut self) {
        self.buf.reverse();
    }

    /// Copy `src` onto this buffer with its top-left at `at`, only where
    /// `mask` is on. Pixels falling outside this buffer are dropped.
    pub fn paste_masked(&mut self, src: &VarFrameBuf<C>, mask: &Mask, at: Point) {
        for sy in 0..src.h {
            for sx in 0..src.w {
                if !mask.is_on(sx as u32, sy as u32) {
                    continue;
                }
                let p = at + Point::new(sx as i32, sy as i32);
                if let Some(i) = self.idx(p) {
                    self.buf[i] = src.buf[sy * src.w + sx];
                }
            }
        }
    }

    /// Count pixels of one color (handy for assertions and logging)
    pub fn count(&self, color: C) -> usize {
        self.buf.iter().filter(|&&c| c == color).count()
    }

    /// Map (x,y) to linear index; returns None if out of bounds
    #[inline]
    fn idx(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 {
            let (x, y) = (p.x as usize, p.y as usize);
            if x < self.w && y < self.h {
                return Some(y * self.w + x);
            }
        }
        None
    }
}

impl<C: PixelColor> OriginDimensions for VarFrameBuf<C> {
    fn size(&self) -> Size {
        Size::new(self.w as u32, self.h as u32)
    }
}

impl<C: PixelColor + Clone> DrawTarget for VarFrameBuf<C> {
    type Color = C;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(p, c) in pixels {
            if let Some(i) = self.idx(p) {
                self.buf[i] = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clear_color(color);
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        // clip first, the default would walk every point of an off-screen area
        let area = area.intersection(&self.bounding_box());
        let Size { width, height } = area.size;
        if width == 0 || height == 0 { return Ok(()); }
        let (x0, y0) = (area.top_left.x as usize, area.top_left.y as usize);
        for row in y0..y0 + height as usize {
            let base = row * self.w;
            self.buf[base + x0..base + x0 + width as usize].fill(color);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::primitives::{Line, PrimitiveStyle};

    #[test]
    fn test_draw_and_read_back() {
        let mut fb = Frame::new(212, 104, InkyColor::White);
        Line::new(Point::new(0, 0), Point::new(10, 0))
            .into_styled(PrimitiveStyle::with_stroke(InkyColor::Black, 1))
            .draw(&mut fb)
            .unwrap();
        assert_eq!(fb.pixel(0, 0), Some(InkyColor::Black));
        assert_eq!(fb.pixel(10, 0), Some(InkyColor::Black));
        assert_eq!(fb.pixel(11, 0), Some(InkyColor::White));
        assert_eq!(fb.pixel(212, 0), None);
        assert_eq!(fb.count(InkyColor::Black), 11);
    }

    #[test]
    fn test_rotate_180() {
        let mut fb = Frame::new(4, 3, InkyColor::White);
        Pixel(Point::new(0, 0), InkyColor::Accent).draw(&mut fb).unwrap();
        fb.rotate_180();
        assert_eq!(fb.pixel(3, 2), Some(InkyColor::Accent));
        assert_eq!(fb.pixel(0, 0), Some(InkyColor::White));
    }

    #[test]
    fn test_paste_masked_respects_mask_and_bounds() {
        let mut dst = Frame::new(8, 8, InkyColor::White);
        let src = Frame::new(4, 4, InkyColor::Black);
        let mask = Mask::from_fn(4, 4, |x, _| x % 2 == 0);
        dst.paste_masked(&src, &mask, Point::new(6, 6));
        assert_eq!(dst.pixel(6, 6), Some(InkyColor::Black));
        assert_eq!(dst.pixel(7, 6), Some(InkyColor::White));
        assert_eq!(dst.count(InkyColor::Black), 2);
    }

    #[test]
    fn test_fill_solid_clips() {
        let mut fb = Frame::new(10, 10, InkyColor::White);
        fb.fill_solid(&Rectangle::new(Point::new(-5, 8), Size::new(20, 20)), InkyColor::Accent)
            .unwrap();
        assert_eq!(fb.count(InkyColor::Accent), 20);
    }

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(Frame::from_pixels(2, 2, vec![InkyColor::White; 3]).is_none());
        assert!(Frame::from_pixels(2, 2, vec![InkyColor::White; 4]).is_some());
    }
}
