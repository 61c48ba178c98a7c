/*
 *  display/drivers/preview.rs
 *
 *  inkstat - meeting room status on e-paper
 *  (c) 2020-26 Stuart Hunter
 *
 *  Desktop stand-in for the panel: each shown frame becomes a PNG
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

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use log::info;

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::display::color::{InkyColor, PanelColour};
use crate::display::error::DisplayError;
use crate::display::traits::{check_frame_size, PanelCapabilities, PanelDriver};
use crate::refresh::RefreshMode;
use crate::vframebuf::Frame;

/// Width of the border frame drawn around the preview.
pub const PREVIEW_BORDER: u32 = 2;

/// Writes the panel content, border included, to a PNG on every `show`.
pub struct PreviewPanel {
    capabilities: PanelCapabilities,
    mode: RefreshMode,
    path: PathBuf,
    border: InkyColor,
    staged: Option<Frame>,
}

impl PreviewPanel {
    pub fn new(path: &Path, colour: PanelColour, mode: RefreshMode) -> Self {
        Self {
            capabilities: PanelCapabilities {
                width: DISPLAY_WIDTH,
                height: DISPLAY_HEIGHT,
                colour,
                name: "preview",
            },
            mode,
            path: path.to_path_buf(),
            border: InkyColor::White,
            staged: None,
        }
    }
}

/// Frame plus a `PREVIEW_BORDER` wide border, in the panel's real colours.
pub fn to_rgb_image(frame: &Frame, border: InkyColor, colour: PanelColour) -> RgbImage {
    let (w, h) = (frame.width() as u32, frame.height() as u32);
    let b = PREVIEW_BORDER;
    let mut img = RgbImage::from_pixel(w + 2 * b, h + 2 * b, Rgb(border.to_rgb(colour)));
    for (i, c) in frame.as_slice().iter().enumerate() {
        let (x, y) = (i as u32 % w, i as u32 / w);
        img.put_pixel(x + b, y + b, Rgb(c.to_rgb(colour)));
    }
    img
}

impl PanelDriver for PreviewPanel {
    fn capabilities(&self) -> &PanelCapabilities {
        &self.capabilities
    }

    fn refresh_mode(&self) -> RefreshMode {
        self.mode
    }

    fn set_border(&mut self, colour: InkyColor) {
        self.border = colour;
    }

    fn set_image(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        check_frame_size(&self.capabilities, frame)?;
        self.staged = Some(frame.clone());
        Ok(())
    }

    fn show(&mut self) -> Result<(), DisplayError> {
        let frame = self.staged.as_ref().ok_or(DisplayError::NothingStaged)?;
        to_rgb_image(frame, self.border, self.capabilities.colour).save(&self.path)?;
        info!("{} refresh written to {}", self.mode, self.path.display());
        Ok(())
    }
}
