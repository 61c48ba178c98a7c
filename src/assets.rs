/*
 *  assets.rs
 *
 *  inkstat - meeting room status on e-paper
 *	(c) 2020-26 Stuart Hunter
 *
 *	Background and availability icon loading
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
use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use log::{debug, warn};
use thiserror::Error;

use crate::constants::{
    BACKGROUND_FILE, DISPLAY_HEIGHT, DISPLAY_WIDTH, ICON_DIR, ICON_PREFIX, ICON_SUFFIX,
};
use crate::display::color::InkyColor;
use crate::vframebuf::{Frame, Mask};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("required asset missing: {0}")]
    Missing(PathBuf),
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{path} is {actual_w}x{actual_h}, expected {expected_w}x{expected_h}")]
    InvalidSize {
        path: PathBuf,
        expected_w: u32,
        expected_h: u32,
        actual_w: u32,
        actual_h: u32,
    },
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An availability icon and the stencil of its paintable pixels.
#[derive(Debug, Clone)]
pub struct IconEntry {
    pub bitmap: Frame,
    pub mask: Mask,
}

/// Everything read from disk for one invocation. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Assets {
    pub background: Frame,
    pub icons: HashMap<String, IconEntry>,
}

impl Assets {
    pub fn icon(&self, name: &str) -> Option<&IconEntry> {
        self.icons.get(name)
    }
}

/// Load `background.png` and every `assets/icon-<name>.png` under `dir`.
///
/// A missing or malformed background is fatal. Icons are optional: a missing
/// `assets` directory yields no icons, an undecodable icon is skipped.
pub fn load(dir: &Path) -> Result<Assets, AssetError> {
    let background = load_background(&dir.join(BACKGROUND_FILE))?;
    let icons = load_icons(&dir.join(ICON_DIR))?;
    debug!("loaded background and {} icon(s) from {}", icons.len(), dir.display());
    Ok(Assets { background, icons })
}

/// Decode the background, snapping every pixel to the nearest palette colour.
pub fn load_background(path: &Path) -> Result<Frame, AssetError> {
    if !path.is_file() {
        return Err(AssetError::Missing(path.to_path_buf()));
    }
    let img = decode(path)?;
    if img.dimensions() != (DISPLAY_WIDTH, DISPLAY_HEIGHT) {
        return Err(AssetError::InvalidSize {
            path: path.to_path_buf(),
            expected_w: DISPLAY_WIDTH,
            expected_h: DISPLAY_HEIGHT,
            actual_w: img.width(),
            actual_h: img.height(),
        });
    }
    let pixels = img
        .pixels()
        .map(|p| InkyColor::nearest([p[0], p[1], p[2]]))
        .collect();
    Frame::from_pixels(img.width(), img.height(), pixels).ok_or_else(|| AssetError::InvalidSize {
        path: path.to_path_buf(),
        expected_w: DISPLAY_WIDTH,
        expected_h: DISPLAY_HEIGHT,
        actual_w: img.width(),
        actual_h: img.height(),
    })
}

/// Scan a directory for `icon-<name>.png` files.
pub fn load_icons(dir: &Path) -> Result<HashMap<String, IconEntry>, AssetError> {
    let mut icons = HashMap::new();
    if !dir.is_dir() {
        warn!("icon directory {} not found, no availability icons", dir.display());
        return Ok(icons);
    }

    let entries = fs::read_dir(dir).map_err(|source| AssetError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| AssetError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str().and_then(icon_name) else {
            continue;
        };
        let path = entry.path();
        match decode(&path) {
            Ok(img) => {
                debug!("icon '{}' {}x{}", name, img.width(), img.height());
                icons.insert(name.to_string(), icon_from_rgba(&img));
            }
            Err(e) => warn!("skipping icon '{}': {}", name, e),
        }
    }
    Ok(icons)
}

/// `icon-busy.png` -> `busy`. Anything else, including `icon-.png`, is not an icon.
pub fn icon_name(file_name: &str) -> Option<&str> {
    file_name
        .strip_prefix(ICON_PREFIX)?
        .strip_suffix(ICON_SUFFIX)
        .filter(|name| !name.is_empty())
}

/// Build an icon bitmap and mask: a pixel is paintable exactly when it is
/// one of the palette colours. Unpaintable pixels carry white in the bitmap.
pub fn icon_from_rgba(img: &RgbaImage) -> IconEntry {
    let classified: Vec<Option<InkyColor>> = img.pixels().map(|p| InkyColor::from_rgba(p.0)).collect();
    let (w, h) = img.dimensions();
    let mask = Mask::from_fn(w, h, |x, y| classified[(y * w + x) as usize].is_some());
    let pixels = classified.iter().map(|c| c.unwrap_or(InkyColor::White)).collect();
    let bitmap = Frame::from_pixels(w, h, pixels).unwrap_or_else(|| Frame::new(w, h, InkyColor::White));
    IconEntry { bitmap, mask }
}

fn decode(path: &Path) -> Result<RgbaImage, AssetError> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|source| AssetError::Decode {
            path: path.to_path_buf(),
            source,
        })
}
