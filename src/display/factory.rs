/*
 *  display/factory.rs
 *
 *  inkstat - meeting room status on e-paper
 *  (c) 2020-26 Stuart Hunter
 *
 *  Opens the panel driver matching a refresh decision
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

use log::info;

use crate::config::{DriverKind, PanelSettings};
use crate::display::drivers::inky::{InkyPhat, InkyPhatFast};
use crate::display::drivers::preview::PreviewPanel;
use crate::display::error::DisplayError;
use crate::display::traits::PanelDriver;
use crate::refresh::RefreshMode;

/// Type alias for boxed panel driver trait objects
pub type BoxedPanel = Box<dyn PanelDriver>;

/// Source of panel drivers, one per refresh strategy
///
/// The pipeline never names a concrete driver: it asks for the strategy it
/// decided on and gets whatever the deployment wired up.
pub trait PanelFactory {
    fn open(&self, mode: RefreshMode) -> Result<BoxedPanel, DisplayError>;
}

/// Factory for creating panel drivers from configuration
pub struct PanelDriverFactory {
    settings: PanelSettings,
}

impl PanelDriverFactory {
    pub fn new(settings: PanelSettings) -> Self {
        Self { settings }
    }
}

impl PanelFactory for PanelDriverFactory {
    /// Open the configured panel for `mode`
    ///
    /// The hardware is only touched here, after the refresh decision, so a
    /// run that fails earlier never claims the SPI bus or GPIO lines.
    fn open(&self, mode: RefreshMode) -> Result<BoxedPanel, DisplayError> {
        let s = &self.settings;
        info!("opening {:?} panel ({}, {:?})", s.driver, mode, s.colour);
        match (s.driver, mode) {
            (DriverKind::Inky, RefreshMode::Slow) => Ok(Box::new(InkyPhat::open(s)?)),
            (DriverKind::Inky, RefreshMode::Fast) => Ok(Box::new(InkyPhatFast::open(s)?)),
            (DriverKind::Preview, mode) => {
                Ok(Box::new(PreviewPanel::new(&s.preview_path, s.colour, mode)))
            }
        }
    }
}
