/*
 *  display/drivers/mock.rs
 *
 *  inkstat - meeting room status on e-paper
 *  (c) 2020-26 Stuart Hunter
 *
 *  Mock panel for testing without hardware
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

use std::sync::{Arc, Mutex, MutexGuard};

use crate::display::color::{InkyColor, PanelColour};
use crate::display::error::DisplayError;
use crate::display::factory::PanelFactory;
use crate::display::traits::{check_frame_size, PanelCapabilities, PanelDriver};
use crate::refresh::RefreshMode;
use crate::vframebuf::Frame;

/// Mock panel for testing
///
/// Records every `show` with the refresh mode, border and frame that went to
/// the "glass". Clones share state, so a test keeps a handle while the
/// pipeline owns the boxed driver.
#[derive(Debug, Clone)]
pub struct MockPanel {
    capabilities: PanelCapabilities,
    mode: RefreshMode,
    border: InkyColor,
    staged: Option<Frame>,
    state: Arc<Mutex<MockPanelState>>,
}

/// One transmitted frame
#[derive(Debug, Clone, PartialEq)]
pub struct ShownFrame {
    pub mode: RefreshMode,
    pub border: InkyColor,
    pub frame: Frame,
}

/// Internal state for the mock panel (shared for inspection in tests)
#[derive(Debug, Default)]
pub struct MockPanelState {
    /// Modes the factory was asked to open, in order
    pub opened: Vec<RefreshMode>,

    /// Every frame pushed by `show`
    pub shown: Vec<ShownFrame>,

    /// Number of times set_border() was called
    pub border_count: usize,

    /// Number of times set_image() was called
    pub image_count: usize,

    /// Fail the nth (0-based) `show` call
    pub fail_show_at: Option<usize>,
}

impl MockPanel {
    pub fn new(mode: RefreshMode, width: u32, height: u32) -> Self {
        Self::with_state(mode, width, height, Arc::new(Mutex::new(MockPanelState::default())))
    }

    fn with_state(mode: RefreshMode, width: u32, height: u32, state: Arc<Mutex<MockPanelState>>) -> Self {
        Self {
            capabilities: PanelCapabilities {
                width,
                height,
                colour: PanelColour::Red,
                name: "mock",
            },
            mode,
            border: InkyColor::White,
            staged: None,
            state,
        }
    }

    /// Get reference to state for inspection in tests
    pub fn state(&self) -> Arc<Mutex<MockPanelState>> {
        Arc::clone(&self.state)
    }

    fn lock(&self) -> MutexGuard<'_, MockPanelState> {
        lock(&self.state)
    }
}

fn lock(state: &Mutex<MockPanelState>) -> MutexGuard<'_, MockPanelState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl PanelDriver for MockPanel {
    fn capabilities(&self) -> &PanelCapabilities {
        &self.capabilities
    }

    fn refresh_mode(&self) -> RefreshMode {
        self.mode
    }

    fn set_border(&mut self, colour: InkyColor) {
        self.lock().border_count += 1;
        self.border = colour;
    }

    fn set_image(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        check_frame_size(&self.capabilities, frame)?;
        self.lock().image_count += 1;
        self.staged = Some(frame.clone());
        Ok(())
    }

    fn show(&mut self) -> Result<(), DisplayError> {
        let frame = self.staged.clone().ok_or(DisplayError::NothingStaged)?;
        let mut state = self.lock();
        if state.fail_show_at == Some(state.shown.len()) {
            return Err(DisplayError::Other("Simulated show failure".to_string()));
        }
        state.shown.push(ShownFrame { mode: self.mode, border: self.border, frame });
        Ok(())
    }
}

/// Factory handing out mock panels that all record into one shared state.
#[derive(Debug, Clone)]
pub struct MockPanelFactory {
    width: u32,
    height: u32,
    state: Arc<Mutex<MockPanelState>>,
}

impl MockPanelFactory {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, state: Arc::new(Mutex::new(MockPanelState::default())) }
    }

    pub fn state(&self) -> Arc<Mutex<MockPanelState>> {
        Arc::clone(&self.state)
    }
}

impl PanelFactory for MockPanelFactory {
    fn open(&self, mode: RefreshMode) -> Result<Box<dyn PanelDriver>, DisplayError> {
        lock(&self.state).opened.push(mode);
        Ok(Box::new(MockPanel::with_state(mode, self.width, self.height, Arc::clone(&self.state))))
    }
}
