/*
 *  pipeline.rs
 *
 *  inkstat - meeting room status on e-paper
 *	(c) 2020-26 Stuart Hunter
 *
 *	One invocation: decide, clean or render, transmit
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

use std::path::PathBuf;

use chrono::Timelike;
use embedded_hal::delay::DelayNs;
use log::info;

use crate::assets;
use crate::cleaning;
use crate::compositor;
use crate::constants::RENDER_BORDER;
use crate::display::factory::PanelFactory;
use crate::error::AppError;
use crate::func_timer::FunctionTimer;
use crate::refresh::{decide, RefreshMode};
use crate::status::StatusSource;

/// How an invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The cleaning sweeps ran; nothing was rendered
    Cleaned { frames: usize },
    /// A status frame went to the panel with this refresh strategy
    Displayed(RefreshMode),
}

/// Everything one run needs, passed in rather than looked up.
pub struct Pipeline<F, S, D> {
    pub factory: F,
    pub source: S,
    /// Settling pause source for the cleaning sweeps
    pub delay: D,
    /// Directory holding background.png and assets/
    pub assets_dir: PathBuf,
    /// Turn the frame upside down before it goes out
    pub rotate_180: bool,
}

impl<F, S, D> Pipeline<F, S, D>
where
    F: PanelFactory,
    S: StatusSource,
    D: DelayNs,
{
    /// Run the whole pipeline once for the wall-clock time `now`.
    ///
    /// The panel only sees a frame after assets, status and composition all
    /// succeeded; any failure before that leaves the glass untouched.
    pub async fn run_once<T: Timelike>(&mut self, now: &T) -> Result<Outcome, AppError> {
        let decision = decide(now);
        info!(
            "{:02}:{:02} {} refresh{}",
            now.hour(),
            now.minute(),
            decision.mode,
            if decision.clean { ", cleaning" } else { "" }
        );

        if decision.clean {
            let mut panel = self.factory.open(RefreshMode::Slow)?;
            let frames = cleaning::run(panel.as_mut(), &mut self.delay)?;
            return Ok(Outcome::Cleaned { frames });
        }

        let assets = {
            let _timer = FunctionTimer::new("load assets");
            assets::load(&self.assets_dir)?
        };

        let snapshot = {
            let _timer = FunctionTimer::new("fetch status");
            self.source.fetch().await?
        };

        let mut frame = {
            let _timer = FunctionTimer::new("compose");
            compositor::render(&assets.background, &snapshot, &assets.icons, now)?
        };
        if self.rotate_180 {
            frame.rotate_180();
        }

        let mut panel = self.factory.open(decision.mode)?;
        panel.set_border(RENDER_BORDER);
        panel.set_image(&frame)?;
        panel.show()?;

        info!("{} refresh on {} done", decision.mode, panel.capabilities().name);
        Ok(Outcome::Displayed(decision.mode))
    }
}
