/*
 *  cleaning.rs
 *
 *  inkstat - meeting room status on e-paper
 *	(c) 2020-26 Stuart Hunter
 *
 *	Solid colour sweeps that shake residual pigment loose
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

use embedded_hal::delay::DelayNs;
use log::info;

use crate::constants::{CLEANING_CYCLES, CLEANING_PAUSE_MS, CLEANING_SEQUENCE};
use crate::display::error::DisplayError;
use crate::display::traits::PanelDriver;
use crate::func_timer::FunctionTimer;
use crate::vframebuf::Frame;

/// Sweep the panel `CLEANING_CYCLES` times through accent, black and white.
///
/// Each colour is pushed as a full frame with a matching border, followed
/// by a settling pause. The first failed transmission aborts the run.
/// Returns the number of frames shown.
pub fn run<D: DelayNs>(panel: &mut dyn PanelDriver, delay: &mut D) -> Result<usize, DisplayError> {
    let _timer = FunctionTimer::new("cleaning");
    let (width, height) = panel.dimensions();
    let mut shown = 0;

    for cycle in 1..=CLEANING_CYCLES {
        for colour in CLEANING_SEQUENCE {
            info!("cleaning cycle {} of {}: {:?}", cycle, CLEANING_CYCLES, colour);
            panel.set_border(colour);
            panel.set_image(&Frame::new(width, height, colour))?;
            panel.show()?;
            shown += 1;
            delay.delay_ms(CLEANING_PAUSE_MS);
        }
    }

    info!("cleaning complete, {} frames", shown);
    Ok(shown)
}
