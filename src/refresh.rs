/*
 *  refresh.rs
 *
 *  inkstat - meeting room status on e-paper
 *	(c) 2020-26 Stuart Hunter
 *
 *	Slow/fast refresh selection and the panel cleaning slots
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

use chrono::Timelike;
use std::fmt;

/// Minutes past the hour that get a full repaint.
pub const SLOW_MINUTES: [u32; 2] = [0, 30];

/// Hour of the day the cleaning slots fall in.
pub const CLEANING_HOUR: u32 = 10;
/// Minutes past `CLEANING_HOUR` that are cleaning slots.
pub const CLEANING_MINUTES: [u32; 2] = [0, 15];

/// Panel refresh strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Full repaint, flickers, clears ghosting
    Slow,
    /// Partial update, quick, ghosts over time
    Fast,
}

impl fmt::Display for RefreshMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshMode::Slow => write!(f, "slow"),
            RefreshMode::Fast => write!(f, "fast"),
        }
    }
}

/// What this invocation does to the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshDecision {
    pub mode: RefreshMode,
    /// Run the cleaning sweeps instead of rendering.
    /// Only ever set together with `RefreshMode::Slow`.
    pub clean: bool,
}

/// Full repaint on the hour and half hour, fast updates otherwise.
pub fn refresh_mode<T: Timelike>(now: &T) -> RefreshMode {
    if SLOW_MINUTES.contains(&now.minute()) {
        RefreshMode::Slow
    } else {
        RefreshMode::Fast
    }
}

/// Raw cleaning slot predicate (10:00 and 10:15), independent of the mode.
pub fn is_cleaning_slot<T: Timelike>(now: &T) -> bool {
    now.hour() == CLEANING_HOUR && CLEANING_MINUTES.contains(&now.minute())
}

/// Decide refresh mode and cleaning for a wall-clock time.
///
/// Cleaning drives the slow panel, so a slot that falls on a fast minute
/// (10:15) does not clean.
pub fn decide<T: Timelike>(now: &T) -> RefreshDecision {
    let mode = refresh_mode(now);
    let clean = mode == RefreshMode::Slow && is_cleaning_slot(now);
    RefreshDecision { mode, clean }
}
