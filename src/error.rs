/*
 *  error.rs
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

use thiserror::Error;

use crate::assets::AssetError;
use crate::compositor::RenderError;
use crate::config::ConfigError;
use crate::display::error::DisplayError;
use crate::status::FetchError;

/// Anything that ends an invocation early. All of these are fatal.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("assets: {0}")]
    Asset(#[from] AssetError),

    #[error("status fetch: {0}")]
    Fetch(#[from] FetchError),

    #[error("render: {0}")]
    Render(#[from] RenderError),

    #[error("panel: {0}")]
    Display(#[from] DisplayError),

    #[error("runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
