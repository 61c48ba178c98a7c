/*
 *  main.rs
 *
 *  inkstat - meeting room status on e-paper
 *	(c) 2020-26 Stuart Hunter
 *
 *	One shot: run from cron every minute
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

use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use env_logger::Env;
use linux_embedded_hal::Delay;
use log::{error, info};

use inkstat::config::{self, Cli, Config};
use inkstat::display::PanelDriverFactory;
use inkstat::status::HttpStatusSource;
use inkstat::{AppError, Outcome, Pipeline};

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

fn main() -> ExitCode {
    let cli = Cli::parse();

    let cfg = match config::load(&cli) {
        Ok(cfg) => cfg,
        Err(e) => {
            // logger is configured from the config, so nothing to log through yet
            eprintln!("{}: {}", env!("CARGO_PKG_NAME"), e);
            return ExitCode::FAILURE;
        }
    };

    if cli.dump_config {
        return match cfg.to_yaml() {
            Ok(s) => {
                println!("{s}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}: {}", env!("CARGO_PKG_NAME"), e);
                ExitCode::FAILURE
            }
        };
    }

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("{} - {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_DESCRIPTION"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    match run(&cli, &cfg) {
        Ok(outcome) => {
            info!("finished: {:?}", outcome);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli, cfg: &Config) -> Result<Outcome, AppError> {
    let now = cli.now.unwrap_or_else(|| Local::now().time());
    let panel = cfg.panel();

    let mut pipeline = Pipeline {
        source: HttpStatusSource::new(cfg.status_url())?,
        delay: Delay {},
        assets_dir: cfg.assets_dir(),
        rotate_180: panel.rotate_deg == 180,
        factory: PanelDriverFactory::new(panel),
    };

    // one request per run, a current-thread runtime is plenty
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(pipeline.run_once(&now))
}
