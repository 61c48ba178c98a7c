/*
 *  config.rs
 *
 *  inkstat - meeting room status on e-paper
 *	(c) 2020-26 Stuart Hunter
 *
 *	Layered configuration: defaults, YAML file, CLI overrides
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

use chrono::NaiveTime;
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use dirs_next::home_dir;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};
use thiserror::Error;

use crate::display::color::PanelColour;

/// Error type for config loading/validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Validation error: {0}")]
    Validation(String),
}

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_STATUS_HOST: &str = "localhost";
pub const DEFAULT_STATUS_PORT: u16 = 1337;
pub const DEFAULT_STATUS_PATH: &str = "/get";

/// Top-level app configuration. Every field is optional so files and CLI
/// flags can be layered; the accessors fill in defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub log_level: Option<String>,     // e.g., "info" | "debug"
    /// directory holding background.png and assets/
    pub assets_dir: Option<PathBuf>,
    pub status: Option<StatusConfig>,
    pub panel: Option<PanelConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StatusConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PanelConfig {
    pub colour: Option<PanelColour>,
    pub driver: Option<DriverKind>,
    pub rotate_deg: Option<u16>,
    pub spi_bus: Option<String>,       // e.g. "/dev/spidev0.0"
    pub gpio_chip: Option<String>,     // e.g. "/dev/gpiochip0"
    pub reset_pin: Option<u32>,        // BCM numbering
    pub busy_pin: Option<u32>,
    pub dc_pin: Option<u32>,
    pub spi_speed_hz: Option<u32>,
    pub preview_path: Option<PathBuf>,
}

/// Which panel implementation to open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    /// Inky pHAT over SPI and GPIO
    #[default]
    Inky,
    /// Write each shown frame to a PNG
    Preview,
}

/// Panel settings with every default applied
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSettings {
    pub colour: PanelColour,
    pub driver: DriverKind,
    pub rotate_deg: u16,
    pub spi_bus: String,
    pub gpio_chip: String,
    pub reset_pin: u32,
    pub busy_pin: u32,
    pub dc_pin: u32,
    pub spi_speed_hz: u32,
    pub preview_path: PathBuf,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            colour: PanelColour::default(),
            driver: DriverKind::default(),
            rotate_deg: 180,
            spi_bus: "/dev/spidev0.0".to_string(),
            gpio_chip: "/dev/gpiochip0".to_string(),
            reset_pin: 27,
            busy_pin: 17,
            dc_pin: 22,
            spi_speed_hz: 488_000,
            preview_path: PathBuf::from("inkstat-preview.png"),
        }
    }
}

impl Config {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.assets_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// `http://<host>:<port><path>`
    pub fn status_url(&self) -> String {
        let status = self.status.clone().unwrap_or_default();
        format!(
            "http://{}:{}{}",
            status.host.as_deref().unwrap_or(DEFAULT_STATUS_HOST),
            status.port.unwrap_or(DEFAULT_STATUS_PORT),
            status.path.as_deref().unwrap_or(DEFAULT_STATUS_PATH),
        )
    }

    pub fn panel(&self) -> PanelSettings {
        let d = PanelSettings::default();
        let Some(p) = self.panel.clone() else { return d };
        PanelSettings {
            colour: p.colour.unwrap_or(d.colour),
            driver: p.driver.unwrap_or(d.driver),
            rotate_deg: p.rotate_deg.unwrap_or(d.rotate_deg),
            spi_bus: p.spi_bus.unwrap_or(d.spi_bus),
            gpio_chip: p.gpio_chip.unwrap_or(d.gpio_chip),
            reset_pin: p.reset_pin.unwrap_or(d.reset_pin),
            busy_pin: p.busy_pin.unwrap_or(d.busy_pin),
            dc_pin: p.dc_pin.unwrap_or(d.dc_pin),
            spi_speed_hz: p.spi_speed_hz.unwrap_or(d.spi_speed_hz),
            preview_path: p.preview_path.unwrap_or(d.preview_path),
        }
    }

    /// Pretty YAML of the effective config
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// CLI overrides. All fields are Options so we can layer them over YAML.
#[derive(Debug, Parser, Clone, Default)]
#[command(name = "inkstat", about = "Meeting room status on e-paper", version)]
pub struct Cli {
    /// Path to a YAML config file (overrides search)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub log_level: Option<String>,
    /// Directory holding background.png and assets/
    #[arg(long, value_hint = ValueHint::DirPath)]
    pub assets_dir: Option<PathBuf>,
    #[arg(long)]
    pub status_host: Option<String>,
    #[arg(long)]
    pub status_port: Option<u16>,
    #[arg(long, value_enum)]
    pub panel_colour: Option<PanelColour>,
    #[arg(long, value_enum)]
    pub panel_driver: Option<DriverKind>,
    #[arg(long)]
    pub rotate_deg: Option<u16>,
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub preview_path: Option<PathBuf>,
    /// Pretend the wall clock reads HH:MM
    #[arg(long, value_parser = parse_hhmm)]
    pub now: Option<NaiveTime>,
    /// dump fully merged config (after overrides) and exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub dump_config: bool,
}

fn parse_hhmm(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("expected HH:MM, {e}"))
}

/// Public entry point: read YAML, merge CLI, validate.
pub fn load(cli: &Cli) -> Result<Config, ConfigError> {
    // 1) defaults (from `Default` impl)
    let mut cfg = Config::default();

    // 2) YAML file (explicit path or search)
    if let Some(p) = cli.config.as_ref() {
        if p.exists() {
            let y = read_yaml(p)?;
            merge(&mut cfg, y);
        } else {
            return Err(ConfigError::Validation(format!(
                "Config file not found: {}",
                p.display()
            )));
        }
    } else if let Some(p) = find_config_file() {
        let y = read_yaml(&p)?;
        merge(&mut cfg, y);
    }

    // 3) CLI overrides (highest precedence)
    apply_cli_overrides(&mut cfg, cli);

    // 4) Validate
    validate(&cfg)?;

    Ok(cfg)
}

/// Try common locations in order (first hit wins).
fn find_config_file() -> Option<PathBuf> {
    // XDG-style: ~/.config/inkstat/config.yaml
    if let Some(home) = home_dir() {
        let p = home.join(".config/inkstat/config.yaml");
        if p.exists() { return Some(p) }
        let p = home.join(".config/inkstat.yaml");
        if p.exists() { return Some(p) }
    }
    // project local
    for candidate in &["inkstat.yaml", "config.yaml"] {
        let p = PathBuf::from(candidate);
        if p.exists() { return Some(p) }
    }
    None
}

fn read_yaml(path: &Path) -> Result<Config, ConfigError> {
    let s = fs::read_to_string(path)?;
    let cfg: Config = serde_yaml::from_str(&s)?;
    Ok(cfg)
}

/// Shallow merge `src` into `dst`, Option-by-Option.
fn merge(dst: &mut Config, src: Config) {
    if src.log_level.is_some()   { dst.log_level = src.log_level; }
    if src.assets_dir.is_some()  { dst.assets_dir = src.assets_dir; }
    match (&mut dst.status, src.status) {
        (None, Some(s)) => dst.status = Some(s),
        (Some(d), Some(s)) => merge_status(d, s),
        _ => {}
    }
    match (&mut dst.panel, src.panel) {
        (None, Some(p)) => dst.panel = Some(p),
        (Some(d), Some(p)) => merge_panel(d, p),
        _ => {}
    }
}

fn merge_status(dst: &mut StatusConfig, src: StatusConfig) {
    if src.host.is_some() { dst.host = src.host; }
    if src.port.is_some() { dst.port = src.port; }
    if src.path.is_some() { dst.path = src.path; }
}

fn merge_panel(dst: &mut PanelConfig, src: PanelConfig) {
    if src.colour.is_some()       { dst.colour = src.colour; }
    if src.driver.is_some()       { dst.driver = src.driver; }
    if src.rotate_deg.is_some()   { dst.rotate_deg = src.rotate_deg; }
    if src.spi_bus.is_some()      { dst.spi_bus = src.spi_bus; }
    if src.gpio_chip.is_some()    { dst.gpio_chip = src.gpio_chip; }
    if src.reset_pin.is_some()    { dst.reset_pin = src.reset_pin; }
    if src.busy_pin.is_some()     { dst.busy_pin = src.busy_pin; }
    if src.dc_pin.is_some()       { dst.dc_pin = src.dc_pin; }
    if src.spi_speed_hz.is_some() { dst.spi_speed_hz = src.spi_speed_hz; }
    if src.preview_path.is_some() { dst.preview_path = src.preview_path; }
}

fn apply_cli_overrides(cfg: &mut Config, cli: &Cli) {
    if cli.log_level.is_some()  { cfg.log_level = cli.log_level.clone(); }
    if cli.assets_dir.is_some() { cfg.assets_dir = cli.assets_dir.clone(); }

    if cli.status_host.is_some() || cli.status_port.is_some() {
        let status = cfg.status.get_or_insert_with(StatusConfig::default);
        if cli.status_host.is_some() { status.host = cli.status_host.clone(); }
        if cli.status_port.is_some() { status.port = cli.status_port; }
    }

    let any_panel = cli.panel_colour.is_some()
        || cli.panel_driver.is_some()
        || cli.rotate_deg.is_some()
        || cli.preview_path.is_some();
    if any_panel {
        let panel = cfg.panel.get_or_insert_with(PanelConfig::default);
        if cli.panel_colour.is_some() { panel.colour = cli.panel_colour; }
        if cli.panel_driver.is_some() { panel.driver = cli.panel_driver; }
        if cli.rotate_deg.is_some()   { panel.rotate_deg = cli.rotate_deg; }
        if cli.preview_path.is_some() { panel.preview_path = cli.preview_path.clone(); }
    }
}

/// Put any invariants here (required fields, ranges, etc.)
pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if let Some(status) = cfg.status.as_ref() {
        if status.host.as_deref().is_some_and(|h| h.trim().is_empty()) {
            return Err(ConfigError::Validation("status host must not be empty".into()));
        }
        if status.port == Some(0) {
            return Err(ConfigError::Validation("status port must be > 0".into()));
        }
        if status.path.as_deref().is_some_and(|p| !p.starts_with('/')) {
            return Err(ConfigError::Validation("status path must start with '/'".into()));
        }
    }

    let panel = cfg.panel();
    match panel.rotate_deg {
        0 | 180 => {},
        _ => return Err(ConfigError::Validation("panel rotate_deg must be 0|180".into()))
    }
    let pins = [panel.reset_pin, panel.busy_pin, panel.dc_pin];
    if pins[0] == pins[1] || pins[0] == pins[2] || pins[1] == pins[2] {
        return Err(ConfigError::Validation(format!(
            "panel reset/busy/dc pins must be distinct, got {:?}",
            pins
        )));
    }
    if panel.spi_speed_hz == 0 {
        return Err(ConfigError::Validation("panel spi_speed_hz must be > 0".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn scratch_file(body: &str) -> NamedTempFile {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        fs::write(file.path(), body).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.log_level(), "info");
        assert_eq!(cfg.status_url(), "http://localhost:1337/get");
        assert_eq!(cfg.assets_dir(), PathBuf::from("."));
        let panel = cfg.panel();
        assert_eq!(panel.rotate_deg, 180);
        assert_eq!(panel.colour, PanelColour::Black);
        assert_eq!(panel.driver, DriverKind::Inky);
        assert_eq!((panel.reset_pin, panel.busy_pin, panel.dc_pin), (27, 17, 22));
        assert!(validate(&cfg).is_ok());
    }

    #[test]
    fn test_yaml_then_cli_precedence() {
        let file = scratch_file(
            "log_level: debug\nstatus:\n  host: pi.local\n  port: 8080\npanel:\n  colour: red\n  rotate_deg: 0\n",
        );
        let cli = Cli {
            config: Some(file.path().to_path_buf()),
            status_port: Some(9000),
            panel_driver: Some(DriverKind::Preview),
            ..Default::default()
        };
        let cfg = load(&cli).unwrap();
        assert_eq!(cfg.log_level(), "debug");
        assert_eq!(cfg.status_url(), "http://pi.local:9000/get");
        let panel = cfg.panel();
        assert_eq!(panel.colour, PanelColour::Red);
        assert_eq!(panel.driver, DriverKind::Preview);
        assert_eq!(panel.rotate_deg, 0);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let cli = Cli {
            config: Some(PathBuf::from("/nonexistent/inkstat.yaml")),
            ..Default::default()
        };
        assert!(matches!(load(&cli), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_bad_yaml_is_an_error() {
        let file = scratch_file("panel: [not, a, map\n");
        let cli = Cli { config: Some(file.path().to_path_buf()), ..Default::default() };
        assert!(matches!(load(&cli), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_validation() {
        let mut cfg = Config {
            panel: Some(PanelConfig { rotate_deg: Some(90), ..Default::default() }),
            ..Default::default()
        };
        assert!(validate(&cfg).is_err());

        cfg.panel = Some(PanelConfig { dc_pin: Some(17), ..Default::default() });
        assert!(validate(&cfg).is_err());

        cfg.panel = None;
        cfg.status = Some(StatusConfig { port: Some(0), ..Default::default() });
        assert!(validate(&cfg).is_err());

        cfg.status = Some(StatusConfig { host: Some(" ".into()), ..Default::default() });
        assert!(validate(&cfg).is_err());
    }

    #[test]
    fn test_cli_parses_now_and_enums() {
        let cli = Cli::try_parse_from([
            "inkstat", "--now", "10:15", "--panel-colour", "yellow", "--panel-driver", "preview",
        ])
        .unwrap();
        assert_eq!(cli.now, NaiveTime::from_hms_opt(10, 15, 0));
        assert_eq!(cli.panel_colour, Some(PanelColour::Yellow));
        assert_eq!(cli.panel_driver, Some(DriverKind::Preview));
        assert!(Cli::try_parse_from(["inkstat", "--now", "25:99"]).is_err());
    }

    #[test]
    fn test_dump_roundtrips_through_yaml() {
        let cfg = Config {
            log_level: Some("warn".into()),
            panel: Some(PanelConfig { colour: Some(PanelColour::Yellow), ..Default::default() }),
            ..Default::default()
        };
        let back: Config = serde_yaml::from_str(&cfg.to_yaml().unwrap()).unwrap();
        assert_eq!(back, cfg);
    }
}
