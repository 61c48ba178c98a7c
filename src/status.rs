/*
 *  status.rs
 *
 *  inkstat - meeting room status on e-paper
 *	(c) 2020-26 Stuart Hunter
 *
 *	Meeting, temperature and availability from the local status endpoint
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

use log::debug;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status fetch failures. None of these are retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failure or unreadable body
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    /// Endpoint answered with a non-2xx status
    #[error("status endpoint returned {0}")]
    Status(reqwest::StatusCode),
    /// Body was not the expected JSON document
    #[error("JSON deserialization error: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Meeting {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub time: String,
}

/// One reading of the status endpoint.
///
/// `{"meeting": {"title": .., "time": ..}, "temperature": 21.6, "availability": "busy"}`
/// Absent parts are skipped when drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub meeting: Option<Meeting>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub availability: Option<String>,
}

impl StatusSnapshot {
    pub fn from_json(body: &str) -> Result<Self, FetchError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Temperature as drawn, see `temperature_text`.
    pub fn temperature_text(&self) -> Option<String> {
        self.temperature.map(temperature_text)
    }
}

/// Positive readings are rounded to whole degrees, halves to even.
/// Zero and below are printed as a reading with at least one decimal
/// (`21.6` -> `"22"`, `2.5` -> `"2"`, `-3.2` -> `"-3.2"`, `-3.0` -> `"-3.0"`).
pub fn temperature_text(temperature: f64) -> String {
    if temperature > 0.0 {
        format!("{}", temperature.round_ties_even() as i64)
    } else if temperature.fract() == 0.0 {
        format!("{:.1}", temperature)
    } else {
        format!("{}", temperature)
    }
}

/// Anything that can produce a status snapshot.
#[allow(async_fn_in_trait)]
pub trait StatusSource {
    async fn fetch(&self) -> Result<StatusSnapshot, FetchError>;
}

/// Single GET against the status endpoint.
///
/// No timeout is configured: a hung endpoint holds the invocation until the
/// scheduler's next run replaces it.
#[derive(Debug)]
pub struct HttpStatusSource {
    url: String,
    client: Client,
}

impl HttpStatusSource {
    pub fn new(url: impl Into<String>) -> Result<Self, FetchError> {
        const VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

        let mut headers = header::HeaderMap::new();
        headers.insert("User-Agent", header::HeaderValue::from_static(VERSION));
        headers.insert("Accept", header::HeaderValue::from_static("application/json"));
        headers.insert("Connection", header::HeaderValue::from_static("close"));

        let client = Client::builder()
            .http1_only()
            .default_headers(headers)
            .build()?;

        Ok(Self { url: url.into(), client })
    }
}

impl StatusSource for HttpStatusSource {
    async fn fetch(&self) -> Result<StatusSnapshot, FetchError> {
        let response = self.client.get(&self.url).send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }
        let body = response.text().await?;
        let snapshot = StatusSnapshot::from_json(&body)?;
        debug!("status from {}: {:?}", self.url, snapshot);
        Ok(snapshot)
    }
}
