// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::{DateTime, Local, NaiveDate};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateSource {
    Live,
    Backup,
}

/// EUR→BRL rate as shown next to the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRate {
    pub rate: f64,
    /// Reference date reported by the series, when it could be read
    pub observed_on: Option<NaiveDate>,
    pub source: RateSource,
    pub fetched_at: DateTime<Local>,
}

impl ExchangeRate {
    pub fn backup(rate: f64) -> Self {
        Self {
            rate,
            observed_on: None,
            source: RateSource::Backup,
            fetched_at: Local::now(),
        }
    }

    /// Caption under the rate: a timestamp for live data, a notice otherwise.
    pub fn status_label(&self) -> String {
        match self.source {
            RateSource::Live => format!("Updated at: {}", self.fetched_at.format("%H:%M:%S")),
            RateSource::Backup => "Default rate (API unavailable)".to_string(),
        }
    }
}

/// One data point of an SGS series. Values come back as strings; only
/// `valor` is required.
#[derive(Debug, Deserialize)]
pub struct SeriesPoint {
    #[serde(rename = "data", default)]
    pub date: Option<String>,
    #[serde(rename = "valor")]
    pub value: String,
}

impl SeriesPoint {
    pub fn observed_on(&self) -> Option<NaiveDate> {
        self.date
            .as_deref()
            .and_then(|date| NaiveDate::parse_from_str(date.trim(), "%d/%m/%Y").ok())
    }
}
