// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use chrono::Local;
use reqwest::Client;
use tracing::{info, warn};

use super::get_ok;
use crate::config::RateConfig;
use crate::error::FetchError;
use crate::models::{ExchangeRate, RateSource, SeriesPoint};
use crate::progress::LoadingIndicator;

/// Fetch the most recent point of the configured SGS series.
pub async fn fetch_rate(client: &Client, rate: &RateConfig) -> Result<ExchangeRate, FetchError> {
    let response = get_ok(client, rate.latest_url()).await?;
    let body = response.text().await?;
    parse_rate_payload(&body)
}

/// Fetch the rate, falling back to the configured constant on any failure.
/// The loading indicator is cleared when this returns, whatever the outcome.
pub async fn fetch_rate_or_backup(
    client: &Client,
    rate: &RateConfig,
    loading: LoadingIndicator,
) -> ExchangeRate {
    let _loading = loading;

    match fetch_rate(client, rate).await {
        Ok(quote) => {
            info!(rate = quote.rate, observed_on = ?quote.observed_on, "exchange rate fetched");
            quote
        }
        Err(e) => {
            warn!(error = %e, fallback = rate.backup_rate, "using default exchange rate");
            ExchangeRate::backup(rate.backup_rate)
        }
    }
}

pub fn parse_rate_payload(body: &str) -> Result<ExchangeRate, FetchError> {
    let points: Vec<SeriesPoint> = serde_json::from_str(body)?;
    let point = points.first().ok_or(FetchError::EmptyPayload)?;

    let rate = point
        .value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite() && *r > 0.0)
        .ok_or_else(|| FetchError::InvalidRate {
            raw: point.value.clone(),
        })?;

    Ok(ExchangeRate {
        rate,
        observed_on: point.observed_on(),
        source: RateSource::Live,
        fetched_at: Local::now(),
    })
}
