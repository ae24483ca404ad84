// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong while pulling live data from the two upstream
/// sources. Callers normally collapse these into backup values.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("insufficient data: expected at least 2 non-empty lines, got {lines}")]
    InsufficientData { lines: usize },

    #[error("malformed csv row: {0}")]
    Csv(#[from] csv::Error),

    #[error("last row has no field at index {index}")]
    MissingField { index: usize },

    #[error("field {field} is not a number: {raw:?}")]
    InvalidNumber { field: usize, raw: String },

    #[error("both raised and needed amounts are zero")]
    ZeroFigures,

    #[error("empty payload")]
    EmptyPayload,

    #[error("invalid exchange rate: {raw:?}")]
    InvalidRate { raw: String },

    #[error("could not decode payload: {0}")]
    Decode(#[from] serde_json::Error),
}
