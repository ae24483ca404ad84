// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use csv::ReaderBuilder;
use reqwest::Client;
use tracing::{info, warn};

use super::get_ok;
use crate::config::SheetConfig;
use crate::error::FetchError;
use crate::models::{DonationFigures, FigureSource};

const RAISED_FIELD: usize = 1;
const NEEDED_FIELD: usize = 2;

/// Download the sheet's CSV export and read the latest raised/needed pair.
pub async fn fetch_donation_figures(
    client: &Client,
    sheet: &SheetConfig,
) -> Result<DonationFigures, FetchError> {
    let response = get_ok(client, sheet.csv_url()).await?;
    let body = response.text().await?;
    parse_donation_csv(&body)
}

/// Like [`fetch_donation_figures`], but any failure yields the configured
/// backup pair. The pair is always replaced as a whole.
pub async fn fetch_donation_figures_or_backup(
    client: &Client,
    sheet: &SheetConfig,
) -> (DonationFigures, FigureSource) {
    match fetch_donation_figures(client, sheet).await {
        Ok(figures) => {
            info!(raised = figures.raised, needed = figures.needed, "donation figures fetched");
            (figures, FigureSource::Live)
        }
        Err(e) => {
            warn!(error = %e, "using backup donation figures");
            (sheet.backup, FigureSource::Backup)
        }
    }
}

/// Extract the figures from the last non-blank row of a CSV export.
pub fn parse_donation_csv(body: &str) -> Result<DonationFigures, FetchError> {
    let rows: Vec<&str> = body.lines().filter(|row| !row.trim().is_empty()).collect();
    if rows.len() < 2 {
        return Err(FetchError::InsufficientData { lines: rows.len() });
    }

    let fields = split_row(rows[rows.len() - 1])?;
    let raised = amount_at(&fields, RAISED_FIELD)?;
    let needed = amount_at(&fields, NEEDED_FIELD)?;

    if raised == 0.0 && needed == 0.0 {
        return Err(FetchError::ZeroFigures);
    }

    Ok(DonationFigures { raised, needed })
}

/// Quote-aware split of a single CSV line.
fn split_row(row: &str) -> Result<Vec<String>, FetchError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(row.as_bytes());

    match reader.records().next() {
        Some(record) => Ok(record?.iter().map(str::to_string).collect()),
        None => Ok(Vec::new()),
    }
}

fn amount_at(fields: &[String], index: usize) -> Result<f64, FetchError> {
    let raw = fields
        .get(index)
        .ok_or(FetchError::MissingField { index })?;

    parse_amount(raw).ok_or_else(|| FetchError::InvalidNumber {
        field: index,
        raw: raw.clone(),
    })
}

/// Read a sheet-formatted amount such as `R$ 7.734,45`.
///
/// Everything but digits and commas is dropped, then the first comma becomes
/// the decimal point. Signs are dropped too, so the result is never negative.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',')
        .collect();

    cleaned
        .replacen(',', ".", 1)
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_server::{closed_port, serve_once};
    use approx::assert_relative_eq;

    fn sheet_at(base_url: String) -> SheetConfig {
        SheetConfig {
            base_url,
            ..SheetConfig::default()
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("R$ 7.734,45"), Some(7734.45));
        assert_eq!(parse_amount("46181,25"), Some(46181.25));
        assert_eq!(parse_amount("1.234"), Some(1234.0));
        assert_eq!(parse_amount("-12,5"), Some(12.5));
        assert_eq!(parse_amount("  300 "), Some(300.0));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("R$ --"), None);
        assert_eq!(parse_amount(","), None);
        assert_eq!(parse_amount("1,2,3"), None);
    }

    #[test]
    fn test_quoted_fields_keep_their_commas() -> Result<(), FetchError> {
        let csv = "\"Label\",\"Raised\",\"Needed\"\n\"Total\",\"R$ 1.234,56\",\"R$ 56.789,01\"\n";
        let figures = parse_donation_csv(csv)?;
        assert_relative_eq!(figures.raised, 1234.56);
        assert_relative_eq!(figures.needed, 56789.01);
        Ok(())
    }

    #[test]
    fn test_unquoted_row_splits_on_every_comma() -> Result<(), FetchError> {
        // without quotes the decimal commas are field separators
        let csv = "label,raised,needed\nlabel,1.234,56,56.789,01";
        let figures = parse_donation_csv(csv)?;
        assert_relative_eq!(figures.raised, 1234.0);
        assert_relative_eq!(figures.needed, 56.0);
        Ok(())
    }

    #[test]
    fn test_last_non_blank_row_wins() -> Result<(), FetchError> {
        let csv = "h,a,b\r\nx,\"10,00\",\"100,00\"\r\ny,\"20,00\",\"200,00\"\r\n\r\n   \r\n";
        let figures = parse_donation_csv(csv)?;
        assert_eq!(figures, DonationFigures { raised: 20.0, needed: 200.0 });
        Ok(())
    }

    #[test]
    fn test_insufficient_rows() {
        for body in ["", "\n\n  \n", "only,a,header\n\n"] {
            assert!(matches!(
                parse_donation_csv(body),
                Err(FetchError::InsufficientData { .. })
            ));
        }
    }

    #[test]
    fn test_missing_and_invalid_fields() {
        assert!(matches!(
            parse_donation_csv("h\nx,\"10,00\""),
            Err(FetchError::MissingField { index: 2 })
        ));
        assert!(matches!(
            parse_donation_csv("h\nx,abc,\"10,00\""),
            Err(FetchError::InvalidNumber { field: 1, .. })
        ));
        assert!(matches!(
            parse_donation_csv("h\nx,\"0,00\",\"0\""),
            Err(FetchError::ZeroFigures)
        ));
    }

    #[tokio::test]
    async fn test_fetch_live_figures() -> Result<(), FetchError> {
        let server = serve_once(
            200,
            "text/csv",
            "\"\",\"Arrecadado\",\"Necessario\"\n\"D4\",\"R$ 9.100,00\",\"R$ 46.181,25\"\n",
        )
        .await;
        let sheet = sheet_at(server.base_url.clone());

        let (figures, source) = fetch_donation_figures_or_backup(&Client::new(), &sheet).await;
        assert_eq!(source, FigureSource::Live);
        assert_relative_eq!(figures.raised, 9100.0);
        assert_relative_eq!(figures.needed, 46181.25);

        let request_line = server.request.await.unwrap();
        assert!(request_line.starts_with(&format!(
            "GET /{}/gviz/tq?tqx=out:csv&sheet=D4 ",
            sheet.sheet_id
        )));
        Ok(())
    }

    #[tokio::test]
    async fn test_error_status_falls_back() {
        let server = serve_once(503, "text/plain", "unavailable").await;
        let sheet = sheet_at(server.base_url.clone());

        let err = fetch_donation_figures(&Client::new(), &sheet).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status, .. } if status.as_u16() == 503));

        let server = serve_once(404, "text/plain", "").await;
        let sheet = sheet_at(server.base_url.clone());
        let (figures, source) = fetch_donation_figures_or_backup(&Client::new(), &sheet).await;
        assert_eq!(source, FigureSource::Backup);
        assert_eq!(figures, SheetConfig::default().backup);
    }

    #[tokio::test]
    async fn test_short_body_falls_back() {
        let server = serve_once(200, "text/csv", "\"only\",\"a\",\"header\"\n").await;
        let sheet = sheet_at(server.base_url.clone());

        let (figures, source) = fetch_donation_figures_or_backup(&Client::new(), &sheet).await;
        assert!(source.is_backup());
        assert_eq!(figures, sheet.backup);
    }

    #[tokio::test]
    async fn test_unreachable_sheet_falls_back() {
        let sheet = sheet_at(closed_port().await);

        let err = fetch_donation_figures(&Client::new(), &sheet).await.unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));

        let (figures, source) = fetch_donation_figures_or_backup(&Client::new(), &sheet).await;
        assert!(source.is_backup());
        assert_eq!(figures, sheet.backup);
    }
}
