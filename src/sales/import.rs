//! CSV parsing for the daily sales upload. The export uses the dashboard's
//! column headers; blank numeric cells count as zero.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::domain::DailySalesRow;

/// Failures while decoding an uploaded CSV document.
#[derive(Debug, thiserror::Error)]
pub enum SalesImportError {
    #[error("failed to read sales CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: cannot parse '{value}' as a date")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: monetary amounts must be non-negative")]
    NegativeAmount { row: usize },
    #[error("upload contained no data rows")]
    Empty,
}

pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<DailySalesRow>, SalesImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (index, record) in csv_reader.deserialize::<SalesCsvRow>().enumerate() {
        let row_number = index + 1;
        let raw = record?;

        let date = parse_date(&raw.date).ok_or_else(|| SalesImportError::InvalidDate {
            row: row_number,
            value: raw.date.clone(),
        })?;

        if raw.gross_commission < 0 || raw.total_purchases < 0 {
            return Err(SalesImportError::NegativeAmount { row: row_number });
        }

        rows.push(DailySalesRow {
            date,
            clicks: raw.clicks,
            orders: raw.orders,
            gross_commission: raw.gross_commission,
            products_sold: raw.products_sold,
            total_purchases: raw.total_purchases,
            new_buyers: raw.new_buyers,
        });
    }

    if rows.is_empty() {
        return Err(SalesImportError::Empty);
    }

    Ok(rows)
}

#[derive(Debug, Deserialize)]
struct SalesCsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Clicks", default, deserialize_with = "blank_as_zero_u32")]
    clicks: u32,
    #[serde(rename = "Orders", default, deserialize_with = "blank_as_zero_u32")]
    orders: u32,
    #[serde(
        rename = "Gross Commission",
        default,
        deserialize_with = "blank_as_zero_i64"
    )]
    gross_commission: i64,
    #[serde(
        rename = "Products Sold",
        default,
        deserialize_with = "blank_as_zero_u32"
    )]
    products_sold: u32,
    #[serde(
        rename = "Total Purchases",
        default,
        deserialize_with = "blank_as_zero_i64"
    )]
    total_purchases: i64,
    #[serde(rename = "New Buyers", default, deserialize_with = "blank_as_zero_u32")]
    new_buyers: u32,
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }

    // Spreadsheet exports from the upload tab sometimes carry DD/MM/YYYY.
    NaiveDate::parse_from_str(trimmed, "%d/%m/%Y").ok()
}

fn blank_as_zero_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(0),
        Some(raw) => raw.parse().map_err(serde::de::Error::custom),
    }
}

fn blank_as_zero_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(0),
        Some(raw) => raw.parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str =
        "Date,Clicks,Orders,Gross Commission,Products Sold,Total Purchases,New Buyers\n";

    #[test]
    fn parses_well_formed_rows() {
        let csv = format!(
            "{HEADER}2024-12-01,1250,45,2500000,67,45000000,23\n2024-12-02,1180,38,2100000,52,38500000,19\n"
        );
        let rows = parse_rows(Cursor::new(csv)).expect("parses");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].clicks, 1250);
        assert_eq!(rows[1].total_purchases, 38_500_000);
    }

    #[test]
    fn accepts_slash_dates_and_blank_counters() {
        let csv = format!("{HEADER}01/12/2024,,,2500000,,45000000,\n");
        let rows = parse_rows(Cursor::new(csv)).expect("parses");
        assert_eq!(
            rows[0].date,
            NaiveDate::from_ymd_opt(2024, 12, 1).expect("valid date")
        );
        assert_eq!(rows[0].clicks, 0);
        assert_eq!(rows[0].new_buyers, 0);
    }

    #[test]
    fn rejects_unparseable_dates_with_row_number() {
        let csv = format!("{HEADER}2024-12-01,1,1,100,1,1000,1\nyesterday,1,1,100,1,1000,1\n");
        let error = parse_rows(Cursor::new(csv)).expect_err("fails");
        match error {
            SalesImportError::InvalidDate { row, value } => {
                assert_eq!(row, 2);
                assert_eq!(value, "yesterday");
            }
            other => panic!("expected invalid date, got {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_amounts() {
        let csv = format!("{HEADER}2024-12-01,1,1,-5,1,1000,1\n");
        let error = parse_rows(Cursor::new(csv)).expect_err("fails");
        assert!(matches!(
            error,
            SalesImportError::NegativeAmount { row: 1 }
        ));
    }

    #[test]
    fn rejects_empty_uploads() {
        let error = parse_rows(Cursor::new(HEADER.to_string())).expect_err("fails");
        assert!(matches!(error, SalesImportError::Empty));
    }
}
