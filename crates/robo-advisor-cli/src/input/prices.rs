use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use robo_advisor_core::performance::provider::{InMemoryPriceHistory, PricePoint, PriceSeries};

use super::file;

/// One row of a long-format price file: `date,ticker,close`.
#[derive(Debug, Deserialize)]
struct PriceRow {
    date: NaiveDate,
    ticker: String,
    close: Decimal,
}

/// Load closing prices from a CSV (`date,ticker,close`) or a JSON/YAML list
/// of `{ticker, points: [{date, close}]}` series.
pub fn read_prices(path: &str) -> Result<InMemoryPriceHistory, Box<dyn std::error::Error>> {
    match file::extension(path).as_deref() {
        Some("csv") => parse_csv(&file::read_to_string(path)?),
        _ => {
            let series: Vec<PriceSeries> = file::read_structured(path)?;
            Ok(InMemoryPriceHistory::from_series(series))
        }
    }
}

fn parse_csv(text: &str) -> Result<InMemoryPriceHistory, Box<dyn std::error::Error>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let mut history = InMemoryPriceHistory::new();
    let mut rows = 0usize;
    for record in reader.deserialize::<PriceRow>() {
        let row = record.map_err(|e| format!("Invalid price row: {e}"))?;
        history.insert(
            row.ticker,
            [PricePoint {
                date: row.date,
                close: row.close,
            }],
        );
        rows += 1;
    }
    tracing::debug!(rows, tickers = history.tickers().len(), "price file parsed");
    Ok(history)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use robo_advisor_core::performance::provider::PriceHistoryProvider;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_long_format_csv() {
        let csv = "date,ticker,close\n\
                   2024-01-03,ACWI,101.5\n\
                   2024-01-02,ACWI,100\n\
                   2024-01-02,AGG, 95.25\n";
        let history = parse_csv(csv).unwrap();
        assert_eq!(history.tickers(), vec!["ACWI", "AGG"]);
        let acwi = history.closing_prices("ACWI").unwrap();
        assert_eq!(acwi.len(), 2);
        assert_eq!(acwi[0].close, dec!(100));
        assert_eq!(acwi[1].close, dec!(101.5));
    }

    #[test]
    fn test_bad_date_rejected() {
        let csv = "date,ticker,close\n03/01/2024,ACWI,101.5\n";
        assert!(parse_csv(csv).is_err());
    }
}
