pub mod file;
pub mod prices;
pub mod stdin;

use robo_advisor_core::Allocation;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;

/// Parse inline weights such as `"BIL=0.3,AGG=0.5,ACWI=0.2"`.
///
/// Order is kept as written. A repeated ticker is rejected rather than
/// silently overwritten.
pub fn parse_weights(spec: &str) -> Result<Allocation, Box<dyn std::error::Error>> {
    let mut allocation = Allocation::new();
    for part in spec.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (ticker, weight) = part
            .split_once('=')
            .ok_or_else(|| format!("Expected TICKER=WEIGHT, got '{part}'"))?;
        let ticker = ticker.trim();
        if allocation.contains(ticker) {
            return Err(format!("Duplicate ticker '{ticker}' in weights").into());
        }
        let weight: Decimal = weight
            .trim()
            .parse()
            .map_err(|e| format!("Invalid weight for {ticker}: {e}"))?;
        allocation.insert(ticker, weight);
    }
    Ok(allocation)
}

/// Load a typed input from `--input`, falling back to piped stdin.
pub fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        file::read_structured(path)
    } else if let Some(value) = stdin::read_stdin_as::<T>()? {
        Ok(value)
    } else {
        Err(format!("--input <file.json|file.yaml> or stdin required for {what}").into())
    }
}
