//! CSV bar loading: a plain no-quoting comma split with a deterministic
//! re-sort into [`Bar`]/[`Money`] values.
//!
//! Required columns: `symbol`, `timestamp` (`%Y-%m-%d %H:%M:%S`), `open`,
//! `high`, `low`, `close`, `volume`. Optional: `timeframe` (default `1d`),
//! `closed` (bool; default `true`).

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use btq_decimal::Money;
use btq_market::{Bar, Timeframe};
use rust_decimal::Decimal;

pub fn load_csv_file(path: &str) -> Result<Vec<Bar>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read bars csv: {path}"))?;
    parse_csv_bars(&raw).with_context(|| format!("parse bars csv: {path}"))
}

pub fn parse_csv_bars(csv: &str) -> Result<Vec<Bar>> {
    let mut lines = csv.lines();

    let header_line = lines.next().context("empty bars csv")?;
    let header_line = header_line.trim().trim_start_matches('\u{feff}');
    if header_line.is_empty() {
        bail!("empty bars csv header");
    }

    let headers: Vec<String> = split_csv_line(header_line);
    let mut idx: BTreeMap<String, usize> = BTreeMap::new();
    for (i, h) in headers.iter().enumerate() {
        idx.insert(h.trim().to_string(), i);
    }

    let col_symbol = find_required(&idx, "symbol")?;
    let col_timestamp = find_required(&idx, "timestamp")?;
    let col_open = find_required(&idx, "open")?;
    let col_high = find_required(&idx, "high")?;
    let col_low = find_required(&idx, "low")?;
    let col_close = find_required(&idx, "close")?;
    let col_volume = find_required(&idx, "volume")?;

    let col_timeframe = idx.get("timeframe").copied();
    let col_closed = idx.get("closed").copied();

    let mut out: Vec<Bar> = Vec::new();

    for (line_idx0, raw) in lines.enumerate() {
        let line_no = line_idx0 + 2;
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }

        let fields = split_csv_line(raw);
        let get = |col: usize| -> Result<&str> {
            fields
                .get(col)
                .map(|s| s.as_str())
                .with_context(|| format!("line {line_no}: missing column index {col}"))
        };

        let symbol = get(col_symbol)?.trim().to_string();
        if symbol.is_empty() {
            bail!("line {line_no}: symbol is empty");
        }

        let timestamp = chrono::NaiveDateTime::parse_from_str(get(col_timestamp)?.trim(), "%Y-%m-%d %H:%M:%S")
            .with_context(|| format!("line {line_no}: invalid timestamp"))?;

        let open = Money::parse(get(col_open)?.trim()).with_context(|| format!("line {line_no}: invalid open"))?;
        let high = Money::parse(get(col_high)?.trim()).with_context(|| format!("line {line_no}: invalid high"))?;
        let low = Money::parse(get(col_low)?.trim()).with_context(|| format!("line {line_no}: invalid low"))?;
        let close = Money::parse(get(col_close)?.trim()).with_context(|| format!("line {line_no}: invalid close"))?;
        let volume: Decimal = get(col_volume)?
            .trim()
            .parse()
            .with_context(|| format!("line {line_no}: invalid volume"))?;

        let timeframe = match col_timeframe {
            Some(c) => Timeframe::new(get(c)?.trim().to_string()),
            None => Timeframe::new("1d"),
        };

        let closed = match col_closed {
            Some(c) => parse_bool(get(c)?.trim()).with_context(|| format!("line {line_no}: invalid closed"))?,
            None => true,
        };

        let bar = Bar::restore(symbol, timeframe, timestamp, open, high, low, close, volume, closed)
            .with_context(|| format!("line {line_no}: inconsistent OHLC"))?;
        out.push(bar);
    }

    out.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.symbol.cmp(&b.symbol)));
    Ok(out)
}

fn find_required(idx: &BTreeMap<String, usize>, name: &str) -> Result<usize> {
    idx.get(name).copied().with_context(|| format!("missing header: {name}"))
}

fn parse_bool(s: &str) -> Result<bool> {
    match s {
        "1" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "false" | "FALSE" | "False" => Ok(false),
        other => bail!("expected boolean, got '{other}'"),
    }
}

fn split_csv_line(line: &str) -> Vec<String> {
    line.split(',').map(|s| s.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_sorts_deterministically() {
        let csv = "symbol,timestamp,open,high,low,close,volume\n\
                    MSFT,2023-01-02 09:30:00,10,12,9,11,100\n\
                    AAPL,2023-01-01 09:30:00,20,22,19,21,200\n";
        let bars = parse_csv_bars(csv).unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].symbol, "AAPL");
        assert_eq!(bars[1].symbol, "MSFT");
    }

    #[test]
    fn missing_required_header_is_an_error() {
        let csv = "symbol,timestamp,open,high,low,close\n\
                    AAPL,2023-01-01 09:30:00,20,22,19,21\n";
        assert!(parse_csv_bars(csv).is_err());
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let csv = "symbol,timestamp,open,high,low,close,volume\n\
                    \n\
                    # a comment\n\
                    AAPL,2023-01-01 09:30:00,20,22,19,21,200\n";
        let bars = parse_csv_bars(csv).unwrap();
        assert_eq!(bars.len(), 1);
    }
}
