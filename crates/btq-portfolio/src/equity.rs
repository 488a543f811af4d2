use std::collections::{BTreeMap, BTreeSet};

use btq_analytics::EquityPoint;
use btq_decimal::{Money, Timestamp};
use rust_decimal::Decimal;

/// Looks up a symbol's equity as of `t` as a step function: the last point
/// at or before `t`, or the curve's first point if `t` precedes it, or
/// `Money::ZERO` if the curve is empty.
fn value_at(curve: &[EquityPoint], t: Timestamp) -> Money {
    match curve.iter().rev().find(|p| p.timestamp <= t) {
        Some(p) => p.equity,
        None => curve.first().map(|p| p.equity).unwrap_or(Money::ZERO),
    }
}

/// Builds the portfolio's combined equity curve over the union timeline of
/// its per-symbol curves.
///
/// With `rebalancing_frequency_days == 0` rebalancing is disabled: the
/// combined curve is simply the sum of each symbol's independent curve at
/// every timestamp any symbol has a point.
///
/// With rebalancing enabled, per-symbol holdings are proportionally scaled
/// between rebalance events (`adjusted = base_adjusted * raw(t) /
/// base_raw`) and reset to `totalEquity * weight` at each boundary, per
/// its rebalancing rule — this lets rebalancing be layered on top of
/// independently-computed per-symbol backtests rather than requiring a
/// single joint simulation.
pub fn build_combined_curve(
    symbol_curves: &BTreeMap<String, Vec<EquityPoint>>,
    weights: &BTreeMap<String, Decimal>,
    rebalancing_frequency_days: i64,
) -> Vec<EquityPoint> {
    let mut timeline: BTreeSet<Timestamp> = BTreeSet::new();
    for curve in symbol_curves.values() {
        for point in curve {
            timeline.insert(point.timestamp);
        }
    }
    let timeline: Vec<Timestamp> = timeline.into_iter().collect();
    if timeline.is_empty() {
        return Vec::new();
    }

    if rebalancing_frequency_days == 0 {
        return timeline
            .into_iter()
            .map(|t| {
                let total: Money = symbol_curves
                    .keys()
                    .map(|sym| value_at(&symbol_curves[sym], t))
                    .sum();
                EquityPoint { timestamp: t, equity: total }
            })
            .collect();
    }

    let symbols: Vec<String> = symbol_curves.keys().cloned().collect();
    let first = timeline[0];
    let raw_at = |sym: &str, t: Timestamp| -> Money { value_at(&symbol_curves[sym], t) };

    let mut total0 = Money::ZERO;
    for sym in &symbols {
        total0 += raw_at(sym, first);
    }

    let mut base_raw: BTreeMap<String, Money> = BTreeMap::new();
    let mut base_adjusted: BTreeMap<String, Money> = BTreeMap::new();
    for sym in &symbols {
        let w = weights.get(sym).copied().unwrap_or(Decimal::ZERO);
        base_raw.insert(sym.clone(), raw_at(sym, first));
        base_adjusted.insert(sym.clone(), total0.mul_rate(w));
    }
    let mut last_rebalance = first;

    let mut curve = Vec::with_capacity(timeline.len());
    for t in timeline {
        if t != first && (t.date() - last_rebalance.date()).num_days() >= rebalancing_frequency_days {
            let mut total_now = Money::ZERO;
            for sym in &symbols {
                total_now += adjusted_value(sym, t, &raw_at, &base_raw, &base_adjusted);
            }
            for sym in &symbols {
                let w = weights.get(sym).copied().unwrap_or(Decimal::ZERO);
                base_raw.insert(sym.clone(), raw_at(sym, t));
                base_adjusted.insert(sym.clone(), total_now.mul_rate(w));
            }
            last_rebalance = t;
        }

        let total: Money = symbols
            .iter()
            .map(|sym| adjusted_value(sym, t, &raw_at, &base_raw, &base_adjusted))
            .sum();
        curve.push(EquityPoint { timestamp: t, equity: total });
    }

    curve
}

fn adjusted_value(
    sym: &str,
    t: Timestamp,
    raw_at: &impl Fn(&str, Timestamp) -> Money,
    base_raw: &BTreeMap<String, Money>,
    base_adjusted: &BTreeMap<String, Money>,
) -> Money {
    let base = base_raw.get(sym).copied().unwrap_or(Money::ZERO);
    let adj = base_adjusted.get(sym).copied().unwrap_or(Money::ZERO);
    if base.is_zero() {
        return adj;
    }
    let ratio = raw_at(sym, t).div_ratio(base);
    adj.mul_rate(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2023, 1, day).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    fn point(day: u32, equity: &str) -> EquityPoint {
        EquityPoint { timestamp: ts(day), equity: Money::parse(equity).unwrap() }
    }

    #[test]
    fn no_rebalancing_sums_per_symbol_curves() {
        let mut curves = BTreeMap::new();
        curves.insert("AAPL".to_string(), vec![point(1, "600"), point(2, "660")]);
        curves.insert("MSFT".to_string(), vec![point(1, "400"), point(2, "420")]);
        let mut weights = BTreeMap::new();
        weights.insert("AAPL".to_string(), Decimal::new(6, 1));
        weights.insert("MSFT".to_string(), Decimal::new(4, 1));

        let curve = build_combined_curve(&curves, &weights, 0);
        assert_eq!(curve.len(), 2);
        assert_eq!(curve[0].equity, Money::parse("1000").unwrap());
        assert_eq!(curve[1].equity, Money::parse("1080").unwrap());
    }

    #[test]
    fn rebalancing_resets_weights_at_boundary() {
        // AAPL doubles, MSFT flat, across a single rebalance boundary at day 2.
        let mut curves = BTreeMap::new();
        curves.insert("AAPL".to_string(), vec![point(1, "600"), point(2, "1200"), point(3, "1200")]);
        curves.insert("MSFT".to_string(), vec![point(1, "400"), point(2, "400"), point(3, "400")]);
        let mut weights = BTreeMap::new();
        weights.insert("AAPL".to_string(), Decimal::new(6, 1));
        weights.insert("MSFT".to_string(), Decimal::new(4, 1));

        let curve = build_combined_curve(&curves, &weights, 1);
        // day1: 1000, day2 pre-rebalance total = 1200+400=1600 -> rebalance resets to 1600
        assert_eq!(curve[0].equity, Money::parse("1000").unwrap());
        assert_eq!(curve[1].equity, Money::parse("1600").unwrap());
        // day3: no further movement, so total stays 1600
        assert_eq!(curve[2].equity, Money::parse("1600").unwrap());
    }
}
