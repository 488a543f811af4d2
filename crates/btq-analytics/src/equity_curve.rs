use btq_decimal::{Money, Timestamp};
use btq_trades::{Trade, TradeStatus};
use serde::{Deserialize, Serialize};

/// One point on an equity curve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub timestamp: Timestamp,
    pub equity: Money,
}

/// Builds the equity curve: starts at `(start_wall,
/// initial_capital)`, then appends one point per CLOSED trade (in the
/// order given) at `trade.exit_time` with `equity = previous_equity +
/// trade.net_pnl`.
///
/// `trades` must already be in the order they closed — this function does
/// not sort them. OPEN trades are skipped; they have no `net_pnl` yet.
pub fn build_equity_curve(
    start_wall: Timestamp,
    initial_capital: Money,
    trades: &[Trade],
) -> Vec<EquityPoint> {
    let mut curve = Vec::with_capacity(trades.len() + 1);
    curve.push(EquityPoint {
        timestamp: start_wall,
        equity: initial_capital,
    });

    let mut equity = initial_capital;
    for trade in trades {
        if trade.status != TradeStatus::Closed {
            continue;
        }
        let (Some(exit_time), Some(net_pnl)) = (trade.exit_time, trade.net_pnl) else {
            continue;
        };
        equity += net_pnl;
        curve.push(EquityPoint {
            timestamp: exit_time,
            equity,
        });
    }

    curve
}

#[cfg(test)]
mod tests {
    use super::*;
    use btq_trades::Trade;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn ts(day: u32) -> Timestamp {
        NaiveDate::from_ymd_opt(2023, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn closed_trade(exit_day: u32, net_pnl: &str) -> Trade {
        Trade {
            id: "t1".into(),
            symbol: "AAPL".into(),
            status: TradeStatus::Closed,
            entry_order_id: "o1".into(),
            entry_price: Money::parse("100").unwrap(),
            entry_qty: Decimal::from(10),
            entry_time: ts(1),
            exit_order_id: Some("o2".into()),
            exit_price: Some(Money::parse("100").unwrap()),
            exit_qty: Some(Decimal::from(10)),
            exit_time: Some(ts(exit_day)),
            gross_pnl: Some(Money::parse(net_pnl).unwrap()),
            commission_paid: Some(Money::ZERO),
            slippage_cost: Some(Money::ZERO),
            net_pnl: Some(Money::parse(net_pnl).unwrap()),
            return_pct: Some(Decimal::ZERO),
        }
    }

    #[test]
    fn curve_starts_at_initial_capital() {
        let curve = build_equity_curve(ts(1), Money::from_i64(10_000), &[]);
        assert_eq!(curve.len(), 1);
        assert_eq!(curve[0].equity, Money::from_i64(10_000));
    }

    #[test]
    fn curve_accumulates_net_pnl_per_closed_trade() {
        let trades = vec![closed_trade(2, "100"), closed_trade(3, "-40")];
        let curve = build_equity_curve(ts(1), Money::from_i64(10_000), &trades);
        assert_eq!(curve.len(), 3);
        assert_eq!(curve[1].equity, Money::parse("10100").unwrap());
        assert_eq!(curve[2].equity, Money::parse("10060").unwrap());
    }
}
