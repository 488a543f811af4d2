use btq_decimal::Money;
use btq_trades::{Trade, TradeStatus};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade-level statistics computed over closed trades only.
/// Winners are `net_pnl > 0`, losers `net_pnl < 0`; a trade with
/// `net_pnl == 0` counts toward `total_trades` and `avg_trade` but neither
/// `winning_trades` nor `losing_trades`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeStatistics {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: Decimal,
    pub total_profit: Money,
    pub total_loss: Money,
    pub avg_win: Money,
    pub avg_loss: Money,
    pub avg_trade: Money,
    pub profit_factor: Decimal,
    pub largest_win: Money,
    pub largest_loss: Money,
    pub max_consecutive_wins: usize,
    pub max_consecutive_losses: usize,
}

/// Computes [`TradeStatistics`] from closed trades, in the order supplied
/// (streak detection scans that order, so callers must pass trades in
/// close order, not an arbitrary order).
pub fn compute_trade_statistics(trades: &[Trade]) -> TradeStatistics {
    let closed: Vec<&Trade> = trades
        .iter()
        .filter(|t| t.status == TradeStatus::Closed)
        .collect();

    let total_trades = closed.len();
    let mut winning_trades = 0usize;
    let mut losing_trades = 0usize;
    let mut total_profit = Money::ZERO;
    let mut total_loss = Money::ZERO;
    let mut largest_win = Money::ZERO;
    let mut largest_loss = Money::ZERO;
    let mut sum_net_pnl = Money::ZERO;

    let mut max_consecutive_wins = 0usize;
    let mut max_consecutive_losses = 0usize;
    let mut current_win_streak = 0usize;
    let mut current_loss_streak = 0usize;

    for trade in &closed {
        let net_pnl = trade.net_pnl.unwrap_or(Money::ZERO);
        sum_net_pnl += net_pnl;

        if net_pnl.is_positive() {
            winning_trades += 1;
            total_profit += net_pnl;
            if net_pnl > largest_win {
                largest_win = net_pnl;
            }
            current_win_streak += 1;
            current_loss_streak = 0;
            max_consecutive_wins = max_consecutive_wins.max(current_win_streak);
        } else if net_pnl.is_negative() {
            losing_trades += 1;
            total_loss += net_pnl.abs();
            if net_pnl.abs() > largest_loss {
                largest_loss = net_pnl.abs();
            }
            current_loss_streak += 1;
            current_win_streak = 0;
            max_consecutive_losses = max_consecutive_losses.max(current_loss_streak);
        } else {
            current_win_streak = 0;
            current_loss_streak = 0;
        }
    }

    let win_rate = if total_trades > 0 {
        Decimal::from(winning_trades as u64) / Decimal::from(total_trades as u64) * Decimal::from(100)
    } else {
        Decimal::ZERO
    };

    let avg_win = if winning_trades > 0 {
        total_profit.mul_rate(Decimal::ONE / Decimal::from(winning_trades as u64))
    } else {
        Money::ZERO
    };
    let avg_loss = if losing_trades > 0 {
        total_loss.mul_rate(Decimal::ONE / Decimal::from(losing_trades as u64))
    } else {
        Money::ZERO
    };
    let avg_trade = if total_trades > 0 {
        sum_net_pnl.mul_rate(Decimal::ONE / Decimal::from(total_trades as u64))
    } else {
        Money::ZERO
    };

    let profit_factor = if total_loss.is_positive() {
        total_profit.div_ratio(total_loss)
    } else {
        Decimal::ZERO
    };

    TradeStatistics {
        total_trades,
        winning_trades,
        losing_trades,
        win_rate,
        total_profit,
        total_loss,
        avg_win,
        avg_loss,
        avg_trade,
        profit_factor,
        largest_win,
        largest_loss,
        max_consecutive_wins,
        max_consecutive_losses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btq_trades::TradeStatus;
    use chrono::NaiveDate;

    fn trade(net_pnl: &str) -> Trade {
        let ts = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Trade {
            id: "t".into(),
            symbol: "AAPL".into(),
            status: TradeStatus::Closed,
            entry_order_id: "o1".into(),
            entry_price: Money::parse("100").unwrap(),
            entry_qty: Decimal::from(10),
            entry_time: ts,
            exit_order_id: Some("o2".into()),
            exit_price: Some(Money::parse("100").unwrap()),
            exit_qty: Some(Decimal::from(10)),
            exit_time: Some(ts),
            gross_pnl: Some(Money::parse(net_pnl).unwrap()),
            commission_paid: Some(Money::ZERO),
            slippage_cost: Some(Money::ZERO),
            net_pnl: Some(Money::parse(net_pnl).unwrap()),
            return_pct: Some(Decimal::ZERO),
        }
    }

    #[test]
    fn win_rate_and_profit_factor() {
        let trades = vec![trade("100"), trade("-50"), trade("200")];
        let stats = compute_trade_statistics(&trades);
        assert_eq!(stats.total_trades, 3);
        assert_eq!(stats.winning_trades, 2);
        assert_eq!(stats.losing_trades, 1);
        assert_eq!(stats.total_profit, Money::parse("300").unwrap());
        assert_eq!(stats.total_loss, Money::parse("50").unwrap());
        assert_eq!(stats.profit_factor, Decimal::from(6));
    }

    #[test]
    fn streaks_reset_on_opposite_outcome() {
        let trades = vec![
            trade("10"),
            trade("10"),
            trade("-5"),
            trade("10"),
            trade("10"),
            trade("10"),
        ];
        let stats = compute_trade_statistics(&trades);
        assert_eq!(stats.max_consecutive_wins, 3);
        assert_eq!(stats.max_consecutive_losses, 1);
    }

    #[test]
    fn no_trades_yields_zeroed_statistics() {
        let stats = compute_trade_statistics(&[]);
        assert_eq!(stats.total_trades, 0);
        assert_eq!(stats.win_rate, Decimal::ZERO);
        assert_eq!(stats.profit_factor, Decimal::ZERO);
    }
}
