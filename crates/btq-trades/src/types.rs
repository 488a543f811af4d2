use btq_broker::OrderSide;
use btq_decimal::{Money, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeStatus {
    Open,
    Closed,
}

/// One round-trip position: a BUY entry fill, and — once closed — the
/// SELL exit fill plus the realized P&L breakdown.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    pub id: String,
    pub symbol: String,
    pub status: TradeStatus,

    pub entry_order_id: String,
    pub entry_price: Money,
    pub entry_qty: Decimal,
    pub entry_time: Timestamp,

    pub exit_order_id: Option<String>,
    pub exit_price: Option<Money>,
    pub exit_qty: Option<Decimal>,
    pub exit_time: Option<Timestamp>,

    pub gross_pnl: Option<Money>,
    pub commission_paid: Option<Money>,
    pub slippage_cost: Option<Money>,
    pub net_pnl: Option<Money>,
    /// Percent, i.e. already multiplied by 100 (spec: `netPnl/entryValue *
    /// 100`), not a `[0,1]` fraction.
    pub return_pct: Option<Decimal>,
}

impl Trade {
    pub(crate) fn open(
        id: String,
        symbol: String,
        entry_order_id: String,
        entry_price: Money,
        entry_qty: Decimal,
        entry_time: Timestamp,
    ) -> Self {
        Self {
            id,
            symbol,
            status: TradeStatus::Open,
            entry_order_id,
            entry_price,
            entry_qty,
            entry_time,
            exit_order_id: None,
            exit_price: None,
            exit_qty: None,
            exit_time: None,
            gross_pnl: None,
            commission_paid: None,
            slippage_cost: None,
            net_pnl: None,
            return_pct: None,
        }
    }

    pub fn entry_value(&self) -> Money {
        self.entry_price.mul_rate(self.entry_qty)
    }
}

/// A single BUY or SELL execution as seen by the trade matcher — narrower
/// than `btq_broker::Fill`, since the matcher only needs side/price/qty,
/// not the fee `btq-broker` already deducted from cash.
#[derive(Clone, Debug)]
pub struct MatcherFill {
    pub order_id: String,
    pub symbol: String,
    pub side: OrderSide,
    pub price: Money,
    pub qty: Decimal,
    pub timestamp: Timestamp,
}
