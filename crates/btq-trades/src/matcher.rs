use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::types::{MatcherFill, Trade, TradeStatus};
use btq_broker::OrderSide;

/// Errors raised while matching fills into trades.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TradeMatcherError {
    /// A BUY fill arrived for a symbol with an already-open position while
    /// running in strict mode (`allow_overwrite: false`).
    PositionAlreadyOpen { symbol: String },
}

impl std::fmt::Display for TradeMatcherError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeMatcherError::PositionAlreadyOpen { symbol } => {
                write!(f, "a position is already open for {symbol}")
            }
        }
    }
}

impl std::error::Error for TradeMatcherError {}

/// Rate configuration applied when a trade closes. These are the matcher's
/// own commission/slippage rates for the P&L breakdown in  — distinct
/// from (though in practice configured equal to) the rates `VirtualBroker`
/// applies to the fill price and fee themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TradeMatcherConfig {
    pub commission_rate: Decimal,
    pub slippage_rate: Decimal,
    /// When `true`, a second BUY fill for a symbol with an open position
    /// replaces the open entry instead of being rejected. Default `false`
    /// (strict mode) — matches this core's chosen resolution of the
    /// overlapping-BUY open question; the source behavior corresponds to
    /// `true`.
    pub allow_overwrite: bool,
}

impl TradeMatcherConfig {
    pub fn strict(commission_rate: Decimal, slippage_rate: Decimal) -> Self {
        Self {
            commission_rate,
            slippage_rate,
            allow_overwrite: false,
        }
    }
}

/// Long-only FIFO trade matcher: one open position per symbol at a time.
/// No shorting — a SELL fill with no matching open position is ignored.
pub struct TradeMatcher {
    config: TradeMatcherConfig,
    open_positions: BTreeMap<String, Trade>,
}

impl TradeMatcher {
    pub fn new(config: TradeMatcherConfig) -> Self {
        Self {
            config,
            open_positions: BTreeMap::new(),
        }
    }

    pub fn open_position_count(&self) -> usize {
        self.open_positions.len()
    }

    pub fn has_open_position(&self, symbol: &str) -> bool {
        self.open_positions.contains_key(symbol)
    }

    /// Feeds one fill through the matcher.
    ///
    /// - A BUY fill opens a new `Trade` for its symbol, returning `None`
    ///   (the trade is not yet closed). In strict mode a BUY against a
    ///   symbol that already has an open position is rejected.
    /// - A SELL fill against an open position closes and returns that
    ///   `Trade`, computing its realized P&L. A SELL with no open position
    ///   for its symbol is ignored and returns `None` — there is no
    ///   shorting in this core.
    pub fn on_fill(
        &mut self,
        fill: &MatcherFill,
        id: impl FnOnce() -> String,
    ) -> Result<Option<Trade>, TradeMatcherError> {
        match fill.side {
            OrderSide::Buy => self.on_buy_fill(fill, id).map(|()| None),
            OrderSide::Sell => Ok(self.on_sell_fill(fill)),
        }
    }

    fn on_buy_fill(
        &mut self,
        fill: &MatcherFill,
        id: impl FnOnce() -> String,
    ) -> Result<(), TradeMatcherError> {
        if self.open_positions.contains_key(&fill.symbol) && !self.config.allow_overwrite {
            return Err(TradeMatcherError::PositionAlreadyOpen {
                symbol: fill.symbol.clone(),
            });
        }

        let trade = Trade::open(
            id(),
            fill.symbol.clone(),
            fill.order_id.clone(),
            fill.price,
            fill.qty,
            fill.timestamp,
        );
        self.open_positions.insert(fill.symbol.clone(), trade);
        Ok(())
    }

    fn on_sell_fill(&mut self, fill: &MatcherFill) -> Option<Trade> {
        let mut trade = self.open_positions.remove(&fill.symbol)?;

        let entry_value = trade.entry_price.mul_rate(trade.entry_qty);
        let exit_value = fill.price.mul_rate(fill.qty);
        let gross_pnl = exit_value - entry_value;
        let commission_paid = (entry_value + exit_value).mul_rate(self.config.commission_rate);
        let slippage_cost = (entry_value + exit_value).mul_rate(self.config.slippage_rate);
        let net_pnl = gross_pnl - commission_paid - slippage_cost;
        let return_pct = net_pnl.div_ratio(entry_value) * Decimal::from(100);

        trade.status = TradeStatus::Closed;
        trade.exit_order_id = Some(fill.order_id.clone());
        trade.exit_price = Some(fill.price);
        trade.exit_qty = Some(fill.qty);
        trade.exit_time = Some(fill.timestamp);
        trade.gross_pnl = Some(gross_pnl);
        trade.commission_paid = Some(commission_paid);
        trade.slippage_cost = Some(slippage_cost);
        trade.net_pnl = Some(net_pnl);
        trade.return_pct = Some(return_pct);

        Some(trade)
    }
}
