use std::collections::BTreeMap;

use btq_decimal::Money;
use btq_market::Bar;
use rust_decimal::Decimal;

use crate::types::{Fill, Order, OrderKind, OrderSide};

/// A deterministic, in-process broker simulating fills against historical
/// bars. Holds no connection to any real venue — this is the only broker
/// in this system.
///
/// The pending-order book is a `BTreeMap` keyed by order id for O(log n)
/// lookup/cancel, paired with an explicit `Vec<String>` recording
/// insertion order: orders must be processed, and fills
/// appended, in strict insertion order within a bar, which a `BTreeMap`'s
/// key-ordered iteration alone cannot guarantee once ids are not minted in
/// lexicographic lockstep with submission.
pub struct VirtualBroker {
    pending_orders: BTreeMap<String, Order>,
    insertion_order: Vec<String>,
    all_fills: Vec<Fill>,
    cash_balance: Money,
    commission_rate: Decimal,
    slippage_rate: Decimal,
}

impl VirtualBroker {
    pub fn new(initial_cash: Money) -> Self {
        Self {
            pending_orders: BTreeMap::new(),
            insertion_order: Vec::new(),
            all_fills: Vec::new(),
            cash_balance: initial_cash,
            commission_rate: Decimal::ZERO,
            slippage_rate: Decimal::ZERO,
        }
    }

    pub fn cash_balance(&self) -> Money {
        self.cash_balance
    }

    pub fn all_fills(&self) -> &[Fill] {
        &self.all_fills
    }

    pub fn pending_order_count(&self) -> usize {
        self.pending_orders.len()
    }

    pub fn set_commission(&mut self, rate: Decimal) {
        self.commission_rate = rate;
    }

    pub fn set_slippage(&mut self, rate: Decimal) {
        self.slippage_rate = rate;
    }

    /// Resets all broker state to a fresh run with `initial_cash`. Clears
    /// the pending book, the fill log, and restores default (zero)
    /// commission/slippage rates — callers re-apply rates afterward via
    /// `set_commission`/`set_slippage` if needed.
    pub fn reset(&mut self, initial_cash: Money) {
        self.pending_orders.clear();
        self.insertion_order.clear();
        self.all_fills.clear();
        self.cash_balance = initial_cash;
    }

    /// Insert an order into the pending book.
    pub fn submit(&mut self, order: Order) {
        self.insertion_order.push(order.id.clone());
        self.pending_orders.insert(order.id.clone(), order);
    }

    pub fn cancel(&mut self, order_id: &str) -> bool {
        if self.pending_orders.remove(order_id).is_some() {
            self.insertion_order.retain(|id| id != order_id);
            true
        } else {
            false
        }
    }

    /// Attempts to fill every pending order for `bar.symbol`, in the order
    /// they were submitted. Filled orders are removed from the book; fills
    /// are returned in the same order they were appended to `all_fills`.
    ///
    /// Only fields of `bar` itself are consulted — no lookahead into any
    /// other bar is possible through this method's signature.
    pub fn process_bar(&mut self, bar: &Bar) -> Vec<Fill> {
        let mut fills = Vec::new();
        let mut still_pending = Vec::with_capacity(self.insertion_order.len());

        for order_id in self.insertion_order.drain(..) {
            let order = match self.pending_orders.get(&order_id) {
                Some(o) if o.symbol == bar.symbol => self.pending_orders.remove(&order_id).unwrap(),
                _ => {
                    still_pending.push(order_id);
                    continue;
                }
            };

            match self.try_fill(&order, bar) {
                Some(fill) => {
                    self.apply_fill(&fill);
                    fills.push(fill);
                }
                None => {
                    tracing::warn!(
                        order_id = %order.id,
                        symbol = %order.symbol,
                        "order did not fill against this bar; remains pending"
                    );
                    still_pending.push(order.id.clone());
                    self.pending_orders.insert(order.id.clone(), order);
                }
            }
        }

        self.insertion_order = still_pending;
        self.all_fills.extend(fills.iter().cloned());
        fills
    }

    fn try_fill(&self, order: &Order, bar: &Bar) -> Option<Fill> {
        let raw_price = match (order.kind, order.side) {
            (OrderKind::Market, _) => Some(bar.open),
            (OrderKind::Limit, OrderSide::Buy) => {
                let limit = order.limit_price?;
                if bar.low <= limit {
                    Some(limit)
                } else {
                    None
                }
            }
            (OrderKind::Limit, OrderSide::Sell) => {
                let limit = order.limit_price?;
                if bar.high >= limit {
                    Some(limit)
                } else {
                    None
                }
            }
        }?;

        let slipped_price = self.apply_slippage(raw_price, order.side);
        let fee = slipped_price.mul_rate(order.qty).mul_rate(self.commission_rate);

        Some(Fill {
            order_id: order.id.clone(),
            symbol: order.symbol.clone(),
            side: order.side,
            qty: order.qty,
            price: slipped_price,
            fee,
        })
    }

    fn apply_slippage(&self, price: Money, side: OrderSide) -> Money {
        let factor = match side {
            OrderSide::Buy => Decimal::ONE + self.slippage_rate,
            OrderSide::Sell => Decimal::ONE - self.slippage_rate,
        };
        price.mul_rate(factor)
    }

    fn apply_fill(&mut self, fill: &Fill) {
        let value = fill.value();
        match fill.side {
            OrderSide::Buy => self.cash_balance -= value + fill.fee,
            OrderSide::Sell => self.cash_balance += value - fill.fee,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btq_market::Timeframe;
    use chrono::NaiveDate;

    fn bar(open: &str, high: &str, low: &str, close: &str) -> Bar {
        let ts = NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        Bar::restore(
            "AAPL",
            Timeframe::new("1d"),
            ts,
            Money::parse(open).unwrap(),
            Money::parse(high).unwrap(),
            Money::parse(low).unwrap(),
            Money::parse(close).unwrap(),
            Decimal::from(1_000),
            true,
        )
        .unwrap()
    }

    fn market_buy(id: &str, qty: i64) -> Order {
        Order {
            id: id.to_string(),
            symbol: "AAPL".into(),
            side: OrderSide::Buy,
            kind: OrderKind::Market,
            qty: Decimal::from(qty),
            limit_price: None,
            bookkeeping_price: Money::ZERO,
        }
    }

    #[test]
    fn market_order_fills_at_bar_open() {
        let mut broker = VirtualBroker::new(Money::from_i64(10_000));
        broker.submit(market_buy("o1", 10));
        let fills = broker.process_bar(&bar("100", "110", "95", "105"));
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].price, Money::parse("100").unwrap());
    }

    #[test]
    fn slippage_pushes_buy_price_up() {
        let mut broker = VirtualBroker::new(Money::from_i64(10_000));
        broker.set_slippage(Decimal::new(1, 2)); // 0.01 = 1%
        broker.submit(market_buy("o1", 10));
        let fills = broker.process_bar(&bar("100", "110", "95", "105"));
        assert_eq!(fills[0].price, Money::parse("101.00").unwrap());
    }

    #[test]
    fn limit_buy_fills_only_when_low_reaches_limit() {
        let mut broker = VirtualBroker::new(Money::from_i64(10_000));
        broker.submit(Order {
            id: "o1".into(),
            symbol: "AAPL".into(),
            side: OrderSide::Buy,
            kind: OrderKind::Limit,
            qty: Decimal::from(10),
            limit_price: Some(Money::parse("90").unwrap()),
            bookkeeping_price: Money::ZERO,
        });
        let no_fill = broker.process_bar(&bar("100", "110", "95", "105"));
        assert!(no_fill.is_empty());
        assert_eq!(broker.pending_order_count(), 1);

        let fills = broker.process_bar(&bar("100", "110", "88", "95"));
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].price, Money::parse("90").unwrap());
        assert_eq!(broker.pending_order_count(), 0);
    }

    #[test]
    fn limit_sell_fills_only_when_high_reaches_limit() {
        let mut broker = VirtualBroker::new(Money::from_i64(10_000));
        broker.submit(Order {
            id: "o1".into(),
            symbol: "AAPL".into(),
            side: OrderSide::Sell,
            kind: OrderKind::Limit,
            qty: Decimal::from(10),
            limit_price: Some(Money::parse("120").unwrap()),
            bookkeeping_price: Money::ZERO,
        });
        let no_fill = broker.process_bar(&bar("100", "110", "95", "105"));
        assert!(no_fill.is_empty());

        let fills = broker.process_bar(&bar("100", "125", "95", "115"));
        assert_eq!(fills.len(), 1);
        assert_eq!(fills[0].price, Money::parse("120").unwrap());
    }

    #[test]
    fn cash_balance_reflects_fee_on_buy_and_sell() {
        let mut broker = VirtualBroker::new(Money::from_i64(10_000));
        broker.set_commission(Decimal::new(1, 3)); // 0.001
        broker.submit(market_buy("o1", 10));
        broker.process_bar(&bar("100", "110", "95", "105"));
        // cash -= 1000 + 1.0 fee
        assert_eq!(broker.cash_balance(), Money::parse("8999.000").unwrap());
    }

    #[test]
    fn cancel_removes_order_from_book() {
        let mut broker = VirtualBroker::new(Money::from_i64(10_000));
        broker.submit(Order {
            id: "o1".into(),
            symbol: "AAPL".into(),
            side: OrderSide::Buy,
            kind: OrderKind::Limit,
            qty: Decimal::from(10),
            limit_price: Some(Money::parse("1").unwrap()),
            bookkeeping_price: Money::ZERO,
        });
        assert!(broker.cancel("o1"));
        assert!(!broker.cancel("o1"));
        assert_eq!(broker.pending_order_count(), 0);
    }

    #[test]
    fn orders_for_other_symbols_are_untouched() {
        let mut broker = VirtualBroker::new(Money::from_i64(10_000));
        broker.submit(Order {
            id: "o1".into(),
            symbol: "MSFT".into(),
            side: OrderSide::Buy,
            kind: OrderKind::Market,
            qty: Decimal::from(1),
            limit_price: None,
            bookkeeping_price: Money::ZERO,
        });
        let fills = broker.process_bar(&bar("100", "110", "95", "105"));
        assert!(fills.is_empty());
        assert_eq!(broker.pending_order_count(), 1);
    }
}
