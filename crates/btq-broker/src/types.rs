use btq_decimal::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    Market,
    Limit,
}

/// A resting order in the [`crate::VirtualBroker`]'s book.
///
/// `limit_price` is `None` for `Market` orders and `Some` for `Limit`
/// orders; `bookkeeping_price` is the price recorded at submission time
/// (spec: "price = bar.close for bookkeeping") purely for reporting — it
/// plays no part in the fill decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub symbol: String,
    pub side: OrderSide,
    pub kind: OrderKind,
    pub qty: Decimal,
    pub limit_price: Option<Money>,
    pub bookkeeping_price: Money,
}

/// A completed execution against one [`Order`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    pub order_id: String,
    pub symbol: String,
    pub side: OrderSide,
    pub qty: Decimal,
    pub price: Money,
    pub fee: Money,
}

impl Fill {
    /// `price * qty`, the notional value of this execution before fees.
    pub fn value(&self) -> Money {
        self.price.mul_rate(self.qty)
    }
}
