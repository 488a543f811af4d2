use btq_decimal::Money;
use btq_trades::Trade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The persisted shape of a run, per its "Persisted state layout". Field
/// names and semantic types are specified there; physical encoding is the
/// host's concern — this struct is the handoff point.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRecord {
    pub id: String,
    pub strategy_id: String,
    pub start_date: btq_decimal::TradeDate,
    pub end_date: btq_decimal::TradeDate,
    /// Symbols joined by comma, matching the persisted run record's physical layout.
    pub symbols_csv: String,
    pub timeframe: String,
    pub initial_capital: Money,
    pub commission_rate: Decimal,
    pub slippage_rate: Decimal,
    pub status: RunStatus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunStatus {
    Running,
    Completed,
    Failed,
    Cancelled,
}

/// Fields updated on successful completion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCompletion {
    pub final_capital: Money,
    pub total_return_percent: Decimal,
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
}

/// External collaborator for run/trade persistence (its `RunRepository` /
/// `TradeRepository`). The orchestrator depends only on this trait; a real
/// deployment backs it with whatever store it likes, and `btq-testkit`
/// supplies an in-memory fake that records calls for test assertions.
///
/// None of these methods return a `Result`: a persistence failure here is
/// the host's concern to surface (e.g. by logging inside its own
/// implementation) and must never abort an in-flight backtest run, which
/// has already committed to its own cash/trade bookkeeping independent of
/// whether the record of it lands in storage.
pub trait RunRepository: Send + Sync {
    fn save_run(&self, record: &RunRecord);
    fn update_run(&self, run_id: &str, completion: &RunCompletion);
    fn fail_run(&self, run_id: &str, reason: &str);
    fn save_trades(&self, run_id: &str, trades: &[Trade]);
}

/// A `RunRepository` that does nothing — the default for callers (ad-hoc
/// scripts, optimizer/walk-forward child runs) that have no persistence
/// layer of their own and don't need one.
pub struct NullRunRepository;

impl RunRepository for NullRunRepository {
    fn save_run(&self, _record: &RunRecord) {}
    fn update_run(&self, _run_id: &str, _completion: &RunCompletion) {}
    fn fail_run(&self, _run_id: &str, _reason: &str) {}
    fn save_trades(&self, _run_id: &str, _trades: &[Trade]) {}
}
