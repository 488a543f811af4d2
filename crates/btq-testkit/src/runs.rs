use btq_backtest::{RunCompletion, RunRecord, RunRepository};
use btq_trades::Trade;
use parking_lot::Mutex;

/// One call recorded against an [`InMemoryRunRepository`], in call order.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedCall {
    SaveRun(RunRecord),
    UpdateRun { run_id: String, completion: RunCompletion },
    FailRun { run_id: String, reason: String },
    SaveTrades { run_id: String, trades: Vec<Trade> },
}

/// An in-memory [`RunRepository`] that records every call, in order, for
/// scenario-test assertions: no I/O, no randomness, just a log a test
/// can inspect afterward.
#[derive(Default)]
pub struct InMemoryRunRepository {
    calls: Mutex<Vec<RecordedCall>>,
}

impl InMemoryRunRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn saved_runs(&self) -> Vec<RunRecord> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                RecordedCall::SaveRun(r) => Some(r.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn completions(&self) -> Vec<(String, RunCompletion)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                RecordedCall::UpdateRun { run_id, completion } => Some((run_id.clone(), completion.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn failures(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|c| match c {
                RecordedCall::FailRun { run_id, reason } => Some((run_id.clone(), reason.clone())),
                _ => None,
            })
            .collect()
    }
}

impl RunRepository for InMemoryRunRepository {
    fn save_run(&self, record: &RunRecord) {
        self.calls.lock().push(RecordedCall::SaveRun(record.clone()));
    }

    fn update_run(&self, run_id: &str, completion: &RunCompletion) {
        self.calls.lock().push(RecordedCall::UpdateRun {
            run_id: run_id.to_string(),
            completion: completion.clone(),
        });
    }

    fn fail_run(&self, run_id: &str, reason: &str) {
        self.calls.lock().push(RecordedCall::FailRun {
            run_id: run_id.to_string(),
            reason: reason.to_string(),
        });
    }

    fn save_trades(&self, run_id: &str, trades: &[Trade]) {
        self.calls.lock().push(RecordedCall::SaveTrades {
            run_id: run_id.to_string(),
            trades: trades.to_vec(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use btq_decimal::Money;
    use btq_backtest::RunStatus;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    #[test]
    fn records_calls_in_order() {
        let repo = InMemoryRunRepository::new();
        repo.save_run(&RunRecord {
            id: "r1".into(),
            strategy_id: "s1".into(),
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
            symbols_csv: "AAPL".into(),
            timeframe: "1d".into(),
            initial_capital: Money::from_i64(1_000_000),
            commission_rate: Decimal::ZERO,
            slippage_rate: Decimal::ZERO,
            status: RunStatus::Running,
        });
        repo.update_run(
            "r1",
            &RunCompletion {
                final_capital: Money::from_i64(1_050_000),
                total_return_percent: Decimal::from(5),
                total_trades: 3,
                winning_trades: 2,
                losing_trades: 1,
            },
        );

        assert_eq!(repo.saved_runs().len(), 1);
        assert_eq!(repo.completions().len(), 1);
        assert_eq!(repo.calls().len(), 2);
    }
}
