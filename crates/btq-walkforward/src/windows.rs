use btq_decimal::TradeDate;
use chrono::Duration;

use crate::config::{WalkForwardConfig, WalkForwardMode};

/// One generated in-sample/out-of-sample date pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSpec {
    pub in_start: TradeDate,
    pub in_end: TradeDate,
    pub out_start: TradeDate,
    pub out_end: TradeDate,
}

/// Generates the window sequence for `config`, stopping as soon as a
/// window's `out_end` would exceed `analysis_end`. `ROLLING` slides both
/// the in-sample start and end forward by `step_days` each iteration;
/// `ANCHORED` fixes `in_start` at `analysis_start` and only grows
/// `in_end`.
pub fn generate(config: &WalkForwardConfig) -> Vec<WindowSpec> {
    let mut windows = Vec::new();
    let mut k: i64 = 0;

    loop {
        let (in_start, in_end) = match config.mode {
            WalkForwardMode::Rolling => {
                let in_start = config.analysis_start + Duration::days(k * config.step_days);
                let in_end = in_start + Duration::days(config.in_sample_days - 1);
                (in_start, in_end)
            }
            WalkForwardMode::Anchored => {
                let in_end = config.analysis_start
                    + Duration::days(config.in_sample_days - 1 + k * config.step_days);
                (config.analysis_start, in_end)
            }
        };

        let out_start = in_end + Duration::days(1);
        let out_end = out_start + Duration::days(config.out_of_sample_days - 1);

        if out_end > config.analysis_end {
            break;
        }

        windows.push(WindowSpec {
            in_start,
            in_end,
            out_start,
            out_end,
        });
        k += 1;
    }

    windows
}
