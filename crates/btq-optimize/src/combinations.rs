use std::collections::BTreeMap;

use btq_strategy::StrategyParams;

/// Enumerates the Cartesian product of `ranges` in deterministic order: the
/// first parameter name (ranges iterates a `BTreeMap`, so alphabetically
/// first) varies slowest, the last varies fastest — an odometer with the
/// leftmost digit least significant to change. For `{p:[1,2], q:[10,20]}`
/// this yields `[{p:1,q:10}, {p:1,q:20}, {p:2,q:10}, {p:2,q:20}]`, matching
/// S4's expectation that `{p:1,q:10}` is enumerated first.
pub fn enumerate(ranges: &BTreeMap<String, Vec<serde_json::Value>>) -> Vec<StrategyParams> {
    let names: Vec<&String> = ranges.keys().collect();
    let mut combos: Vec<StrategyParams> = vec![StrategyParams::new()];

    for name in names {
        let values = &ranges[name];
        let mut next = Vec::with_capacity(combos.len() * values.len());
        for combo in &combos {
            for value in values {
                let mut extended = combo.clone();
                extended.insert(name.clone(), value.clone());
                next.push(extended);
            }
        }
        combos = next;
    }

    combos
}
