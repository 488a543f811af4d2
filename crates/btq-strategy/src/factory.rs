use crate::host::{Strategy, StrategyFactory, StrategyFactoryError};
use crate::ma_crossover::MaCrossoverStrategy;

/// The built-in [`StrategyFactory`]: resolves `"MA_CROSSOVER"` (also the
/// default for `None`/empty) to [`MaCrossoverStrategy`]. Hosts wanting
/// additional strategy types implement their own `StrategyFactory` rather
/// than extending this one.
pub struct DefaultStrategyFactory;

impl StrategyFactory for DefaultStrategyFactory {
    fn create(&self, strategy_type: Option<&str>) -> Result<Box<dyn Strategy>, StrategyFactoryError> {
        let resolved = match strategy_type {
            None => "MA_CROSSOVER",
            Some(s) if s.is_empty() => "MA_CROSSOVER",
            Some(s) => s,
        };
        match resolved {
            "MA_CROSSOVER" => Ok(Box::new(MaCrossoverStrategy::new())),
            other => Err(StrategyFactoryError::UnknownStrategyType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_defaults_to_ma_crossover() {
        let factory = DefaultStrategyFactory;
        let strategy = factory.create(None).unwrap();
        assert_eq!(strategy.name(), "MA_CROSSOVER");
    }

    #[test]
    fn empty_string_defaults_to_ma_crossover() {
        let factory = DefaultStrategyFactory;
        let strategy = factory.create(Some("")).unwrap();
        assert_eq!(strategy.name(), "MA_CROSSOVER");
    }

    #[test]
    fn unknown_type_is_rejected() {
        let factory = DefaultStrategyFactory;
        let err = factory.create(Some("NOT_REAL")).unwrap_err();
        assert!(matches!(err, StrategyFactoryError::UnknownStrategyType(_)));
    }
}
