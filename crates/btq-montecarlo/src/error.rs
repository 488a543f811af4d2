use crate::config::ConfigError;

#[derive(Debug)]
pub enum MonteCarloError {
    ConfigInvalid(ConfigError),
}

impl std::fmt::Display for MonteCarloError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonteCarloError::ConfigInvalid(e) => write!(f, "monte carlo config invalid: {e}"),
        }
    }
}

impl std::error::Error for MonteCarloError {}

impl From<ConfigError> for MonteCarloError {
    fn from(e: ConfigError) -> Self {
        MonteCarloError::ConfigInvalid(e)
    }
}
