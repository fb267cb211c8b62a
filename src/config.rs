use std::{env, path::PathBuf};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATA_PATH: &str = "data/state.json";
pub const DEFAULT_PRICE_PER_UNIT: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    /// Price given to users who have not set their own yet.
    pub default_price_per_unit: f64,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(
            env::var("PORT").ok(),
            env::var("APP_DATA_PATH").ok(),
            env::var("DEFAULT_PRICE_PER_UNIT").ok(),
        )
    }

    fn from_vars(port: Option<String>, data_path: Option<String>, price: Option<String>) -> Self {
        let port = port
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let data_path = data_path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let default_price_per_unit = match price {
            None => DEFAULT_PRICE_PER_UNIT,
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => value,
                _ => {
                    warn!("ignoring DEFAULT_PRICE_PER_UNIT={raw:?}, using {DEFAULT_PRICE_PER_UNIT}");
                    DEFAULT_PRICE_PER_UNIT
                }
            },
        };

        Self {
            port,
            data_path,
            default_price_per_unit,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_vars(None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_path, PathBuf::from("data/state.json"));
        assert_eq!(config.default_price_per_unit, 5.0);
    }

    #[test]
    fn values_are_read_from_vars() {
        let config = Config::from_vars(
            Some("9191".to_string()),
            Some("/tmp/habits.json".to_string()),
            Some(" 7.25 ".to_string()),
        );
        assert_eq!(config.port, 9191);
        assert_eq!(config.data_path, PathBuf::from("/tmp/habits.json"));
        assert_eq!(config.default_price_per_unit, 7.25);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = Config::from_vars(
            Some("not-a-port".to_string()),
            None,
            Some("-3".to_string()),
        );
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.default_price_per_unit, DEFAULT_PRICE_PER_UNIT);
    }
}
