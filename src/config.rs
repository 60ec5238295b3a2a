use std::env;
use std::str::FromStr;

use tracing::warn;

use crate::types::{ChartPeriod, MaPolicy};

/// Default cap on bars per request, about twenty years of trading days.
pub const DEFAULT_MAX_BARS: usize = 5000;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Policy used when a request names none.
    pub ma_policy: MaPolicy,
    /// Period used when a request names none.
    pub default_period: ChartPeriod,
    /// Largest series accepted per request.
    pub max_bars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            ma_policy: MaPolicy::default(),
            default_period: ChartPeriod::default(),
            max_bars: DEFAULT_MAX_BARS,
        }
    }
}

/// Read `key`, keeping `default` when it is unset or fails to parse.
fn var_or<T>(key: &str, default: T, parse: impl Fn(&str) -> Option<T>) -> T {
    match env::var(key) {
        Ok(raw) => parse(raw.trim()).unwrap_or_else(|| {
            warn!("Ignoring invalid {}={:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

fn parse<T: FromStr>(s: &str) -> Option<T> {
    s.parse().ok()
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: var_or("PORT", defaults.port, parse),
            ma_policy: var_or("MA_POLICY", defaults.ma_policy, MaPolicy::from_str),
            default_period: var_or("DEFAULT_PERIOD", defaults.default_period, ChartPeriod::from_str),
            max_bars: var_or("MAX_BARS", defaults.max_bars, |s| {
                parse::<usize>(s).filter(|&n| n > 0)
            }),
        }
    }
}
