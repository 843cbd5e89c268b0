use crate::model::Market;

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_base: String,
    pub default_market: Market,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            default_market: Market::default(),
        }
    }
}

impl Config {
    /// Reads the process environment; `main` loads `.env` into it first.
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("VEGLYTICS_API_BASE").ok().as_deref(),
            std::env::var("VEGLYTICS_MARKET").ok().as_deref(),
        )
    }

    fn from_vars(api_base: Option<&str>, market: Option<&str>) -> Self {
        let mut cfg = Config::default();

        if let Some(base) = api_base.map(|b| b.trim().trim_end_matches('/')) {
            if !base.is_empty() {
                cfg.api_base = base.to_string();
            }
        }

        if let Some(name) = market {
            match Market::from_name(name) {
                Some(m) => cfg.default_market = m,
                None => tracing::warn!("Ignoring unknown market {:?} in VEGLYTICS_MARKET", name),
            }
        }

        cfg
    }
}
