use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Market {
    #[default]
    Dambulla,
    Colombo,
    NuwaraEliya,
}

impl Market {
    /// Order used for market comparisons and the commodity page picker.
    pub const ALL: [Market; 3] = [Market::Colombo, Market::Dambulla, Market::NuwaraEliya];

    /// Prices page picker: the default market first.
    pub const PRICES_PICKER: [Market; 3] = [Market::Dambulla, Market::Colombo, Market::NuwaraEliya];

    pub fn as_str(&self) -> &'static str {
        match self {
            Market::Dambulla => "Dambulla",
            Market::Colombo => "Colombo",
            Market::NuwaraEliya => "Nuwara Eliya",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Market> {
        let wanted = name.trim();
        Market::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    #[default]
    #[serde(other)]
    Same,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PriceItem {
    pub commodity: String,
    #[serde(default)]
    pub price_min: Option<f64>,
    #[serde(default)]
    pub price_max: Option<f64>,
    #[serde(default)]
    pub price_avg: Option<f64>,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default)]
    pub change_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PricesResponse {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub prev_date: Option<String>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub items: Vec<PriceItem>,
    #[serde(default)]
    pub total_items: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub latest_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Dates {
    #[serde(default)]
    pub dates: Vec<String>,  // newest first
}

/// Backend verdict for a commodity. Every field is optional because the
/// backend answers with just `{commodity, message}` when it lacks data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub best_market: Option<String>,
    #[serde(default)]
    pub best_price: Option<f64>,
    #[serde(default)]
    pub worst_market: Option<String>,
    #[serde(default)]
    pub price_difference: Option<f64>,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub advice: Option<String>,
    #[serde(default)]
    pub advice_reason: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    Wait,
    SellNow,
    SellOrWait,
    Other,
}

impl Advice {
    pub fn from_label(label: &str) -> Advice {
        match label {
            "WAIT" => Advice::Wait,
            "SELL NOW" => Advice::SellNow,
            "SELL OR WAIT" => Advice::SellOrWait,
            _ => Advice::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarketPrice {
    pub market: String,
    #[serde(default)]
    pub price_avg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Compare {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub commodity: Option<String>,
    #[serde(default)]
    pub markets: Vec<MarketPrice>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: String,
    #[serde(default)]
    pub price_avg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Trend {
    #[serde(default)]
    pub commodity: Option<String>,
    #[serde(default)]
    pub market: Option<String>,
    #[serde(default)]
    pub points: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VolatilityInfo {
    #[serde(default)]
    pub risk_level: Option<RiskLevel>,
    #[serde(default)]
    pub volatility_percent: Option<f64>,
    #[serde(default)]
    pub average_price: Option<f64>,
    #[serde(default)]
    pub days_used: Option<u32>,
    #[serde(default)]
    pub message: Option<String>,
}
