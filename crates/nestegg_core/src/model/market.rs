use serde::{Deserialize, Serialize};

/// Asset classes the simulator allocates across, in canonical order.
///
/// Mean-return and volatility vectors and the correlation matrix are indexed
/// in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Stocks,
    Bonds,
    Commodities,
    Gold,
    ForeignStocks,
    InternationalBonds,
}

impl AssetClass {
    pub const ALL: [AssetClass; 6] = [
        AssetClass::Stocks,
        AssetClass::Bonds,
        AssetClass::Commodities,
        AssetClass::Gold,
        AssetClass::ForeignStocks,
        AssetClass::InternationalBonds,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position of this class in return/volatility vectors
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AssetClass::Stocks => "stocks",
            AssetClass::Bonds => "bonds",
            AssetClass::Commodities => "commodities",
            AssetClass::Gold => "gold",
            AssetClass::ForeignStocks => "foreign_stocks",
            AssetClass::InternationalBonds => "international_bonds",
        }
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Nominal annual return assumptions (inflation included)
pub const DEFAULT_MEAN_RETURNS: [f64; AssetClass::COUNT] = [0.09, 0.066, 0.055, 0.05, 0.094, 0.065];

pub const DEFAULT_VOLATILITY: [f64; AssetClass::COUNT] = [0.15, 0.138, 0.167, 0.10, 0.179, 0.148];

pub const DEFAULT_CORRELATION: [[f64; AssetClass::COUNT]; AssetClass::COUNT] = [
    [1.00, 0.22, 0.12, 0.10, 0.85, 0.20],
    [0.22, 1.00, 0.15, 0.05, 0.30, 0.80],
    [0.12, 0.15, 1.00, 0.25, 0.20, 0.15],
    [0.10, 0.05, 0.25, 1.00, 0.15, 0.10],
    [0.85, 0.30, 0.20, 0.15, 1.00, 0.35],
    [0.20, 0.80, 0.15, 0.10, 0.35, 1.00],
];

/// Either the built-in market assumption or a caller-supplied replacement
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketOverride<T> {
    #[default]
    UseDefault,
    Override(T),
}

impl<T> MarketOverride<T> {
    /// Resolve to the override, or to `default()` when none was given
    pub fn resolve_or_else(self, default: impl FnOnce() -> T) -> T {
        match self {
            MarketOverride::UseDefault => default(),
            MarketOverride::Override(value) => value,
        }
    }

    pub fn as_override(&self) -> Option<&T> {
        match self {
            MarketOverride::UseDefault => None,
            MarketOverride::Override(value) => Some(value),
        }
    }
}

impl<T> From<Option<T>> for MarketOverride<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(MarketOverride::UseDefault, MarketOverride::Override)
    }
}

/// Default correlation matrix as nested vectors
pub fn default_correlation() -> Vec<Vec<f64>> {
    DEFAULT_CORRELATION.iter().map(|row| row.to_vec()).collect()
}
