use serde::{Deserialize, Serialize};

use super::MarketType;

/// Overall direction of a confluence signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalDirection {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl SignalDirection {
    /// Get display label for this direction.
    pub fn label(&self) -> &'static str {
        match self {
            SignalDirection::StrongBuy => "Strong Buy",
            SignalDirection::Buy => "Buy",
            SignalDirection::Hold => "Hold",
            SignalDirection::Sell => "Sell",
            SignalDirection::StrongSell => "Strong Sell",
        }
    }

    /// Confidence label implied by the direction.
    pub fn confidence(&self) -> Confidence {
        match self {
            SignalDirection::StrongBuy | SignalDirection::StrongSell => Confidence::High,
            SignalDirection::Buy | SignalDirection::Sell => Confidence::Medium,
            SignalDirection::Hold => Confidence::Low,
        }
    }

    pub fn is_bullish(&self) -> bool {
        matches!(self, SignalDirection::StrongBuy | SignalDirection::Buy)
    }

    pub fn is_bearish(&self) -> bool {
        matches!(self, SignalDirection::StrongSell | SignalDirection::Sell)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendDirection {
    Uptrend,
    Downtrend,
    Sideways,
}

impl TrendDirection {
    /// UPTREND when price > EMA20 > EMA50, DOWNTREND when strictly reversed.
    /// Undefined averages never satisfy either ordering.
    pub fn classify(price: f64, ema_fast: f64, ema_slow: f64) -> Self {
        if price > ema_fast && ema_fast > ema_slow {
            TrendDirection::Uptrend
        } else if price < ema_fast && ema_fast < ema_slow {
            TrendDirection::Downtrend
        } else {
            TrendDirection::Sideways
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendStrength {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
}

impl TrendStrength {
    /// Bucket an ADX reading. Undefined ADX is weak.
    pub fn from_adx(adx: f64) -> Self {
        if adx > 40.0 {
            TrendStrength::VeryStrong
        } else if adx > 25.0 {
            TrendStrength::Strong
        } else if adx > 20.0 {
            TrendStrength::Moderate
        } else {
            TrendStrength::Weak
        }
    }
}

/// Price/oscillator divergence at the latest bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Divergence {
    Bullish,
    Bearish,
    #[default]
    None,
}

/// Which side an observation counts toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bias {
    Bullish,
    Bearish,
    Neutral,
}

/// Category of a confluence rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalCategory {
    Trend,
    Momentum,
    Volatility,
}

/// One rule's contribution to the tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleVote {
    pub rule: String,
    pub name: String,
    pub category: SignalCategory,
    pub bias: Bias,
    pub weight: f64,
}

/// Human-readable observations, in the order they were evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalDetails {
    pub bullish: Vec<String>,
    pub bearish: Vec<String>,
    pub neutral: Vec<String>,
}

impl SignalDetails {
    pub fn push(&mut self, bias: Bias, observation: String) {
        match bias {
            Bias::Bullish => self.bullish.push(observation),
            Bias::Bearish => self.bearish.push(observation),
            Bias::Neutral => self.neutral.push(observation),
        }
    }
}

/// Latest value of every computed indicator. `None` where history is insufficient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSnapshot {
    pub price: Option<f64>,
    pub ema20: Option<f64>,
    pub ema50: Option<f64>,
    pub ema200: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub stoch_rsi_k: Option<f64>,
    pub stoch_rsi_d: Option<f64>,
    pub adx: Option<f64>,
    pub plus_di: Option<f64>,
    pub minus_di: Option<f64>,
    pub atr: Option<f64>,
    pub vwap: Option<f64>,
}

impl IndicatorSnapshot {
    /// Distance between the Bollinger bands.
    pub fn bb_width(&self) -> Option<f64> {
        Some(self.bb_upper? - self.bb_lower?)
    }

    /// Position of the price within the bands (%B): 0 at the lower band, 1 at the upper.
    /// Undefined when the bands are undefined or have zero width.
    pub fn percent_b(&self) -> Option<f64> {
        let width = self.bb_width()?;
        if !width.is_finite() || width <= 0.0 {
            return None;
        }
        Some((self.price? - self.bb_lower?) / width)
    }
}

/// One Fibonacci retracement level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibLevel {
    pub ratio: f64,
    pub label: String,
    pub price: f64,
}

/// Retracement levels between the window's highest high and lowest low.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FibonacciLevels {
    pub high: f64,
    pub low: f64,
    pub levels: Vec<FibLevel>,
}

impl FibonacciLevels {
    /// Price of the level with the given ratio.
    pub fn level(&self, ratio: f64) -> Option<f64> {
        self.levels
            .iter()
            .find(|l| (l.ratio - ratio).abs() < 1e-9)
            .map(|l| l.price)
    }
}

/// Result of one confluence scoring run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceReport {
    pub signal: SignalDirection,
    pub confidence: Confidence,
    pub bullish_score: f64,
    pub bearish_score: f64,
    pub neutral_score: f64,
    pub bullish_pct: f64,
    pub bearish_pct: f64,
    pub neutral_pct: f64,
    pub trend_direction: TrendDirection,
    pub trend_strength: TrendStrength,
    pub rsi_divergence: Divergence,
    pub macd_divergence: Divergence,
    pub indicators: IndicatorSnapshot,
    pub fibonacci: Option<FibonacciLevels>,
    pub signal_details: SignalDetails,
    /// Rule votes in evaluation order. Divergence bonuses are not rule votes.
    pub votes: Vec<RuleVote>,
    /// Indicators that still need more history for a defined latest value.
    pub warming_up: Vec<String>,
    pub candle_count: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub market_type: Option<MarketType>,
}
