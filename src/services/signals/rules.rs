//! Weighted confluence rules.
//!
//! Each rule reads the latest (and, for crossovers, the previous) indicator
//! snapshot and votes bullish, bearish or neutral with a weight. A rule whose
//! inputs are undefined votes neutral with its base weight.

use crate::types::{Bias, IndicatorSnapshot, SignalCategory};

/// Multiplier applied to crossover rules on the bar the cross happens.
pub const FRESH_CROSS_MULTIPLIER: f64 = 1.5;

/// Indicator values a rule is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub current: &'a IndicatorSnapshot,
    pub previous: &'a IndicatorSnapshot,
}

/// A single rule's vote.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub bias: Bias,
    pub weight: f64,
    pub description: String,
}

impl RuleOutcome {
    pub fn bullish(weight: f64, description: impl Into<String>) -> Self {
        Self {
            bias: Bias::Bullish,
            weight,
            description: description.into(),
        }
    }

    pub fn bearish(weight: f64, description: impl Into<String>) -> Self {
        Self {
            bias: Bias::Bearish,
            weight,
            description: description.into(),
        }
    }

    pub fn neutral(weight: f64, description: impl Into<String>) -> Self {
        Self {
            bias: Bias::Neutral,
            weight,
            description: description.into(),
        }
    }
}

/// Trait for implementing confluence rules.
pub trait ConfluenceRule: Send + Sync {
    /// Unique identifier for this rule.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Category this rule belongs to.
    fn category(&self) -> SignalCategory;

    /// Base weight of the rule's vote.
    fn weight(&self) -> f64;

    /// Evaluate the rule. `None` means the rule does not vote at all.
    fn evaluate(&self, ctx: &RuleContext) -> Option<RuleOutcome>;
}

/// The nine standard rules, in evaluation order.
pub fn default_rules() -> Vec<Box<dyn ConfluenceRule>> {
    vec![
        // Trend
        Box::new(PriceVsEmas),
        Box::new(PriceVsEma200),
        Box::new(EmaCross),
        // Momentum
        Box::new(RsiZone),
        Box::new(MacdCross),
        Box::new(MacdHistogram),
        // Volatility and oscillators
        Box::new(BollingerPosition),
        Box::new(StochRsiZone),
        Box::new(AdxDirection),
    ]
}

fn unavailable(weight: f64, name: &str) -> RuleOutcome {
    RuleOutcome::neutral(weight, format!("{} unavailable (insufficient history)", name))
}

/// Price relative to EMA20 and EMA50.
pub struct PriceVsEmas;

impl ConfluenceRule for PriceVsEmas {
    fn id(&self) -> &str {
        "price_vs_ema"
    }

    fn name(&self) -> &str {
        "Price vs EMA20/50"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Trend
    }

    fn weight(&self) -> f64 {
        2.0
    }

    fn evaluate(&self, ctx: &RuleContext) -> Option<RuleOutcome> {
        let w = self.weight();
        let c = ctx.current;
        let (Some(price), Some(ema20), Some(ema50)) = (c.price, c.ema20, c.ema50) else {
            return Some(unavailable(w, "EMA20/50"));
        };

        Some(if price > ema20 && price > ema50 {
            RuleOutcome::bullish(w, "Price above EMA20 and EMA50")
        } else if price < ema20 && price < ema50 {
            RuleOutcome::bearish(w, "Price below EMA20 and EMA50")
        } else {
            RuleOutcome::neutral(w, "Price between EMA20 and EMA50")
        })
    }
}

/// Price relative to the long-term EMA200. Silent until EMA200 is defined.
pub struct PriceVsEma200;

impl ConfluenceRule for PriceVsEma200 {
    fn id(&self) -> &str {
        "price_vs_ema200"
    }

    fn name(&self) -> &str {
        "Price vs EMA200"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Trend
    }

    fn weight(&self) -> f64 {
        1.5
    }

    fn evaluate(&self, ctx: &RuleContext) -> Option<RuleOutcome> {
        let w = self.weight();
        let price = ctx.current.price?;
        let ema200 = ctx.current.ema200?;

        Some(if price > ema200 {
            RuleOutcome::bullish(w, "Price above EMA200 (long-term uptrend)")
        } else if price < ema200 {
            RuleOutcome::bearish(w, "Price below EMA200 (long-term downtrend)")
        } else {
            RuleOutcome::neutral(w, "Price at EMA200")
        })
    }
}

/// EMA20 relative to EMA50, boosted on a fresh golden or death cross.
pub struct EmaCross;

impl ConfluenceRule for EmaCross {
    fn id(&self) -> &str {
        "ema_cross"
    }

    fn name(&self) -> &str {
        "EMA20/50 Cross"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Trend
    }

    fn weight(&self) -> f64 {
        1.5
    }

    fn evaluate(&self, ctx: &RuleContext) -> Option<RuleOutcome> {
        let w = self.weight();
        let (Some(fast), Some(slow)) = (ctx.current.ema20, ctx.current.ema50) else {
            return Some(unavailable(w, "EMA20/50 cross"));
        };
        let prev = (ctx.previous.ema20, ctx.previous.ema50);

        Some(if fast > slow {
            if matches!(prev, (Some(pf), Some(ps)) if pf <= ps) {
                RuleOutcome::bullish(w * FRESH_CROSS_MULTIPLIER, "Golden cross: EMA20 crossed above EMA50")
            } else {
                RuleOutcome::bullish(w, "EMA20 above EMA50")
            }
        } else if fast < slow {
            if matches!(prev, (Some(pf), Some(ps)) if pf >= ps) {
                RuleOutcome::bearish(w * FRESH_CROSS_MULTIPLIER, "Death cross: EMA20 crossed below EMA50")
            } else {
                RuleOutcome::bearish(w, "EMA20 below EMA50")
            }
        } else {
            RuleOutcome::neutral(w, "EMA20 equal to EMA50")
        })
    }
}

/// RSI oversold/overbought zones, with a half-weight lean in the mid zone.
pub struct RsiZone;

impl ConfluenceRule for RsiZone {
    fn id(&self) -> &str {
        "rsi_zone"
    }

    fn name(&self) -> &str {
        "RSI (14)"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Momentum
    }

    fn weight(&self) -> f64 {
        2.0
    }

    fn evaluate(&self, ctx: &RuleContext) -> Option<RuleOutcome> {
        let w = self.weight();
        let Some(rsi) = ctx.current.rsi else {
            return Some(unavailable(w, "RSI"));
        };

        Some(if rsi < 30.0 {
            RuleOutcome::bullish(w, format!("RSI oversold ({:.1})", rsi))
        } else if rsi > 70.0 {
            RuleOutcome::bearish(w, format!("RSI overbought ({:.1})", rsi))
        } else if rsi > 50.0 {
            RuleOutcome::bullish(w / 2.0, format!("RSI bullish momentum ({:.1})", rsi))
        } else if rsi < 50.0 {
            RuleOutcome::bearish(w / 2.0, format!("RSI bearish momentum ({:.1})", rsi))
        } else {
            RuleOutcome::neutral(w, format!("RSI neutral ({:.1})", rsi))
        })
    }
}

/// MACD line relative to its signal line, boosted on a fresh crossover.
pub struct MacdCross;

impl ConfluenceRule for MacdCross {
    fn id(&self) -> &str {
        "macd_cross"
    }

    fn name(&self) -> &str {
        "MACD Cross"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Momentum
    }

    fn weight(&self) -> f64 {
        2.0
    }

    fn evaluate(&self, ctx: &RuleContext) -> Option<RuleOutcome> {
        let w = self.weight();
        let (Some(line), Some(signal)) = (ctx.current.macd, ctx.current.macd_signal) else {
            return Some(unavailable(w, "MACD"));
        };
        let prev = (ctx.previous.macd, ctx.previous.macd_signal);

        Some(if line > signal {
            if matches!(prev, (Some(pl), Some(ps)) if pl <= ps) {
                RuleOutcome::bullish(w * FRESH_CROSS_MULTIPLIER, "MACD bullish crossover")
            } else {
                RuleOutcome::bullish(w, "MACD above signal line")
            }
        } else if line < signal {
            if matches!(prev, (Some(pl), Some(ps)) if pl >= ps) {
                RuleOutcome::bearish(w * FRESH_CROSS_MULTIPLIER, "MACD bearish crossover")
            } else {
                RuleOutcome::bearish(w, "MACD below signal line")
            }
        } else {
            RuleOutcome::neutral(w, "MACD on signal line")
        })
    }
}

/// Direction of the MACD histogram relative to the previous bar.
pub struct MacdHistogram;

impl ConfluenceRule for MacdHistogram {
    fn id(&self) -> &str {
        "macd_histogram"
    }

    fn name(&self) -> &str {
        "MACD Histogram"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Momentum
    }

    fn weight(&self) -> f64 {
        1.0
    }

    fn evaluate(&self, ctx: &RuleContext) -> Option<RuleOutcome> {
        let w = self.weight();
        let (Some(hist), Some(prev)) = (ctx.current.macd_histogram, ctx.previous.macd_histogram)
        else {
            return Some(unavailable(w, "MACD histogram"));
        };

        Some(if hist > 0.0 && hist > prev {
            RuleOutcome::bullish(w, "MACD histogram rising above zero")
        } else if hist < 0.0 && hist < prev {
            RuleOutcome::bearish(w, "MACD histogram falling below zero")
        } else {
            RuleOutcome::neutral(w, "MACD histogram momentum fading")
        })
    }
}

/// Where price sits within the Bollinger Bands (%B).
pub struct BollingerPosition;

impl ConfluenceRule for BollingerPosition {
    fn id(&self) -> &str {
        "bollinger_position"
    }

    fn name(&self) -> &str {
        "Bollinger Bands"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Volatility
    }

    fn weight(&self) -> f64 {
        1.5
    }

    fn evaluate(&self, ctx: &RuleContext) -> Option<RuleOutcome> {
        let w = self.weight();
        let c = ctx.current;
        let Some(width) = c.bb_width() else {
            return Some(unavailable(w, "Bollinger Bands"));
        };
        if width <= 0.0 {
            return Some(RuleOutcome::neutral(w, "Bollinger Bands flat (no volatility)"));
        }
        let Some(percent_b) = c.percent_b() else {
            return Some(unavailable(w, "Bollinger Bands"));
        };

        Some(if percent_b < 0.0 {
            RuleOutcome::bullish(w, "Price below lower Bollinger Band")
        } else if percent_b > 1.0 {
            RuleOutcome::bearish(w, "Price above upper Bollinger Band")
        } else if percent_b < 0.3 {
            RuleOutcome::bullish(w / 2.0, "Price near lower Bollinger Band")
        } else if percent_b > 0.7 {
            RuleOutcome::bearish(w / 2.0, "Price near upper Bollinger Band")
        } else {
            RuleOutcome::neutral(w, "Price mid Bollinger Bands")
        })
    }
}

/// Stochastic RSI %K zones.
pub struct StochRsiZone;

impl ConfluenceRule for StochRsiZone {
    fn id(&self) -> &str {
        "stoch_rsi_zone"
    }

    fn name(&self) -> &str {
        "Stochastic RSI"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Momentum
    }

    fn weight(&self) -> f64 {
        1.5
    }

    fn evaluate(&self, ctx: &RuleContext) -> Option<RuleOutcome> {
        let w = self.weight();
        let Some(k) = ctx.current.stoch_rsi_k else {
            return Some(unavailable(w, "Stochastic RSI"));
        };

        Some(if k < 20.0 {
            RuleOutcome::bullish(w, format!("Stochastic RSI oversold ({:.1})", k))
        } else if k > 80.0 {
            RuleOutcome::bearish(w, format!("Stochastic RSI overbought ({:.1})", k))
        } else {
            RuleOutcome::neutral(w, format!("Stochastic RSI neutral ({:.1})", k))
        })
    }
}

/// ADX trend strength with directional-indicator dominance.
pub struct AdxDirection;

/// ADX above this reads as a trending market.
const ADX_TREND_THRESHOLD: f64 = 25.0;

impl ConfluenceRule for AdxDirection {
    fn id(&self) -> &str {
        "adx_direction"
    }

    fn name(&self) -> &str {
        "ADX (14)"
    }

    fn category(&self) -> SignalCategory {
        SignalCategory::Trend
    }

    fn weight(&self) -> f64 {
        1.5
    }

    fn evaluate(&self, ctx: &RuleContext) -> Option<RuleOutcome> {
        let w = self.weight();
        let c = ctx.current;
        let (Some(adx), Some(plus), Some(minus)) = (c.adx, c.plus_di, c.minus_di) else {
            return Some(unavailable(w, "ADX"));
        };

        if adx <= ADX_TREND_THRESHOLD {
            return Some(RuleOutcome::neutral(w, format!("Weak trend (ADX {:.1})", adx)));
        }

        Some(if plus > minus {
            RuleOutcome::bullish(w, format!("Strong uptrend (ADX {:.1}, +DI > -DI)", adx))
        } else if minus > plus {
            RuleOutcome::bearish(w, format!("Strong downtrend (ADX {:.1}, -DI > +DI)", adx))
        } else {
            RuleOutcome::neutral(w, format!("Trending without direction (ADX {:.1})", adx))
        })
    }
}
