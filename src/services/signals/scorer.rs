//! Confluence scoring: indicators, rules and divergences folded into one report.

use tracing::debug;

use super::divergence::{self, DEFAULT_LOOKBACK};
use super::indicators::IndicatorSet;
use super::rules::{default_rules, ConfluenceRule, RuleContext, RuleOutcome};
use crate::types::{
    Bias, Candle, ConfluenceReport, Divergence, MarketType, RuleVote, SignalDetails,
    SignalDirection, TrendDirection, TrendStrength,
};

/// Flat weight added for each detected divergence.
pub const DIVERGENCE_WEIGHT: f64 = 2.0;

/// One side must outweigh the other by this factor to produce a directional signal.
pub const DOMINANCE_RATIO: f64 = 1.3;

/// Winning side's share of the total needed for a STRONG signal.
pub const STRONG_SIGNAL_PCT: f64 = 70.0;

/// Running bullish/bearish/neutral weight with the observations behind it.
#[derive(Debug, Default)]
struct Tally {
    bullish: f64,
    bearish: f64,
    neutral: f64,
    details: SignalDetails,
}

impl Tally {
    fn add(&mut self, outcome: RuleOutcome) {
        match outcome.bias {
            Bias::Bullish => self.bullish += outcome.weight,
            Bias::Bearish => self.bearish += outcome.weight,
            Bias::Neutral => self.neutral += outcome.weight,
        }
        self.details.push(outcome.bias, outcome.description);
    }

    fn add_divergence(&mut self, divergence: Divergence, oscillator: &str) {
        match divergence {
            Divergence::Bullish => self.add(RuleOutcome::bullish(
                DIVERGENCE_WEIGHT,
                format!("Bullish {} divergence", oscillator),
            )),
            Divergence::Bearish => self.add(RuleOutcome::bearish(
                DIVERGENCE_WEIGHT,
                format!("Bearish {} divergence", oscillator),
            )),
            Divergence::None => {}
        }
    }

    /// Bullish, bearish and neutral percentages of the total weight.
    fn percentages(&self) -> (f64, f64, f64) {
        let total = self.bullish + self.bearish + self.neutral;
        if total <= 0.0 {
            return (50.0, 50.0, 0.0);
        }
        (
            self.bullish / total * 100.0,
            self.bearish / total * 100.0,
            self.neutral / total * 100.0,
        )
    }
}

/// Classify the tally into a signal direction.
pub fn classify(bullish: f64, bearish: f64, bullish_pct: f64, bearish_pct: f64) -> SignalDirection {
    if bullish > DOMINANCE_RATIO * bearish {
        if bullish_pct >= STRONG_SIGNAL_PCT {
            SignalDirection::StrongBuy
        } else {
            SignalDirection::Buy
        }
    } else if bearish > DOMINANCE_RATIO * bullish {
        if bearish_pct >= STRONG_SIGNAL_PCT {
            SignalDirection::StrongSell
        } else {
            SignalDirection::Sell
        }
    } else {
        SignalDirection::Hold
    }
}

/// Confluence scorer.
///
/// Holds the ordered rule list and divergence lookback. Each call to
/// [`ConfluenceScorer::score`] recomputes everything from the candles it is given.
pub struct ConfluenceScorer {
    rules: Vec<Box<dyn ConfluenceRule>>,
    divergence_lookback: usize,
}

impl Default for ConfluenceScorer {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKBACK)
    }
}

impl ConfluenceScorer {
    pub fn new(divergence_lookback: usize) -> Self {
        Self {
            rules: default_rules(),
            divergence_lookback,
        }
    }

    /// Scorer with a custom rule list.
    pub fn with_rules(rules: Vec<Box<dyn ConfluenceRule>>, divergence_lookback: usize) -> Self {
        Self {
            rules,
            divergence_lookback,
        }
    }

    /// Score a candle history, oldest first.
    pub fn score(&self, candles: &[Candle]) -> ConfluenceReport {
        self.score_for_market(candles, None)
    }

    /// Score a candle history and tag the report with its market.
    pub fn score_for_market(
        &self,
        candles: &[Candle],
        market_type: Option<MarketType>,
    ) -> ConfluenceReport {
        let set = IndicatorSet::compute(candles);
        let current = set.latest();
        let previous = set.previous();
        let ctx = RuleContext {
            current: &current,
            previous: &previous,
        };

        let mut tally = Tally::default();
        let mut votes = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            match rule.evaluate(&ctx) {
                Some(outcome) => {
                    votes.push(RuleVote {
                        rule: rule.id().to_string(),
                        name: rule.name().to_string(),
                        category: rule.category(),
                        bias: outcome.bias,
                        weight: outcome.weight,
                    });
                    tally.add(outcome);
                }
                None => debug!("Rule {} skipped", rule.id()),
            }
        }

        let rsi_divergence = divergence::detect(&set.closes, &set.rsi, self.divergence_lookback);
        let macd_divergence =
            divergence::detect(&set.closes, &set.macd.line, self.divergence_lookback);
        tally.add_divergence(rsi_divergence, "RSI");
        tally.add_divergence(macd_divergence, "MACD");

        let (bullish_pct, bearish_pct, neutral_pct) = tally.percentages();
        let signal = classify(tally.bullish, tally.bearish, bullish_pct, bearish_pct);

        let nan = f64::NAN;
        let trend_direction = TrendDirection::classify(
            current.price.unwrap_or(nan),
            current.ema20.unwrap_or(nan),
            current.ema50.unwrap_or(nan),
        );
        let trend_strength = TrendStrength::from_adx(current.adx.unwrap_or(nan));

        debug!(
            "Scored {} candles: {:?} (bullish {:.2}, bearish {:.2}, neutral {:.2})",
            candles.len(),
            signal,
            tally.bullish,
            tally.bearish,
            tally.neutral
        );

        ConfluenceReport {
            signal,
            confidence: signal.confidence(),
            bullish_score: tally.bullish,
            bearish_score: tally.bearish,
            neutral_score: tally.neutral,
            bullish_pct,
            bearish_pct,
            neutral_pct,
            trend_direction,
            trend_strength,
            rsi_divergence,
            macd_divergence,
            indicators: current,
            fibonacci: set.fibonacci,
            signal_details: tally.details,
            votes,
            warming_up: set.warming_up,
            candle_count: candles.len(),
            market_type,
        }
    }
}
