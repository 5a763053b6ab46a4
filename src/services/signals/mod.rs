//! Confluence signal engine.
//!
//! Provides technical indicator series, divergence detection, weighted
//! confluence rules and the scorer that folds them into a report.

pub mod divergence;
pub mod indicators;
pub mod rules;
pub mod scorer;

pub use divergence::detect as detect_divergence;
pub use indicators::{Indicator, IndicatorSet};
pub use rules::{default_rules, ConfluenceRule, RuleContext, RuleOutcome};
pub use scorer::ConfluenceScorer;
