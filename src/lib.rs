//! Confluence - technical indicator and confluence scoring engine for OHLCV candles

pub mod config;
pub mod error;
pub mod services;
pub mod types;

pub use config::Config;
pub use error::{AppError, Result};
pub use services::{
    analyze, parse_request, score_batch, AnalysisRequest, AnalysisResponse, ConfluenceScorer,
    TradePlan, TradeSide,
};
// Re-export commonly used types
pub use types::*;
