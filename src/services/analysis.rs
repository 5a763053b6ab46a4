//! Request loading, validation and the analysis response built around a report.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::signals::ConfluenceScorer;
use crate::types::{context_for, Candle, ConfluenceReport, MarketType, TimeframeContext};

/// A candle history to analyse, with optional metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_type: Option<MarketType>,
    /// Timeframe identifier such as `1hour`. Unknown identifiers use the `1hour` context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    pub candles: Vec<Candle>,
}

impl AnalysisRequest {
    pub fn from_candles(candles: Vec<Candle>) -> Self {
        Self {
            symbol: None,
            market_type: None,
            timeframe: None,
            candles,
        }
    }
}

/// Accepted input documents: a full request or a bare candle array.
#[derive(Deserialize)]
#[serde(untagged)]
enum RequestDocument {
    Request(AnalysisRequest),
    Candles(Vec<Candle>),
}

/// Parse a JSON request document.
pub fn parse_request(json: &str) -> Result<AnalysisRequest> {
    let document: RequestDocument = serde_json::from_str(json).map_err(|e| {
        AppError::InvalidInput(format!(
            "expected a request object or candle array: {}",
            e
        ))
    })?;

    Ok(match document {
        RequestDocument::Request(request) => request,
        RequestDocument::Candles(candles) => AnalysisRequest::from_candles(candles),
    })
}

/// Check that a candle history is usable: non-empty, finite, ordered and consistent.
pub fn validate_candles(candles: &[Candle]) -> Result<()> {
    if candles.is_empty() {
        return Err(AppError::InvalidInput("no candles provided".to_string()));
    }

    for (i, candle) in candles.iter().enumerate() {
        let prices = [candle.open, candle.high, candle.low, candle.close];
        if prices.iter().any(|p| !p.is_finite()) {
            return Err(AppError::InvalidInput(format!(
                "candle {} has a non-finite price",
                i
            )));
        }
        if !candle.volume.is_finite() || candle.volume < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "candle {} has an invalid volume ({})",
                i, candle.volume
            )));
        }
        if candle.low > candle.high {
            return Err(AppError::InvalidInput(format!(
                "candle {} has low {} above high {}",
                i, candle.low, candle.high
            )));
        }
        if i > 0 && candle.timestamp <= candles[i - 1].timestamp {
            return Err(AppError::InvalidInput(format!(
                "candle {} timestamp {} is not after {}",
                i,
                candle.timestamp,
                candles[i - 1].timestamp
            )));
        }
    }

    Ok(())
}

/// Direction of a trade plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Long,
    Short,
}

/// Entry, stop and targets implied by a directional signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePlan {
    pub side: TradeSide,
    pub entry: f64,
    pub stop_loss: f64,
    pub take_profit_1: f64,
    pub take_profit_2: f64,
    /// Distance to the second target over distance to the stop.
    pub risk_reward: f64,
}

impl TradePlan {
    /// Build a plan from the latest report and timeframe context. HOLD gives no plan.
    ///
    /// The stop sits at the midpoint of the timeframe's stop range, but never closer
    /// than one ATR. Targets sit at the bottom and top of the take-profit range.
    pub fn from_report(report: &ConfluenceReport, context: &TimeframeContext) -> Option<Self> {
        let side = match report.signal {
            s if s.is_bullish() => TradeSide::Long,
            s if s.is_bearish() => TradeSide::Short,
            _ => return None,
        };
        let entry = report.indicators.price?;
        if entry <= 0.0 {
            return None;
        }

        let atr = report.indicators.atr.unwrap_or(0.0);
        let stop_distance = (entry * context.sl_range.midpoint() / 100.0).max(atr);
        let tp1_distance = entry * context.tp_range.min / 100.0;
        let tp2_distance = entry * context.tp_range.max / 100.0;

        let direction = match side {
            TradeSide::Long => 1.0,
            TradeSide::Short => -1.0,
        };

        Some(Self {
            side,
            entry,
            stop_loss: entry - direction * stop_distance,
            take_profit_1: entry + direction * tp1_distance,
            take_profit_2: entry + direction * tp2_distance,
            risk_reward: tp2_distance / stop_distance,
        })
    }
}

/// Report plus presentation context for one analysed history.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    /// Latest close formatted for the market.
    pub price: String,
    /// Open time of the latest candle, RFC 3339.
    pub as_of: Option<String>,
    /// One-line signal and timeframe description, e.g. `Buy on 1 Hour (Intraday): TP 0.8% - 2%, SL 0.4% - 1%`.
    pub summary: String,
    pub timeframe: TimeframeContext,
    pub report: ConfluenceReport,
    pub trade_plan: Option<TradePlan>,
}

/// Validate and score a request.
pub fn analyze(request: AnalysisRequest, config: &Config) -> Result<AnalysisResponse> {
    validate_candles(&request.candles)?;

    let symbol = request.symbol.as_deref().unwrap_or("unknown");
    let market_type = request.market_type.unwrap_or(config.market_type);
    let context = match request.timeframe.as_deref() {
        Some(id) => context_for(id),
        None => config.default_timeframe.context(),
    };
    if let Some(id) = request.timeframe.as_deref() {
        if id != context.timeframe.id() {
            warn!("{}: unknown timeframe '{}', using {}", symbol, id, context.timeframe.id());
        }
    }

    let scorer = ConfluenceScorer::new(config.divergence_lookback);
    let report = scorer.score_for_market(&request.candles, Some(market_type));
    let trade_plan = TradePlan::from_report(&report, &context);

    if request.candles.len() < config.min_candles {
        let undefined = if report.warming_up.is_empty() {
            "none".to_string()
        } else {
            report.warming_up.join(", ")
        };
        warn!(
            "{}: only {} candles (want {}), still warming up: {}",
            symbol,
            request.candles.len(),
            config.min_candles,
            undefined
        );
    }

    debug!(
        "{}: {:?} on {} ({:.1}% bullish, {:.1}% bearish)",
        symbol,
        report.signal,
        context.timeframe.id(),
        report.bullish_pct,
        report.bearish_pct
    );

    let summary = format!(
        "{} on {} ({}): TP {}, SL {}",
        report.signal.label(),
        context.display_name,
        context.style.name(),
        context.tp_range.label(),
        context.sl_range.label()
    );
    let price = market_type.format_price(report.indicators.price.unwrap_or(f64::NAN));
    let as_of = request
        .candles
        .last()
        .and_then(Candle::datetime)
        .map(|dt| dt.to_rfc3339());

    Ok(AnalysisResponse {
        symbol: request.symbol,
        price,
        as_of,
        summary,
        timeframe: context,
        report,
        trade_plan,
    })
}
