pub mod analysis;
pub mod batch;
pub mod series;
pub mod signals;

pub use analysis::{
    analyze, parse_request, validate_candles, AnalysisRequest, AnalysisResponse, TradePlan,
    TradeSide,
};
pub use batch::score_batch;
pub use signals::ConfluenceScorer;
