pub mod candle;
pub mod report;
pub mod timeframe;

pub use candle::*;
pub use report::*;
pub use timeframe::*;
