//! Concurrent scoring of independent requests.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::services::analysis::{analyze, AnalysisRequest, AnalysisResponse};

/// Analyse every request on the blocking pool, at most `scoring_concurrency` at a time.
///
/// Results come back in input order. A failing request does not affect the others.
pub async fn score_batch(
    requests: Vec<AnalysisRequest>,
    config: Arc<Config>,
) -> Vec<Result<AnalysisResponse>> {
    let permits = Arc::new(Semaphore::new(config.scoring_concurrency.max(1)));
    let total = requests.len();
    info!(
        "Scoring {} requests with concurrency {}",
        total, config.scoring_concurrency
    );

    let handles: Vec<_> = requests
        .into_iter()
        .enumerate()
        .map(|(index, request)| {
            let permits = permits.clone();
            let config = config.clone();
            tokio::spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|e| AppError::Config(format!("scoring pool closed: {}", e)))?;
                debug!("Request {} started", index);
                let response =
                    tokio::task::spawn_blocking(move || analyze(request, &config)).await??;
                Ok::<_, AppError>(response)
            })
        })
        .collect();

    let mut results = Vec::with_capacity(total);
    for handle in handles {
        results.push(match handle.await {
            Ok(result) => result,
            Err(e) => Err(AppError::Join(e)),
        });
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_support::{
        create_choppy_candles, create_downtrend_candles, create_uptrend_candles,
    };
    use crate::types::{Candle, SignalDirection};

    fn request(symbol: &str, candles: Vec<Candle>) -> AnalysisRequest {
        AnalysisRequest {
            symbol: Some(symbol.to_string()),
            ..AnalysisRequest::from_candles(candles)
        }
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let requests = vec![
            request("UP", create_uptrend_candles(250)),
            request("DOWN", create_downtrend_candles(250)),
            request("SHORT", create_uptrend_candles(5)),
        ];
        let results = score_batch(requests, Arc::new(Config::default())).await;

        assert_eq!(results.len(), 3);
        let symbols: Vec<String> = results
            .iter()
            .map(|r| r.as_ref().unwrap().symbol.clone().unwrap())
            .collect();
        assert_eq!(symbols, vec!["UP", "DOWN", "SHORT"]);

        assert!(results[0].as_ref().unwrap().report.signal.is_bullish());
        assert!(results[1].as_ref().unwrap().report.signal.is_bearish());
        assert_eq!(
            results[2].as_ref().unwrap().report.signal,
            SignalDirection::Hold
        );
    }

    #[tokio::test]
    async fn test_batch_isolates_failures() {
        let requests = vec![request("EMPTY", vec![]), request("OK", create_uptrend_candles(60))];
        let config = Config {
            scoring_concurrency: 1,
            ..Default::default()
        };
        let results = score_batch(requests, Arc::new(config)).await;

        assert!(matches!(results[0], Err(AppError::InvalidInput(_))));
        assert!(results[1].is_ok());
    }

    #[tokio::test]
    async fn test_batch_matches_sequential() {
        let config = Arc::new(Config::default());
        let candles = create_choppy_candles(220);
        let sequential = analyze(request("A", candles.clone()), &config).unwrap();
        let batch = score_batch(vec![request("A", candles)], config).await;
        assert_eq!(batch[0].as_ref().unwrap().report, sequential.report);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let results = score_batch(vec![], Arc::new(Config::default())).await;
        assert!(results.is_empty());
    }
}
