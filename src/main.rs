use std::sync::Arc;

use anyhow::Context;
use confluence::{parse_request, score_batch, Config};
use tokio::io::AsyncReadExt;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Score candle histories given as JSON files (or stdin) and print one JSON response per input.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing. Logs go to stderr so stdout stays pure JSON.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "confluence=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::from_env();
    config.validate()?;
    let config = Arc::new(config);

    let paths: Vec<String> = std::env::args().skip(1).collect();
    let mut documents = Vec::with_capacity(paths.len().max(1));
    if paths.is_empty() {
        let mut input = String::new();
        tokio::io::stdin()
            .read_to_string(&mut input)
            .await
            .context("Failed to read stdin")?;
        documents.push(("stdin".to_string(), input));
    } else {
        for path in paths {
            let input = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path))?;
            documents.push((path, input));
        }
    }

    let mut requests = Vec::with_capacity(documents.len());
    for (source, input) in &documents {
        let request =
            parse_request(input).with_context(|| format!("Failed to parse {}", source))?;
        requests.push(request);
    }
    info!("Loaded {} request(s)", requests.len());

    let results = score_batch(requests, config.clone()).await;

    let mut failures = 0usize;
    for ((source, _), result) in documents.iter().zip(results) {
        match result {
            Ok(response) => {
                info!("{}: {}", source, response.summary);
                let json = if config.pretty_json {
                    serde_json::to_string_pretty(&response)?
                } else {
                    serde_json::to_string(&response)?
                };
                println!("{}", json);
            }
            Err(e) => {
                error!("{}: {}", source, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} inputs failed", failures, documents.len());
    }
    Ok(())
}
