// src/main.rs
use clap::Parser;
use std::sync::Arc;

mod cli;

use crate::cli::Cli;
use recognition_analytics::features::analytics::models::RecognitionDataset;
use recognition_analytics::logging::init_tracing;
use recognition_analytics::{AnalyticsConfig, AnalyticsService, InMemoryMetricsStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // トレーシングの設定
    init_tracing();

    let config = AnalyticsConfig::from_env()?;
    tracing::info!("Configuration loaded: {:?}", config);

    let dataset_path = cli
        .dataset
        .clone()
        .or_else(|| config.dataset_path.clone())
        .ok_or("dataset path is required (--dataset or ANALYTICS_DATASET_PATH)")?;

    // データセットを読み込む
    let raw = tokio::fs::read_to_string(&dataset_path).await?;
    let dataset: RecognitionDataset = serde_json::from_str(&raw)?;
    let store = InMemoryMetricsStore::new(dataset).with_utc_offset(config.utc_offset);
    tracing::info!(
        path = %dataset_path,
        recognitions = store.recognition_count(),
        "Dataset loaded"
    );

    let service = AnalyticsService::new(Arc::new(store), config);
    let request = service.request_from_query(cli.to_query())?;
    let report = service.compute_report(&request).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
