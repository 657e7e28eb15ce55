// src/lib.rs
pub mod config;
pub mod error;
pub mod features;
pub mod logging;
pub mod types;

// Re-export commonly used types
pub use config::AnalyticsConfig;
pub use error::{AnalyticsError, AnalyticsResult, DataStoreError};
pub use features::analytics::dto::{AnalyticsReport, AnalyticsReportQuery};
pub use features::analytics::models::{AnalyticsRequest, PeriodKind};
pub use features::analytics::repositories::{InMemoryMetricsStore, MetricsStore};
pub use features::analytics::services::AnalyticsService;
