//! `recognition-report` のコマンドライン引数

use chrono::{DateTime, Utc};
use clap::Parser;
use recognition_analytics::AnalyticsReportQuery;
use uuid::Uuid;

/// Compute a recognition analytics report from a JSON dataset and print it as JSON.
#[derive(Parser, Debug)]
#[command(name = "recognition-report")]
#[command(about = "Recognition program analytics report", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the dataset JSON. Falls back to ANALYTICS_DATASET_PATH.
    #[arg(long)]
    pub dataset: Option<String>,

    /// Period kind: weekly, monthly, quarterly or yearly (default: monthly).
    #[arg(long)]
    pub period: Option<String>,

    /// Custom range start (RFC 3339). Used only together with --end.
    #[arg(long)]
    pub start: Option<DateTime<Utc>>,

    /// Custom range end (RFC 3339). Used only together with --start.
    #[arg(long)]
    pub end: Option<DateTime<Utc>>,

    /// Restrict to recipients of this team.
    #[arg(long)]
    pub team: Option<Uuid>,

    /// Restrict to this recognition category.
    #[arg(long)]
    pub category: Option<Uuid>,

    /// Number of ranked entries (1-100, default: ANALYTICS_DEFAULT_TOP_N).
    #[arg(long)]
    pub top: Option<u32>,
}

impl Cli {
    pub fn to_query(&self) -> AnalyticsReportQuery {
        AnalyticsReportQuery {
            period: self.period.clone(),
            start_date: self.start,
            end_date: self.end,
            team_id: self.team,
            category_id: self.category,
            top_n: self.top,
        }
    }
}
