// src/logging/mod.rs

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::features::analytics::models::{AnalyticsRequest, PeriodKind};

/// ログレベルを実行時に選んで構造化ログを出力する
#[macro_export]
macro_rules! log_with_context {
    ($level:expr, $msg:expr $(, $($key:ident => $value:expr),* $(,)?)?) => {
        match $level {
            tracing::Level::ERROR => {
                tracing::error!(
                    message = $msg
                    $(, $($key = ?$value,)*)?
                );
            }
            tracing::Level::WARN => {
                tracing::warn!(
                    message = $msg
                    $(, $($key = ?$value,)*)?
                );
            }
            tracing::Level::INFO => {
                tracing::info!(
                    message = $msg
                    $(, $($key = ?$value,)*)?
                );
            }
            tracing::Level::DEBUG => {
                tracing::debug!(
                    message = $msg
                    $(, $($key = ?$value,)*)?
                );
            }
            _ => {}
        }
    };
}

pub const DEFAULT_LOG_FILTER: &str = "recognition_analytics=info,recognition_report=info";

/// トレーシングの設定 (RUST_LOG があればそちらを優先)
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(fmt::layer())
        .try_init();
}

// レポート計算のコンテキスト
#[derive(Clone, Debug)]
pub struct ReportContext {
    pub request_id: String,
    pub period: PeriodKind,
    pub custom_range: bool,
    pub team_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

impl ReportContext {
    pub fn from_request(request: &AnalyticsRequest) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            period: request.period,
            custom_range: request.custom_range().is_some(),
            team_id: request.team_id,
            category_id: request.category_id,
        }
    }

    pub fn span(&self) -> tracing::Span {
        tracing::info_span!(
            "analytics_report",
            request_id = %self.request_id,
            period = %self.period,
            custom_range = self.custom_range,
            team_id = ?self.team_id,
            category_id = ?self.category_id,
        )
    }
}
