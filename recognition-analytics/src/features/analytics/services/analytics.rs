// recognition-analytics/src/features/analytics/services/analytics.rs

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn, Instrument};

use crate::config::AnalyticsConfig;
use crate::error::AnalyticsResult;
use crate::features::analytics::dto::{AnalyticsReport, AnalyticsReportQuery};
use crate::features::analytics::models::AnalyticsRequest;
use crate::features::analytics::repositories::MetricsStore;
use crate::features::analytics::services::aggregator::MetricsAggregator;
use crate::features::analytics::services::period_resolver::PeriodResolver;
use crate::features::analytics::services::report_assembler::ReportAssembler;
use crate::logging::ReportContext;
use crate::types::format_canonical;

/// 表彰プログラムの分析レポートを計算するサービス
pub struct AnalyticsService {
    resolver: PeriodResolver,
    aggregator: MetricsAggregator,
    config: AnalyticsConfig,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn MetricsStore>, config: AnalyticsConfig) -> Self {
        Self {
            resolver: PeriodResolver::new(config.utc_offset),
            aggregator: MetricsAggregator::new(store, config.aggregation_settings()),
            config,
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// 外部レイヤーのクエリを設定に従ってリクエストに変換
    pub fn request_from_query(
        &self,
        query: AnalyticsReportQuery,
    ) -> AnalyticsResult<AnalyticsRequest> {
        query.into_request(self.config.strict_period_kind, self.config.default_top_n)
    }

    /// 現在時刻を基準にレポートを計算
    pub async fn compute_report(
        &self,
        request: &AnalyticsRequest,
    ) -> AnalyticsResult<AnalyticsReport> {
        self.compute_report_at(request, Utc::now()).await
    }

    /// `now` を基準にレポートを計算
    pub async fn compute_report_at(
        &self,
        request: &AnalyticsRequest,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<AnalyticsReport> {
        let context = ReportContext::from_request(request);
        self.compute(request, now).instrument(context.span()).await
    }

    async fn compute(
        &self,
        request: &AnalyticsRequest,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<AnalyticsReport> {
        let periods = self.resolver.resolve(request, now).map_err(|e| {
            warn!(error = %e, "Rejected analytics request");
            e
        })?;

        let top_n = self.effective_top_n(request.top_n);
        info!(
            current_start = %format_canonical(&periods.current.start),
            current_end = %format_canonical(&periods.current.end),
            previous_start = %format_canonical(&periods.previous.start),
            previous_end = %format_canonical(&periods.previous.end),
            top_n,
            "Computing analytics report"
        );

        let raw = self
            .aggregator
            .aggregate(&periods, &request.filter(), top_n as usize)
            .await?;

        let report = ReportAssembler::assemble(&periods, raw);
        if report.is_degraded() {
            warn!(
                degraded = ?report.degraded_metrics,
                "Analytics report assembled with default values for failed metrics"
            );
        }
        info!(
            total_count = report.total_count,
            previous_total_count = report.previous_total_count,
            total_percentage_change = report.total_percentage_change,
            "Analytics report computed"
        );

        Ok(report)
    }

    /// 1 以上、設定の上限以下に収める (上限 0 の設定でも 1 件は返す)
    fn effective_top_n(&self, requested: u32) -> u32 {
        let max = self.config.max_top_n.max(1);
        let clamped = requested.clamp(1, max);
        if clamped != requested {
            warn!(
                requested,
                applied = clamped,
                max,
                "top_n out of range, clamping"
            );
        }
        clamped
    }
}
