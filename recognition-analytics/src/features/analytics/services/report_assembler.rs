// recognition-analytics/src/features/analytics/services/report_assembler.rs

use crate::features::analytics::dto::AnalyticsReport;
use crate::features::analytics::models::{RawMetrics, ResolvedPeriods};
use crate::features::analytics::services::comparison::{avg_per_person, percent_change};
use crate::types::format_canonical;

/// 期間と集計結果からレポートを組み立てる (I/O なし)
pub struct ReportAssembler;

impl ReportAssembler {
    pub fn assemble(periods: &ResolvedPeriods, raw: RawMetrics) -> AnalyticsReport {
        let current = raw.current();
        let previous = raw.previous();

        let avg = avg_per_person(current.total_count, current.total_users);
        let previous_avg = avg_per_person(previous.total_count, previous.total_users);

        AnalyticsReport {
            top_individuals: raw.top_individuals,
            top_teams: raw.top_teams,
            total_count: current.total_count,
            avg_per_person: avg,
            previous_total_count: previous.total_count,
            previous_avg_per_person: previous_avg,
            total_percentage_change: percent_change(
                current.total_count as f64,
                previous.total_count as f64,
            ),
            avg_percentage_change: percent_change(avg, previous_avg),
            most_active_day: raw.most_active_day,
            period_start: format_canonical(&periods.current.start),
            period_end: format_canonical(&periods.current.end),
            previous_period_start: format_canonical(&periods.previous.start),
            previous_period_end: format_canonical(&periods.previous.end),
            degraded_metrics: raw.degraded,
        }
    }
}
