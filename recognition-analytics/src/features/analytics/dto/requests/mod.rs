use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::AnalyticsResult;
use crate::features::analytics::models::{AnalyticsRequest, PeriodKind};

/// 外部レイヤーから受け取るレポート取得パラメータ
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AnalyticsReportQuery {
    pub period: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub team_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    #[validate(range(min = 1, max = 100, message = "top_n must be between 1 and 100"))]
    pub top_n: Option<u32>,
}

impl AnalyticsReportQuery {
    /// 期間種別を解釈する。未指定は MONTHLY、未知の値は strict でなければ MONTHLY
    pub fn period_kind(&self, strict: bool) -> AnalyticsResult<PeriodKind> {
        match self.period.as_deref() {
            None => Ok(PeriodKind::default()),
            Some(raw) if strict => raw.parse(),
            Some(raw) => Ok(PeriodKind::parse_lenient(raw)),
        }
    }

    /// 入力を検証してリクエストに変換
    pub fn into_request(
        self,
        strict: bool,
        default_top_n: u32,
    ) -> AnalyticsResult<AnalyticsRequest> {
        self.validate()?;

        Ok(AnalyticsRequest {
            period: self.period_kind(strict)?,
            custom_start: self.start_date,
            custom_end: self.end_date,
            team_id: self.team_id,
            category_id: self.category_id,
            top_n: self.top_n.unwrap_or(default_top_n),
        })
    }
}
