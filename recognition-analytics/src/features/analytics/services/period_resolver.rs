// recognition-analytics/src/features/analytics/services/period_resolver.rs

//! 集計期間の算出
//!
//! 列挙された期間種別では、今期は期首から「今日の終わり」までの to-date 期間、
//! 前期は同じ種別の完全な期間となる。例えば月次で 3/10 に計算すると
//! 今期は 3/1〜3/10、前期は 2/1〜2/29 となり、期の序盤ほど変化率が負に
//! 振れやすい。

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset,
    SubsecRound, Utc,
};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::features::analytics::models::{AnalyticsRequest, DateRange, PeriodKind, ResolvedPeriods};

/// 期間種別とカスタム期間から今期・前期を算出する
#[derive(Debug, Clone, Copy)]
pub struct PeriodResolver {
    utc_offset: FixedOffset,
}

impl Default for PeriodResolver {
    fn default() -> Self {
        Self::utc()
    }
}

impl PeriodResolver {
    /// 暦の境界を `utc_offset` のローカル時刻で判定する
    pub fn new(utc_offset: FixedOffset) -> Self {
        Self { utc_offset }
    }

    pub fn utc() -> Self {
        Self {
            utc_offset: Utc.fix(),
        }
    }

    /// リクエストから今期・前期を算出
    ///
    /// カスタム期間 (開始・終了の両方) が指定されていれば期間種別より優先する。
    pub fn resolve(
        &self,
        request: &AnalyticsRequest,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<ResolvedPeriods> {
        match request.custom_range() {
            Some((start, end)) => Self::resolve_custom(start, end),
            None => self.resolve_period(request.period, now),
        }
    }

    /// カスタム期間: 前期は同じ長さで、今期の開始時刻ちょうどで終わる
    ///
    /// 境界はミリ秒未満を切り捨ててから扱う。
    pub fn resolve_custom(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> AnalyticsResult<ResolvedPeriods> {
        let start = start.trunc_subsecs(3);
        let current = DateRange::new(start, end.trunc_subsecs(3))?;
        let previous_start = start
            .checked_sub_signed(current.duration())
            .ok_or_else(|| out_of_range("previous period start"))?;

        Ok(ResolvedPeriods {
            current,
            previous: DateRange {
                start: previous_start,
                end: start,
            },
        })
    }

    /// 列挙された期間種別: 今期は期首から今日の終わりまで、前期は直前の完全な期間
    pub fn resolve_period(
        &self,
        kind: PeriodKind,
        now: DateTime<Utc>,
    ) -> AnalyticsResult<ResolvedPeriods> {
        let today = now.with_timezone(&self.utc_offset).date_naive();
        let current_end = end_of_day(today)?;

        let (current_start, previous_start) = match kind {
            PeriodKind::Weekly => {
                let sunday = today - Duration::days(today.weekday().num_days_from_sunday() as i64);
                (sunday, sunday - Duration::days(7))
            }
            PeriodKind::Monthly => {
                let (prev_year, prev_month) = if today.month() == 1 {
                    (today.year() - 1, 12)
                } else {
                    (today.year(), today.month() - 1)
                };
                (
                    first_of_month(today.year(), today.month())?,
                    first_of_month(prev_year, prev_month)?,
                )
            }
            PeriodKind::Quarterly => {
                let quarter = today.month0() / 3;
                let prev_quarter = (quarter + 3) % 4;
                // Q1 から Q4 に戻るときだけ前年になる
                let prev_year = if prev_quarter > quarter {
                    today.year() - 1
                } else {
                    today.year()
                };
                (
                    first_of_month(today.year(), quarter * 3 + 1)?,
                    first_of_month(prev_year, prev_quarter * 3 + 1)?,
                )
            }
            PeriodKind::Yearly => (
                first_of_month(today.year(), 1)?,
                first_of_month(today.year() - 1, 1)?,
            ),
        };

        let current_start = start_of_day(current_start);
        let previous_end = current_start - Duration::milliseconds(1);

        Ok(ResolvedPeriods {
            current: DateRange::new(self.to_utc(current_start), self.to_utc(current_end))?,
            previous: DateRange::new(
                self.to_utc(start_of_day(previous_start)),
                self.to_utc(previous_end),
            )?,
        })
    }

    fn to_utc(&self, local: NaiveDateTime) -> DateTime<Utc> {
        (local - Duration::seconds(self.utc_offset.local_minus_utc() as i64)).and_utc()
    }
}

fn out_of_range(what: &str) -> AnalyticsError {
    AnalyticsError::InvalidRange(format!("{} is out of the supported calendar range", what))
}

fn first_of_month(year: i32, month: u32) -> AnalyticsResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| out_of_range(&format!("{:04}-{:02}-01", year, month)))
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// 23:59:59.999
fn end_of_day(date: NaiveDate) -> AnalyticsResult<NaiveDateTime> {
    let next = date
        .succ_opt()
        .ok_or_else(|| out_of_range(&date.to_string()))?;
    Ok(start_of_day(next) - Duration::milliseconds(1))
}
