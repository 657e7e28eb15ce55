use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

/// 集計対象のフィルタ
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsFilter {
    pub team_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
}

/// ランキングの1エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntity {
    pub id: Uuid,
    pub name: String,
    pub count: u64,
}

impl RankedEntity {
    pub fn new(id: Uuid, name: impl Into<String>, count: u64) -> Self {
        Self {
            id,
            name: name.into(),
            count,
        }
    }
}

/// 件数の降順、同数の場合は ID の昇順
pub fn rank_order(a: &RankedEntity, b: &RankedEntity) -> Ordering {
    b.count.cmp(&a.count).then_with(|| a.id.cmp(&b.id))
}

/// 並べ替えて上位 `limit` 件に切り詰める
pub fn rank_entities(mut entries: Vec<RankedEntity>, limit: usize) -> Vec<RankedEntity> {
    entries.sort_by(rank_order);
    entries.truncate(limit);
    entries
}

/// 曜日 (日曜=1 ... 土曜=7)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sunday,
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
    ];

    pub fn index(&self) -> u8 {
        match self {
            DayOfWeek::Sunday => 1,
            DayOfWeek::Monday => 2,
            DayOfWeek::Tuesday => 3,
            DayOfWeek::Wednesday => 4,
            DayOfWeek::Thursday => 5,
            DayOfWeek::Friday => 6,
            DayOfWeek::Saturday => 7,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Sunday => "Sunday",
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(weekday: Weekday) -> Self {
        Self::ALL[weekday.num_days_from_sunday() as usize]
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 活動なしを表すラベル
pub const NO_ACTIVITY_LABEL: &str = "N/A";

/// 最も活発な曜日
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayActivity {
    #[serde(with = "day_label")]
    pub day: Option<DayOfWeek>,
    pub count: u64,
    pub percentage: u8,
}

impl Default for DayActivity {
    fn default() -> Self {
        Self::none()
    }
}

impl DayActivity {
    /// 期間内にイベントがない場合の番兵値
    pub fn none() -> Self {
        Self {
            day: None,
            count: 0,
            percentage: 0,
        }
    }

    /// 曜日ごとの件数 (日曜始まり) から最多の曜日を選ぶ
    ///
    /// 同数の場合は日曜始まりで先に現れる曜日を採用する。
    pub fn from_weekday_counts(counts: &[u64; 7]) -> Self {
        let total: u64 = counts.iter().sum();
        if total == 0 {
            return Self::none();
        }

        let (winner, count) = counts
            .iter()
            .enumerate()
            .fold((0usize, 0u64), |best, (idx, &count)| {
                if count > best.1 {
                    (idx, count)
                } else {
                    best
                }
            });

        Self {
            day: Some(DayOfWeek::ALL[winner]),
            count,
            percentage: share_percentage(count, total),
        }
    }

    pub fn label(&self) -> &'static str {
        self.day.map_or(NO_ACTIVITY_LABEL, |d| d.as_str())
    }
}

/// `round(part / total * 100)` を 0..=100 の整数で返す
pub fn share_percentage(part: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    let ratio = (part.min(total) as f64 / total as f64) * 100.0;
    ratio.round() as u8
}

mod day_label {
    use super::{DayOfWeek, NO_ACTIVITY_LABEL};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(day: &Option<DayOfWeek>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match day {
            Some(d) => serializer.serialize_str(d.as_str()),
            None => serializer.serialize_str(NO_ACTIVITY_LABEL),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DayOfWeek>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        if raw == NO_ACTIVITY_LABEL {
            return Ok(None);
        }
        DayOfWeek::ALL
            .iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(&raw))
            .copied()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid day: {}", raw)))
    }
}

/// 1リクエストで発行するサブクエリの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    TopIndividuals,
    TopTeams,
    TotalCount,
    TotalUsers,
    MostActiveDay,
    PreviousTotalCount,
}

impl MetricKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::TopIndividuals => "top_individuals",
            MetricKind::TopTeams => "top_teams",
            MetricKind::TotalCount => "total_count",
            MetricKind::TotalUsers => "total_users",
            MetricKind::MostActiveDay => "most_active_day",
            MetricKind::PreviousTotalCount => "previous_total_count",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 平均値算出の元になる件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodMetrics {
    pub total_count: u64,
    pub total_users: u64,
}

/// アグリゲータの出力
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMetrics {
    pub top_individuals: Vec<RankedEntity>,
    pub top_teams: Vec<RankedEntity>,
    pub total_count: u64,
    pub total_users: u64,
    pub most_active_day: DayActivity,
    pub previous_total_count: u64,
    /// 失敗してデフォルト値に置き換えたサブクエリ
    pub degraded: Vec<MetricKind>,
}

impl RawMetrics {
    pub fn current(&self) -> PeriodMetrics {
        PeriodMetrics {
            total_count: self.total_count,
            total_users: self.total_users,
        }
    }

    pub fn previous(&self) -> PeriodMetrics {
        PeriodMetrics {
            total_count: self.previous_total_count,
            total_users: self.total_users,
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.degraded.is_empty()
    }
}
