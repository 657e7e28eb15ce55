pub mod metrics;
pub mod period;
pub mod recognition;

pub use metrics::{
    DayActivity, DayOfWeek, MetricKind, MetricsFilter, PeriodMetrics, RankedEntity, RawMetrics,
};
pub use period::{AnalyticsRequest, DateRange, PeriodKind, ResolvedPeriods, DEFAULT_TOP_N};
pub use recognition::{Member, Recognition, RecognitionDataset, Team};
