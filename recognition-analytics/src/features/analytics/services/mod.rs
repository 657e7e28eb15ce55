pub mod aggregator;
pub mod analytics;
pub mod comparison;
pub mod period_resolver;
pub mod report_assembler;

pub use aggregator::{AggregationSettings, FailurePolicy, MetricsAggregator};
pub use analytics::AnalyticsService;
pub use comparison::{avg_per_person, percent_change};
pub use period_resolver::PeriodResolver;
pub use report_assembler::ReportAssembler;
