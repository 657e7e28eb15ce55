pub mod requests;
pub mod responses;

pub use requests::AnalyticsReportQuery;
pub use responses::AnalyticsReport;
