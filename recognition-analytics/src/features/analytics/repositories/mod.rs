pub mod in_memory;
pub mod metrics_store;

pub use in_memory::InMemoryMetricsStore;
pub use metrics_store::{MetricsStore, StoreResult};
