pub mod datetime;

pub use datetime::{canonical_timestamp, format_canonical};
