pub mod item_filter;
pub mod record_extractor;
pub mod report;

pub use item_filter::{FilterDecision, IncludeRule, ItemFilter};
pub use record_extractor::{extract_records, OutputRecord};
pub use report::ConversionReport;
