pub mod summary;

pub use summary::{LapDetail, Report, compare_reports, create_report, generate_reports, rank_reports};
