//! 报告模块：CSV导出与扫描汇总
pub mod csv;
pub mod summary;

pub use self::csv::{to_csv, MULTI_VALUE_SEPARATOR};
pub use self::summary::ScanSummary;
