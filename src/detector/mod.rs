//! 检测模块：分析器、第三方域名、扫描器与全局单例
pub mod analyzer;
pub mod hosts;
pub mod scanner;
pub mod global;

pub use self::analyzer::{classify, detect_signature, Analyzer, PageView};
pub use self::hosts::extract_third_party_hosts;
pub use self::scanner::Scanner;
pub use self::global::{builtin_catalog, get_global_scanner, init_scanner, init_scanner_with_config, scan_batch};
