//! 工具模块
pub mod header_builder;

pub use self::header_builder::BrowserHeaders;
