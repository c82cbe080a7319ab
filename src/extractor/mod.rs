//! 提取模块：HTML分词与可查询文档
pub mod html_extractor;

pub use self::html_extractor::{HtmlExtractor, ParsedDocument};
