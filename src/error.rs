//! 全局错误类型定义

use http::StatusCode;
use thiserror::Error;
use regex::Error as RegexError;
use serde_json::Error as SerdeJsonError;
use std::io::Error as IoError;

#[derive(Error, Debug)]
pub enum ScoutError {
    // 请求入参错误（边界层直接返回客户端错误）
    #[error("No URLs provided")]
    NoUrlsProvided,
    #[error("无效请求：{0}")]
    InvalidRequest(String),

    // 签名库相关错误
    #[error("签名库加载失败：{0}")]
    CatalogError(String),
    #[error("正则编译失败：{0}")]
    RegexCompileError(#[from] RegexError),

    // 扫描器相关错误
    #[error("扫描器未初始化")]
    DetectorNotInitialized,
    #[error("内部错误：{0}")]
    Internal(String),

    // 网络客户端构建错误
    #[error("HTTP客户端构建失败：{0}")]
    HttpClientError(#[from] reqwest::Error),

    // 序列化/反序列化错误
    #[error("JSON解析失败：{0}")]
    JsonError(#[from] SerdeJsonError),
    #[error("CSV写入失败：{0}")]
    CsvError(#[from] csv::Error),

    // 基础错误
    #[error("IO操作失败：{0}")]
    IoError(#[from] IoError),
}

impl ScoutError {
    /// 边界层状态码：入参问题归为客户端错误，其余一律视为服务端错误
    pub fn status_code(&self) -> StatusCode {
        match self {
            ScoutError::NoUrlsProvided | ScoutError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// 全局Result类型
pub type ScoutResult<T> = Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(ScoutError::NoUrlsProvided.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ScoutError::InvalidRequest("bad json".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ScoutError::Internal("boom".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ScoutError::CatalogError("dup".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_no_urls_message_is_wire_text() {
        assert_eq!(ScoutError::NoUrlsProvided.to_string(), "No URLs provided");
    }
}
