//! 边界层：批量扫描请求/响应契约
//! 入参错误返回400，批量任务异常返回500，成功返回完整的批量结果
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::detector::Scanner;
use crate::error::{ScoutError, ScoutResult};
use crate::rule::ScanMode;

/// 批量扫描请求
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    #[serde(default)]
    pub urls: Option<Vec<String>>,
    #[serde(default)]
    pub scan_type: ScanMode,
}

/// 边界层响应
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }

    fn from_error(err: &ScoutError) -> Self {
        Self::error(err.status_code(), err.to_string())
    }
}

impl Serialize for ApiResponse {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        json!({ "status": self.status.as_u16(), "body": self.body }).serialize(serializer)
    }
}

/// 解析并校验请求体，返回待扫描URL与扫描模式
///
/// scanType 缺省为 quick；只接受 quick/deep，其它取值按请求格式错误返回 400，
/// 不会静默降级为 quick。
pub fn parse_request(body: &[u8]) -> ScoutResult<(Vec<String>, ScanMode)> {
    let request: ScanRequest = serde_json::from_slice(body)
        .map_err(|e| ScoutError::InvalidRequest(e.to_string()))?;

    match request.urls {
        Some(urls) if !urls.is_empty() => Ok((urls, request.scan_type)),
        _ => Err(ScoutError::NoUrlsProvided),
    }
}

/// 处理批量扫描请求
///
/// 请求体非法（含未知 scanType）或URL列表为空时返回 400，不发起任何抓取。
pub async fn handle_scan_request(scanner: &Scanner, body: &[u8]) -> ApiResponse {
    let (urls, mode) = match parse_request(body) {
        Ok(parsed) => parsed,
        Err(err) => {
            warn!("拒绝批量扫描请求：{}", err);
            return ApiResponse::from_error(&err);
        }
    };

    // 批量任务在独立任务中执行，任务异常只影响本次请求
    let worker = scanner.clone();
    let task = tokio::spawn(async move { worker.run_batch(&urls, mode).await });

    let outcome = match task.await {
        Ok(response) => serde_json::to_value(&response).map_err(ScoutError::from),
        Err(join_err) => Err(ScoutError::Internal(join_err.to_string())),
    };

    match outcome {
        Ok(body) => ApiResponse {
            status: StatusCode::OK,
            body,
        },
        Err(err) => {
            error!("批量扫描失败：{}", err);
            ApiResponse::error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use async_trait::async_trait;
    use url::Url;
    use crate::config::ConfigManager;
    use crate::detector::builtin_catalog;
    use crate::fetcher::{FetchError, FetchedPage, PageFetcher};

    struct EchoFetcher;

    #[async_trait]
    impl PageFetcher for EchoFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
            if url.contains("panic") {
                panic!("fetcher exploded");
            }
            Ok(FetchedPage {
                final_url: Url::parse(url).map_err(|e| FetchError::Network(e.to_string()))?,
                status: 200,
                body: r#"<script src="https://consent.cookiebot.com/uc.js"></script>"#.to_string(),
            })
        }
    }

    fn scanner() -> Scanner {
        Scanner::with_parts(builtin_catalog(), Arc::new(EchoFetcher), ConfigManager::get_default())
    }

    #[test]
    fn test_parse_request() {
        let (urls, mode) = parse_request(br#"{"urls":["a.com"],"scanType":"deep"}"#).unwrap();
        assert_eq!(urls, ["a.com"]);
        assert_eq!(mode, ScanMode::Deep);

        let (_, mode) = parse_request(br#"{"urls":["a.com"]}"#).unwrap();
        assert_eq!(mode, ScanMode::Quick);

        assert!(matches!(parse_request(br#"{"urls":[]}"#), Err(ScoutError::NoUrlsProvided)));
        assert!(matches!(parse_request(br#"{}"#), Err(ScoutError::NoUrlsProvided)));
        assert!(matches!(parse_request(br#"{"urls":null}"#), Err(ScoutError::NoUrlsProvided)));
        assert!(matches!(
            parse_request(br#"{"urls":["a.com"],"scanType":"full"}"#),
            Err(ScoutError::InvalidRequest(_))
        ));
        assert!(matches!(parse_request(b"not json"), Err(ScoutError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_unknown_scan_type_is_rejected() {
        let response = handle_scan_request(&scanner(), br#"{"urls":["a.example"],"scanType":"full"}"#).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert!(response.body["error"].is_string());
        assert!(response.body.get("results").is_none());
    }

    #[tokio::test]
    async fn test_empty_urls_is_client_error() {
        let response = handle_scan_request(&scanner(), br#"{"urls":[]}"#).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body, json!({ "error": "No URLs provided" }));
    }

    #[tokio::test]
    async fn test_success_response_shape() {
        let response = handle_scan_request(
            &scanner(),
            br#"{"urls":["a.example","  "],"scanType":"quick"}"#,
        )
        .await;

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body["processedCount"], 1);
        assert_eq!(response.body["totalRequested"], 2);
        assert_eq!(response.body["hasMore"], false);

        let result = &response.body["results"][0];
        assert_eq!(result["url"], "a.example");
        assert_eq!(result["status"], "Success");
        assert_eq!(result["cmp"], json!(["Cookiebot"]));
        for key in [
            "consentSignals",
            "tagManager",
            "thirdPartyVendors",
            "platform",
            "dsar",
            "trustCenter",
            "privacyPolicyGenerator",
        ] {
            assert_eq!(result[key], json!([]), "{}", key);
        }
        assert_eq!(result["thirdPartyHosts"], json!(["consent.cookiebot.com"]));
        assert_eq!(result["error"], Value::Null);
    }

    #[tokio::test]
    async fn test_task_failure_is_server_error() {
        let response = handle_scan_request(&scanner(), br#"{"urls":["panic.example"]}"#).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.body["error"].as_str().unwrap().contains("panic"));
    }
}
