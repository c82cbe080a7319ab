//! 第三方域名提取
use url::Url;

use crate::extractor::ParsedDocument;

fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// 等于页面域名或为其子域名
fn is_first_party(host: &str, page_host: &str) -> bool {
    if page_host.is_empty() {
        return false;
    }
    host == page_host
        || host
            .strip_suffix(page_host)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// 提取第三方域名
///
/// 相对引用按页面最终地址解析；按文档顺序去重，最多返回 `limit` 个。
/// 结果只是采样，不保证覆盖页面引用的全部第三方域名。
pub fn extract_third_party_hosts(document: &ParsedDocument, page_url: &Url, limit: usize) -> Vec<String> {
    let page_host = page_url.host_str().map(strip_www).unwrap_or_default();

    let mut hosts: Vec<String> = Vec::new();
    for resource in document.resource_refs() {
        if hosts.len() >= limit {
            break;
        }
        let Ok(resolved) = page_url.join(resource) else {
            continue;
        };
        let Some(host) = resolved.host_str().map(strip_www) else {
            continue;
        };
        if host.is_empty() || is_first_party(host, page_host) || hosts.iter().any(|h| h == host) {
            continue;
        }
        hosts.push(host.to_string());
    }
    hosts
}
