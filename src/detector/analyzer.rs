//! 检测分析器：按固定优先级对每个签名逐一执行匹配策略
//! 优先级：script-src > 元素id > class > 内联文本 > 页面子串 > 正则，单个签名命中首个策略即停止
use tracing::debug;

use crate::compiler::{CompiledSignature, SignatureCatalog};
use crate::extractor::ParsedDocument;
use crate::rule::{CategoryMatches, ScanMode};

/// 单页匹配视图：结构化文档 + 小写化后的整页文本（只构建一次）
pub struct PageView<'a> {
    pub document: &'a ParsedDocument,
    pub lower_body: &'a str,
}

/// 匹配策略
pub trait Analyzer {
    const TYPE_NAME: &'static str;

    /// 返回首个满足的模式
    fn first_match<'s>(signature: &'s CompiledSignature, page: &PageView<'_>) -> Option<&'s str>;
}

/// Script-SRC分析器（可选整页文本兜底）
pub struct ScriptSourceAnalyzer;

impl Analyzer for ScriptSourceAnalyzer {
    const TYPE_NAME: &'static str = "script-src";

    fn first_match<'s>(signature: &'s CompiledSignature, page: &PageView<'_>) -> Option<&'s str> {
        signature
            .script_patterns
            .iter()
            .find(|pattern| {
                page.document.script_src_contains(&pattern.src_needle)
                    || pattern
                        .raw_content
                        .as_ref()
                        .is_some_and(|matcher| matcher.is_match(page.lower_body))
            })
            .map(|pattern| pattern.src_needle.as_str())
    }
}

/// 元素id分析器（精确相等）
pub struct ElementIdAnalyzer;

impl Analyzer for ElementIdAnalyzer {
    const TYPE_NAME: &'static str = "element-id";

    fn first_match<'s>(signature: &'s CompiledSignature, page: &PageView<'_>) -> Option<&'s str> {
        signature
            .entry
            .element_ids
            .iter()
            .find(|id| page.document.has_element_id(id))
            .map(String::as_str)
    }
}

/// class分析器（类名列表精确包含）
pub struct ClassNameAnalyzer;

impl Analyzer for ClassNameAnalyzer {
    const TYPE_NAME: &'static str = "class";

    fn first_match<'s>(signature: &'s CompiledSignature, page: &PageView<'_>) -> Option<&'s str> {
        signature
            .entry
            .class_names
            .iter()
            .find(|class_name| page.document.has_class(class_name))
            .map(String::as_str)
    }
}

/// 内联文本分析器
pub struct InlineTextAnalyzer;

impl Analyzer for InlineTextAnalyzer {
    const TYPE_NAME: &'static str = "inline-text";

    fn first_match<'s>(signature: &'s CompiledSignature, page: &PageView<'_>) -> Option<&'s str> {
        signature
            .inline_text
            .iter()
            .find(|matcher| matcher.is_match(page.lower_body))
            .map(|matcher| matcher.describe())
    }
}

/// 页面子串分析器（忽略大小写）
pub struct BodyTextAnalyzer;

impl Analyzer for BodyTextAnalyzer {
    const TYPE_NAME: &'static str = "body";

    fn first_match<'s>(signature: &'s CompiledSignature, page: &PageView<'_>) -> Option<&'s str> {
        signature
            .body_text
            .iter()
            .find(|matcher| matcher.is_match(page.lower_body))
            .map(|matcher| matcher.describe())
    }
}

/// 正则分析器（忽略大小写）
pub struct RegexAnalyzer;

impl Analyzer for RegexAnalyzer {
    const TYPE_NAME: &'static str = "regex";

    fn first_match<'s>(signature: &'s CompiledSignature, page: &PageView<'_>) -> Option<&'s str> {
        signature
            .regexes
            .iter()
            .find(|matcher| matcher.is_match(page.lower_body))
            .map(|matcher| matcher.describe())
    }
}

#[inline]
fn try_strategy<'s, A: Analyzer>(
    signature: &'s CompiledSignature,
    page: &PageView<'_>,
) -> Option<(&'static str, &'s str)> {
    A::first_match(signature, page).map(|pattern| (A::TYPE_NAME, pattern))
}

/// 单个签名的检测，返回（命中策略，命中模式）
pub fn detect_signature<'s>(
    signature: &'s CompiledSignature,
    page: &PageView<'_>,
) -> Option<(&'static str, &'s str)> {
    try_strategy::<ScriptSourceAnalyzer>(signature, page)
        .or_else(|| try_strategy::<ElementIdAnalyzer>(signature, page))
        .or_else(|| try_strategy::<ClassNameAnalyzer>(signature, page))
        .or_else(|| try_strategy::<InlineTextAnalyzer>(signature, page))
        .or_else(|| try_strategy::<BodyTextAnalyzer>(signature, page))
        .or_else(|| try_strategy::<RegexAnalyzer>(signature, page))
}

/// 页面分类
///
/// 只评估扫描模式包含的分类；同一分类下每个签名都会独立评估，
/// 命中名称按签名库声明顺序去重记录。
pub fn classify(
    catalog: &SignatureCatalog,
    body: &str,
    document: &ParsedDocument,
    mode: ScanMode,
) -> CategoryMatches {
    let lower_body = body.to_lowercase();
    let page = PageView {
        document,
        lower_body: &lower_body,
    };

    let mut matches = CategoryMatches::for_mode(mode);
    for &category in mode.categories() {
        for signature in catalog.signatures_for(category) {
            let Some((strategy, pattern)) = detect_signature(signature, &page) else {
                continue;
            };
            if matches.record(category, signature.name()) {
                debug!(
                    "签名匹配成功：分类={}，名称={}，策略={}，规则={}",
                    category,
                    signature.name(),
                    strategy,
                    pattern
                );
            }
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::CatalogCompiler;
    use crate::extractor::HtmlExtractor;
    use crate::rule::{Category, SignatureEntry};

    fn catalog(entries: Vec<SignatureEntry>) -> SignatureCatalog {
        CatalogCompiler::compile(&entries).unwrap()
    }

    fn run(catalog: &SignatureCatalog, html: &str, mode: ScanMode) -> CategoryMatches {
        classify(catalog, html, &HtmlExtractor::parse(html), mode)
    }

    #[test]
    fn test_strategy_priority() {
        let mut entry = SignatureEntry::new("Acme", Category::Cmp);
        entry.script_patterns = vec!["cdn.acme.io".to_string()];
        entry.element_ids = vec!["acme-banner".to_string()];
        entry.body_substrings = vec!["acme".to_string()];
        let compiled = catalog(vec![entry]);
        let signature = &compiled.signatures_for(Category::Cmp)[0];

        let html = r#"<script src="https://cdn.acme.io/x.js"></script><div id="acme-banner"></div>"#;
        let document = HtmlExtractor::parse(html);
        let lower = html.to_lowercase();
        let page = PageView { document: &document, lower_body: &lower };
        assert_eq!(detect_signature(signature, &page), Some(("script-src", "cdn.acme.io")));

        let html = r#"<div id="acme-banner"></div>"#;
        let document = HtmlExtractor::parse(html);
        let lower = html.to_lowercase();
        let page = PageView { document: &document, lower_body: &lower };
        assert_eq!(detect_signature(signature, &page), Some(("element-id", "acme-banner")));

        let html = "<p>Powered by ACME</p>";
        let document = HtmlExtractor::parse(html);
        let lower = html.to_lowercase();
        let page = PageView { document: &document, lower_body: &lower };
        assert_eq!(detect_signature(signature, &page), Some(("body", "acme")));
    }

    #[test]
    fn test_element_id_is_exact() {
        let mut entry = SignatureEntry::new("Banner Co", Category::Cmp);
        entry.element_ids = vec!["banner".to_string()];
        let compiled = catalog(vec![entry]);

        let matches = run(&compiled, r#"<div id="cookie-banner"></div>"#, ScanMode::Quick);
        assert!(matches.names(Category::Cmp).is_empty());

        let matches = run(&compiled, r#"<div id="banner"></div>"#, ScanMode::Quick);
        assert_eq!(matches.names(Category::Cmp), ["Banner Co"]);
    }

    #[test]
    fn test_script_src_requires_raw_flag_for_body_fallback() {
        let mut plain = SignatureEntry::new("Plain", Category::Cmp);
        plain.script_patterns = vec!["plain.example".to_string()];
        let mut raw = SignatureEntry::new("Raw", Category::Cmp);
        raw.script_patterns = vec!["raw.example".to_string()];
        raw.scan_raw_content = true;
        let compiled = catalog(vec![plain, raw]);

        let html = r#"<script>load("plain.example"); load("RAW.example");</script>"#;
        let matches = run(&compiled, html, ScanMode::Quick);
        assert_eq!(matches.names(Category::Cmp), ["Raw"]);
    }

    #[test]
    fn test_every_entry_is_evaluated() {
        let mut first = SignatureEntry::new("First", Category::Vendor);
        first.body_substrings = vec!["alpha".to_string()];
        let mut second = SignatureEntry::new("Second", Category::Vendor);
        second.body_substrings = vec!["beta".to_string()];
        let mut third = SignatureEntry::new("Third", Category::Vendor);
        third.body_substrings = vec!["gamma".to_string()];
        let compiled = catalog(vec![first, second, third]);

        let matches = run(&compiled, "GAMMA alpha", ScanMode::Quick);
        assert_eq!(matches.names(Category::Vendor), ["First", "Third"]);
    }

    #[test]
    fn test_regex_is_case_insensitive() {
        let mut entry = SignatureEntry::new("TCF", Category::ConsentSignal);
        entry.regex_patterns = vec!["__tcfapi".to_string(), "gtag.*consent".to_string()];
        let compiled = catalog(vec![entry]);

        let matches = run(&compiled, "<script>window.__TCFAPI('ping')</script>", ScanMode::Quick);
        assert_eq!(matches.names(Category::ConsentSignal), ["TCF"]);

        let matches = run(&compiled, "<script>gtag('Consent', 'default')</script>", ScanMode::Quick);
        assert_eq!(matches.names(Category::ConsentSignal), ["TCF"]);
    }

    #[test]
    fn test_deep_categories_skipped_in_quick_mode() {
        let mut dsar = SignatureEntry::new("Portal", Category::Dsar);
        dsar.body_substrings = vec!["portal.example".to_string()];
        let compiled = catalog(vec![dsar]);

        let quick = run(&compiled, "https://portal.example/request", ScanMode::Quick);
        assert!(!quick.evaluated(Category::Dsar));

        let deep = run(&compiled, "https://portal.example/request", ScanMode::Deep);
        assert_eq!(deep.names(Category::Dsar), ["Portal"]);
    }

    #[test]
    fn test_empty_body() {
        let mut entry = SignatureEntry::new("Any", Category::Vendor);
        entry.body_substrings = vec!["any".to_string()];
        let compiled = catalog(vec![entry]);

        let matches = run(&compiled, "", ScanMode::Deep);
        assert!(matches.is_empty());
        assert!(matches.evaluated(Category::PolicyGenerator));
    }
}
