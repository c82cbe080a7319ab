//! 签名编译器核心
//! 将声明式签名条目编译为可直接执行的匹配器，并在加载期完成全部校验

use std::collections::HashSet;
use std::time::Instant;
use regex::RegexBuilder;
use tracing::{debug, warn};

use super::pattern::{CompiledSignature, Matcher, ScriptPattern, SignatureCatalog};
use crate::error::{ScoutError, ScoutResult};
use crate::rule::{Category, SignatureEntry};

/// 签名编译器
pub struct CatalogCompiler;

impl CatalogCompiler {
    /// 编译签名库
    pub fn compile(entries: &[SignatureEntry]) -> ScoutResult<SignatureCatalog> {
        let start = Instant::now();
        let mut catalog = SignatureCatalog::default();
        let mut seen: HashSet<(Category, &str)> = HashSet::new();
        let mut stats = CompileStats::default();

        for entry in entries {
            let name = entry.name.trim();
            if name.is_empty() {
                return Err(ScoutError::CatalogError(format!("{}分类存在空名称签名", entry.category)));
            }
            // 同一分类内名称唯一，跨分类允许同名
            if !seen.insert((entry.category, name)) {
                return Err(ScoutError::CatalogError(format!(
                    "签名名称重复：{}（分类：{}）",
                    name, entry.category
                )));
            }
            if !entry.has_patterns() {
                warn!("签名 {} 未声明任何模式，将不会命中任何页面", name);
            }

            let mut entry = entry.clone();
            entry.name = name.to_string();
            let category = entry.category;
            let compiled = Self::compile_entry(entry, &mut stats)?;
            catalog.by_category.entry(category).or_default().push(compiled);
        }

        debug!("✅ 签名编译完成，总耗时{:?}，签名数{}", start.elapsed(), catalog.len());
        debug!(
            "📊 编译统计：Script模式{}条、元素id{}条、class{}条、内联文本{}条、正文子串{}条、正则{}条",
            stats.script_count,
            stats.element_count,
            stats.class_count,
            stats.inline_count,
            stats.body_count,
            stats.regex_count
        );

        Ok(catalog)
    }

    /// 编译单个签名
    fn compile_entry(entry: SignatureEntry, stats: &mut CompileStats) -> ScoutResult<CompiledSignature> {
        let script_patterns = entry
            .script_patterns
            .iter()
            .map(|p| ScriptPattern {
                src_needle: p.clone(),
                raw_content: entry.scan_raw_content.then(|| Matcher::contains(p)),
            })
            .collect::<Vec<_>>();

        let inline_text = entry.inline_text_patterns.iter().map(|p| Matcher::contains(p)).collect::<Vec<_>>();
        let body_text = entry.body_substrings.iter().map(|p| Matcher::contains(p)).collect::<Vec<_>>();

        if !entry.regex_patterns.is_empty() && entry.category != Category::ConsentSignal {
            debug!("签名 {} 在 {} 分类中使用正则模式", entry.name, entry.category);
        }
        let mut regexes = Vec::with_capacity(entry.regex_patterns.len());
        for raw in &entry.regex_patterns {
            let regex = RegexBuilder::new(raw).case_insensitive(true).build().map_err(|e| {
                warn!("签名 {} 的正则编译失败：{}", entry.name, raw);
                ScoutError::from(e)
            })?;
            regexes.push(Matcher::Regex(regex));
        }

        stats.script_count += script_patterns.len();
        stats.element_count += entry.element_ids.len();
        stats.class_count += entry.class_names.len();
        stats.inline_count += inline_text.len();
        stats.body_count += body_text.len();
        stats.regex_count += regexes.len();

        Ok(CompiledSignature {
            entry,
            script_patterns,
            inline_text,
            body_text,
            regexes,
        })
    }
}

/// 编译统计信息
#[derive(Debug, Clone, Default)]
struct CompileStats {
    script_count: usize,
    element_count: usize,
    class_count: usize,
    inline_count: usize,
    body_count: usize,
    regex_count: usize,
}
