//! 编译后签名模型
//! 小写化后的子串与忽略大小写的正则

use std::collections::BTreeMap;
use regex::Regex;

use crate::rule::{Category, SignatureEntry};

/// 文本匹配器（作用于小写化后的整页文本）
#[derive(Debug, Clone)]
pub enum Matcher {
    Contains(String), // 包含匹配（needle 已小写）
    Regex(Regex), // 正则匹配（忽略大小写）
}

impl Matcher {
    /// 子串匹配器，编译期统一小写
    pub fn contains(pattern: &str) -> Self {
        Matcher::Contains(pattern.to_lowercase())
    }

    /// 简单匹配判断
    pub fn is_match(&self, lowered_text: &str) -> bool {
        match self {
            Matcher::Contains(needle) => lowered_text.contains(needle.as_str()),
            Matcher::Regex(regex) => regex.is_match(lowered_text),
        }
    }

    /// 规则描述
    pub fn describe(&self) -> &str {
        match self {
            Matcher::Contains(needle) => needle,
            Matcher::Regex(r) => r.as_str(),
        }
    }
}

/// script 模式：src子串 + 可选的整页文本兜底
#[derive(Debug, Clone)]
pub struct ScriptPattern {
    pub src_needle: String,
    pub raw_content: Option<Matcher>,
}

/// 编译后的签名
#[derive(Debug, Clone)]
pub struct CompiledSignature {
    pub entry: SignatureEntry,
    pub script_patterns: Vec<ScriptPattern>,
    pub inline_text: Vec<Matcher>,
    pub body_text: Vec<Matcher>,
    pub regexes: Vec<Matcher>,
}

impl CompiledSignature {
    pub fn name(&self) -> &str {
        &self.entry.name
    }
}

/// 编译后的签名库（只读，进程内共享）
#[derive(Debug, Clone, Default)]
pub struct SignatureCatalog {
    pub(crate) by_category: BTreeMap<Category, Vec<CompiledSignature>>,
}

impl SignatureCatalog {
    /// 分类下的签名条目（声明顺序）
    pub fn entries_for(&self, category: Category) -> impl Iterator<Item = &SignatureEntry> {
        self.signatures_for(category).iter().map(|sig| &sig.entry)
    }

    /// 分类下的编译后签名（声明顺序）
    pub fn signatures_for(&self, category: Category) -> &[CompiledSignature] {
        self.by_category.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    /// 签名总数
    pub fn len(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
