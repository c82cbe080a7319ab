//! 签名数据模型定义
//! 仅存储签名数据，无任何业务逻辑，支持序列化/反序列化

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

/// 签名分类
///
/// 声明顺序即评估顺序，也是结果输出顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    /// 同意管理平台（Cookie横幅）
    Cmp,
    /// IAB / Google 同意信号API
    ConsentSignal,
    TagManager,
    /// 分析、追踪、数据采集类第三方
    Vendor,
    /// 建站平台 / CMS
    Platform,
    /// 数据主体请求门户（仅深度扫描）
    Dsar,
    /// 信任中心（仅深度扫描）
    TrustCenter,
    /// 隐私政策生成器（仅深度扫描）
    PolicyGenerator,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Cmp,
        Category::ConsentSignal,
        Category::TagManager,
        Category::Vendor,
        Category::Platform,
        Category::Dsar,
        Category::TrustCenter,
        Category::PolicyGenerator,
    ];

    /// 扫描结果中的字段名
    pub fn result_key(self) -> &'static str {
        match self {
            Category::Cmp => "cmp",
            Category::ConsentSignal => "consentSignals",
            Category::TagManager => "tagManager",
            Category::Vendor => "thirdPartyVendors",
            Category::Platform => "platform",
            Category::Dsar => "dsar",
            Category::TrustCenter => "trustCenter",
            Category::PolicyGenerator => "privacyPolicyGenerator",
        }
    }

    /// 签名库JSON中的分类名
    pub fn catalog_key(self) -> &'static str {
        match self {
            Category::Cmp => "cmp",
            Category::ConsentSignal => "consentSignal",
            Category::TagManager => "tagManager",
            Category::Vendor => "vendor",
            Category::Platform => "platform",
            Category::Dsar => "dsar",
            Category::TrustCenter => "trustCenter",
            Category::PolicyGenerator => "policyGenerator",
        }
    }

    /// 报表列名
    pub fn label(self) -> &'static str {
        match self {
            Category::Cmp => "CM",
            Category::ConsentSignal => "Consent Signals",
            Category::TagManager => "Tag Manager",
            Category::Vendor => "Third-Party Vendors",
            Category::Platform => "Platform",
            Category::Dsar => "DSAR",
            Category::TrustCenter => "Trust Center",
            Category::PolicyGenerator => "Privacy Policy Generator",
        }
    }

    /// 是否仅在深度扫描中评估
    pub fn is_deep_only(self) -> bool {
        matches!(self, Category::Dsar | Category::TrustCenter | Category::PolicyGenerator)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    /// 同时接受签名库分类名与结果字段名（忽略大小写）
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.catalog_key().eq_ignore_ascii_case(key) || c.result_key().eq_ignore_ascii_case(key))
            .ok_or_else(|| format!("未知分类：{}", s))
    }
}

static QUICK_CATEGORIES: [Category; 5] = [
    Category::Cmp,
    Category::ConsentSignal,
    Category::TagManager,
    Category::Vendor,
    Category::Platform,
];

/// 扫描模式（按批次选择）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// CMP / 同意信号 / 标签管理器 / 第三方 / 平台
    #[default]
    Quick,
    /// 快速扫描 + DSAR / 信任中心 / 隐私政策生成器
    Deep,
}

impl ScanMode {
    /// 当前模式需要评估的分类（按评估顺序）
    pub fn categories(self) -> &'static [Category] {
        match self {
            ScanMode::Quick => &QUICK_CATEGORIES,
            ScanMode::Deep => &Category::ALL,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScanMode::Quick => "quick",
            ScanMode::Deep => "deep",
        }
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScanMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quick" => Ok(ScanMode::Quick),
            "deep" => Ok(ScanMode::Deep),
            other => Err(format!("未知扫描模式：{}", other)),
        }
    }
}

/// 签名条目（声明式，未编译）
///
/// 非空的模式集合即代表启用对应的匹配策略；所有模式集合均为空的条目不会命中任何页面。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureEntry {
    pub name: String,
    pub category: Category,

    // 检测规则
    /// script src 子串（区分大小写）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub script_patterns: Vec<String>,
    /// script 模式是否同时在整页文本中查找（可覆盖由GTM注入的脚本）
    #[serde(default, skip_serializing_if = "is_false")]
    pub scan_raw_content: bool,
    /// 元素id精确匹配
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub element_ids: Vec<String>,
    /// class 精确匹配
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub class_names: Vec<String>,
    /// 内联代码中的标识符（忽略大小写）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inline_text_patterns: Vec<String>,
    /// 整页文本子串（忽略大小写）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body_substrings: Vec<String>,
    /// 整页正则（忽略大小写）
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub regex_patterns: Vec<String>,
}

impl SignatureEntry {
    /// 创建空条目
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            script_patterns: Vec::new(),
            scan_raw_content: false,
            element_ids: Vec::new(),
            class_names: Vec::new(),
            inline_text_patterns: Vec::new(),
            body_substrings: Vec::new(),
            regex_patterns: Vec::new(),
        }
    }

    /// 模式总数
    pub fn pattern_count(&self) -> usize {
        self.script_patterns.len()
            + self.element_ids.len()
            + self.class_names.len()
            + self.inline_text_patterns.len()
            + self.body_substrings.len()
            + self.regex_patterns.len()
    }

    pub fn has_patterns(&self) -> bool {
        self.pattern_count() > 0
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// 签名库文件
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogFile {
    #[serde(default = "default_catalog_version")]
    pub version: u32,
    pub signatures: Vec<SignatureEntry>,
}

fn default_catalog_version() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_categories() {
        assert_eq!(ScanMode::Quick.categories().len(), 5);
        assert!(ScanMode::Quick.categories().iter().all(|c| !c.is_deep_only()));
        assert_eq!(ScanMode::Deep.categories(), &Category::ALL);
        assert!(ScanMode::Deep.categories().contains(&Category::PolicyGenerator));
        assert_eq!(ScanMode::default(), ScanMode::Quick);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!("cmp".parse::<Category>(), Ok(Category::Cmp));
        assert_eq!("thirdPartyVendors".parse::<Category>(), Ok(Category::Vendor));
        assert_eq!("POLICYGENERATOR".parse::<Category>(), Ok(Category::PolicyGenerator));
        assert!("cookies".parse::<Category>().is_err());
    }

    #[test]
    fn test_entry_deserialize_defaults() {
        let entry: SignatureEntry =
            serde_json::from_str(r#"{"name":"Osano","category":"cmp","scriptPatterns":["cmp.osano.com"]}"#)
                .unwrap();
        assert_eq!(entry.category, Category::Cmp);
        assert!(!entry.scan_raw_content);
        assert!(entry.element_ids.is_empty());
        assert_eq!(entry.pattern_count(), 1);

        let empty = SignatureEntry::new("Nothing", Category::Vendor);
        assert!(!empty.has_patterns());
    }

    #[test]
    fn test_mode_wire_values() {
        assert_eq!(serde_json::to_string(&ScanMode::Deep).unwrap(), "\"deep\"");
        assert_eq!(serde_json::from_str::<ScanMode>("\"quick\"").unwrap(), ScanMode::Quick);
        assert!(serde_json::from_str::<ScanMode>("\"full\"").is_err());
    }
}
