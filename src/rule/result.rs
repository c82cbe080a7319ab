//! 扫描结果模型
//! 单个URL的扫描结果与批量响应，输出字段固定（分类数组始终存在）

use std::collections::BTreeMap;
use std::fmt;
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

use super::model::{Category, ScanMode};

/// 扫描状态（仅两个终态）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScanStatus {
    Success,
    #[serde(rename = "Not Scannable")]
    NotScannable,
}

impl fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanStatus::Success => f.write_str("Success"),
            ScanStatus::NotScannable => f.write_str("Not Scannable"),
        }
    }
}

/// 分类 -> 命中名称（有序去重，顺序即签名库评估顺序）
///
/// 只包含当前扫描模式评估过的分类；快速扫描下深度分类不存在。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryMatches {
    inner: BTreeMap<Category, Vec<String>>,
}

impl CategoryMatches {
    /// 为扫描模式创建空结果（每个评估分类都有一个空集合）
    pub fn for_mode(mode: ScanMode) -> Self {
        Self {
            inner: mode.categories().iter().map(|c| (*c, Vec::new())).collect(),
        }
    }

    /// 记录命中，同名只记录一次；返回是否为新增
    pub fn record(&mut self, category: Category, name: &str) -> bool {
        let names = self.inner.entry(category).or_default();
        if names.iter().any(|n| n == name) {
            return false;
        }
        names.push(name.to_string());
        true
    }

    /// 分类是否参与了评估
    pub fn evaluated(&self, category: Category) -> bool {
        self.inner.contains_key(&category)
    }

    /// 分类的命中列表（未评估时为None）
    pub fn get(&self, category: Category) -> Option<&[String]> {
        self.inner.get(&category).map(Vec::as_slice)
    }

    /// 分类的命中列表（未评估时为空）
    pub fn names(&self, category: Category) -> &[String] {
        self.get(category).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[String])> {
        self.inner.iter().map(|(c, names)| (*c, names.as_slice()))
    }

    /// 所有分类均无命中
    pub fn is_empty(&self) -> bool {
        self.inner.values().all(Vec::is_empty)
    }

    /// 命中总数
    pub fn total(&self) -> usize {
        self.inner.values().map(Vec::len).sum()
    }
}

/// 单个URL的扫描结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// 调用方提交的URL（去除首尾空白，未补全协议）
    pub url: String,
    pub status: ScanStatus,
    pub matches: CategoryMatches,
    /// 第三方域名采样（文档顺序前N个，不保证完整）
    pub third_party_hosts: Vec<String>,
    pub error: Option<String>,
}

impl ScanResult {
    /// 扫描开始时的空结果
    pub fn new(url: impl Into<String>, mode: ScanMode) -> Self {
        Self {
            url: url.into(),
            status: ScanStatus::Success,
            matches: CategoryMatches::for_mode(mode),
            third_party_hosts: Vec::new(),
            error: None,
        }
    }

    /// 转为不可扫描（清空所有命中）
    pub fn into_not_scannable(mut self, error: impl Into<String>) -> Self {
        self.status = ScanStatus::NotScannable;
        self.matches = CategoryMatches::default();
        self.third_party_hosts.clear();
        self.error = Some(error.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ScanStatus::Success
    }
}

impl Serialize for ScanResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ScanResult", 3 + Category::ALL.len() + 1)?;
        state.serialize_field("url", &self.url)?;
        state.serialize_field("status", &self.status)?;
        for category in Category::ALL {
            state.serialize_field(category.result_key(), self.matches.names(category))?;
        }
        state.serialize_field("thirdPartyHosts", &self.third_party_hosts)?;
        state.serialize_field("error", &self.error)?;
        state.end()
    }
}

/// 批量扫描响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResponse {
    pub results: Vec<ScanResult>,
    /// 实际扫描的非空URL数
    pub processed_count: usize,
    /// 调用方提交的URL总数
    pub total_requested: usize,
    /// 是否还有超出本次处理上限的URL
    pub has_more: bool,
}
