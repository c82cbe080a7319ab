//! 扫描汇总：成功/失败计数与各分类命中次数
use std::collections::BTreeMap;
use std::fmt;
use serde::Serialize;

use crate::rule::{Category, ScanResult};

/// 扫描汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub total: usize,
    pub success: usize,
    pub errors: usize,
    /// 分类 -> 名称 -> 命中的URL数
    pub detections: BTreeMap<Category, BTreeMap<String, usize>>,
}

impl ScanSummary {
    pub fn from_results(results: &[ScanResult]) -> Self {
        let mut summary = Self {
            total: results.len(),
            ..Self::default()
        };

        for result in results {
            if !result.is_success() {
                summary.errors += 1;
                continue;
            }
            summary.success += 1;
            for (category, names) in result.matches.iter() {
                for name in names {
                    *summary
                        .detections
                        .entry(category)
                        .or_default()
                        .entry(name.clone())
                        .or_default() += 1;
                }
            }
        }
        summary
    }

    /// 分类下按命中次数降序的前N项（次数相同按名称排序）
    pub fn top(&self, category: Category, limit: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .detections
            .get(&category)
            .map(|names| names.iter().map(|(name, count)| (name.as_str(), *count)).collect())
            .unwrap_or_default();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }
}

impl fmt::Display for ScanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Scanned: {}  Success: {}  Not Scannable: {}", self.total, self.success, self.errors)?;
        for category in Category::ALL {
            let ranked = self.top(category, usize::MAX);
            if ranked.is_empty() {
                continue;
            }
            writeln!(f, "{}:", category.label())?;
            for (name, count) in ranked {
                writeln!(f, "  {:<32} {}", name, count)?;
            }
        }
        Ok(())
    }
}
