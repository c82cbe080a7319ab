//! CSV导出
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::{ScoutError, ScoutResult};
use crate::rule::{Category, ScanMode, ScanResult};

/// 多值单元格分隔符
pub const MULTI_VALUE_SEPARATOR: &str = "; ";

/// 快速扫描的列顺序（URL/Status 之后）
const QUICK_COLUMNS: [Column; 6] = [
    Column::Category(Category::Cmp),
    Column::Category(Category::ConsentSignal),
    Column::Category(Category::TagManager),
    Column::Category(Category::Vendor),
    Column::Category(Category::Platform),
    Column::ThirdPartyHosts,
];

/// 深度扫描追加的列
const DEEP_COLUMNS: [Column; 3] = [
    Column::Category(Category::Dsar),
    Column::Category(Category::TrustCenter),
    Column::Category(Category::PolicyGenerator),
];

#[derive(Debug, Clone, Copy)]
enum Column {
    Category(Category),
    ThirdPartyHosts,
}

impl Column {
    fn title(self) -> &'static str {
        match self {
            Column::Category(category) => category.label(),
            Column::ThirdPartyHosts => "Third-Party Hosts",
        }
    }

    fn cell(self, result: &ScanResult) -> String {
        match self {
            Column::Category(category) => result.matches.names(category).join(MULTI_VALUE_SEPARATOR),
            Column::ThirdPartyHosts => result.third_party_hosts.join(MULTI_VALUE_SEPARATOR),
        }
    }
}

fn columns(mode: ScanMode) -> impl Iterator<Item = Column> {
    let deep: &[Column] = match mode {
        ScanMode::Quick => &[],
        ScanMode::Deep => &DEEP_COLUMNS,
    };
    QUICK_COLUMNS.into_iter().chain(deep.iter().copied())
}

/// 导出CSV：首行为表头，每个结果一行
///
/// 所有单元格统一加双引号（内部双引号转义为两个），行以 `\n` 结尾。
pub fn to_csv(results: &[ScanResult], mode: ScanMode) -> ScoutResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(["URL", "Status"].into_iter().chain(columns(mode).map(Column::title)))?;
    for result in results {
        let status = result.status.to_string();
        let mut record = vec![result.url.clone(), status];
        record.extend(columns(mode).map(|column| column.cell(result)));
        writer.write_record(&record)?;
    }

    let bytes = writer.into_inner().map_err(|e| ScoutError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ScoutError::Internal(format!("CSV输出不是合法UTF-8：{}", e)))
}
