// ==========================================
// 工厂提货明细拆分系统 - 行分类与供应商分组
// ==========================================
// 职责: 筛选工厂直发行、按供应商保序分组
// 红线: 「中仓 或 工厂直发」/「供应商」两列缺失即终止
// ==========================================

use crate::error::SplitResult;
use crate::sheet::{find_col, require_col, SheetTable};
use tracing::{debug, info};

const DIRECT_COL_CANDIDATES: &[&str] = &["中仓 或 工厂直发", "中仓或工厂直发", "工厂直发"];
const SUPPLIER_COL_CANDIDATES: &[&str] = &["供应商", "供应商名称", "工厂"];
const CHANNEL_COL_CANDIDATES: &[&str] = &[
    "渠道", "平台", "平台站点", "站点", "Channel", "Platform", "店铺", "账号", "账户",
];

/// 一个供应商的工厂直发行(按首次出现顺序收集,行序保持文件1原序)
#[derive(Debug, Clone)]
pub struct RawSupplierRows {
    pub supplier: String,
    pub row_indexes: Vec<usize>,
}

/// 值去掉所有空白后包含「工厂直发」即视为直发行
pub fn is_factory_direct(value: &str) -> bool {
    let squeezed: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    squeezed.contains("工厂直发")
}

/// 渠道值是否指向亚马逊(箱唛下载只处理亚马逊渠道)
pub fn is_amazon_channel(value: &str) -> bool {
    let lower = value.to_lowercase();
    lower.contains("amazon") || lower.contains("amz") || value.contains("亚马逊")
}

pub fn find_channel_col(table: &SheetTable) -> Option<usize> {
    find_col(table, CHANNEL_COL_CANDIDATES)
}

/// 筛出工厂直发行并按供应商分组。
/// 分组顺序 = 供应商在文件1中首次出现的顺序,组内行保持原序。
pub fn classify_direct_rows(table: &SheetTable) -> SplitResult<Vec<RawSupplierRows>> {
    let direct_col = require_col(table, DIRECT_COL_CANDIDATES, "中仓 或 工厂直发")?;
    let supplier_col = require_col(table, SUPPLIER_COL_CANDIDATES, "供应商")?;

    let mut groups: Vec<RawSupplierRows> = Vec::new();
    let mut total_direct = 0usize;
    for (idx, row) in table.rows.iter().enumerate() {
        if SheetTable::is_empty_row(row) {
            continue;
        }
        if !is_factory_direct(&table.value(row, Some(direct_col))) {
            continue;
        }
        total_direct += 1;
        let supplier = table.value(row, Some(supplier_col));
        match groups.iter_mut().find(|g| g.supplier == supplier) {
            Some(g) => g.row_indexes.push(idx),
            None => groups.push(RawSupplierRows {
                supplier,
                row_indexes: vec![idx],
            }),
        }
    }

    info!(
        "工厂直发行 {} 条,供应商 {} 家",
        total_direct,
        groups.len()
    );
    for g in &groups {
        debug!("供应商「{}」: {} 行", g.supplier, g.row_indexes.len());
    }
    Ok(groups)
}
