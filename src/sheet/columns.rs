// ==========================================
// 工厂提货明细拆分系统 - 列名解析
// ==========================================
// 职责: 候选列名匹配(精确优先、包含兜底)
// ==========================================

use super::table::SheetTable;
use crate::error::{SplitError, SplitResult};

/// 按候选名列表找列: 先逐个候选做精确匹配,再逐个候选做包含匹配。
/// 候选顺序即优先级。
pub fn find_col(table: &SheetTable, candidates: &[&str]) -> Option<usize> {
    for cand in candidates {
        if let Some(idx) = table.headers.iter().position(|h| h == cand) {
            return Some(idx);
        }
    }
    for cand in candidates {
        if let Some(idx) = table.headers.iter().position(|h| h.contains(cand)) {
            return Some(idx);
        }
    }
    None
}

/// 只做精确匹配,供「FBA货件编号」这类不允许模糊的列使用
pub fn find_col_exact(table: &SheetTable, candidates: &[&str]) -> Option<usize> {
    candidates
        .iter()
        .find_map(|cand| table.headers.iter().position(|h| h == cand))
}

pub fn require_col(
    table: &SheetTable,
    candidates: &[&str],
    display_name: &str,
) -> SplitResult<usize> {
    find_col(table, candidates).ok_or_else(|| SplitError::ColumnNotFound {
        column: display_name.to_string(),
    })
}

/// 在「箱规」「箱规.1」「箱规.2」…这些同名去重列里,
/// 挑数值行占比最高的一列。全都没有数值时返回第一个命中的。
pub fn choose_best_numeric_col(table: &SheetTable, base: &str) -> Option<usize> {
    let prefix = format!("{}.", base);
    let variants: Vec<usize> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| h.as_str() == base || h.starts_with(&prefix))
        .map(|(i, _)| i)
        .collect();
    if variants.is_empty() {
        return None;
    }
    if variants.len() == 1 {
        return Some(variants[0]);
    }

    let mut best = variants[0];
    let mut best_hits = -1i64;
    for &col in &variants {
        let hits = table
            .rows
            .iter()
            .filter(|r| table.numeric(r, Some(col)).is_some())
            .count() as i64;
        if hits > best_hits {
            best_hits = hits;
            best = col;
        }
    }
    Some(best)
}
