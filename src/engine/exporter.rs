// ==========================================
// 工厂提货明细拆分系统 - 中仓汇总导出
// ==========================================
// 职责: 保留源文件格式,仅留「非直发 且 亚马逊渠道」的行
// 做法: 整簿加载后自底向上删行,失败时降级为无样式导出
// ==========================================

use crate::error::{SplitError, SplitResult};
use crate::importer::{find_channel_col, is_amazon_channel, is_factory_direct};
use crate::sheet::{require_col, SheetTable};
use std::path::Path;
use tracing::{info, warn};

// 汇总侧允许更宽的直发列叫法(源文件可能来自不同导出口径)
const DIRECT_COL_CANDIDATES: &[&str] = &[
    "中仓 或 工厂直发", "中仓或工厂直发", "直发", "发运类型", "直发类型", "配送方式", "发货方式",
];

/// 留给中仓汇总的行(0-based 数据行号): 非工厂直发,且渠道列存在时须为亚马逊
pub fn other_partition_rows(table: &SheetTable) -> SplitResult<Vec<usize>> {
    let direct_col = require_col(table, DIRECT_COL_CANDIDATES, "中仓 或 工厂直发")?;
    let channel_col = find_channel_col(table);

    let keep = table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            if SheetTable::is_empty_row(row) {
                return false;
            }
            if is_factory_direct(&table.value(row, Some(direct_col))) {
                return false;
            }
            match channel_col {
                Some(c) => is_amazon_channel(&table.value(row, Some(c))),
                None => true,
            }
        })
        .map(|(i, _)| i)
        .collect();
    Ok(keep)
}

/// 把源工作簿裁成只含 keep 指定行的汇总文件。
/// 样式路径失败时降级为无样式导出,降级本身不算失败。
pub fn export_summary(
    src: &Path,
    sheet_name: &str,
    header_row: usize,
    table: &SheetTable,
    keep: &[usize],
    out: &Path,
) -> SplitResult<()> {
    match export_styled(src, sheet_name, header_row, table.rows.len(), keep, out) {
        Ok(()) => {
            info!("中仓汇总导出 {} 行: {}", keep.len(), out.display());
            Ok(())
        }
        Err(e) => {
            warn!("格式保留导出失败({}),降级为无样式导出", e);
            export_plain(table, keep, out)
        }
    }
}

fn export_styled(
    src: &Path,
    sheet_name: &str,
    header_row: usize,
    data_rows: usize,
    keep: &[usize],
    out: &Path,
) -> SplitResult<()> {
    let mut book = umya_spreadsheet::reader::xlsx::read(src)
        .map_err(|e| SplitError::ExcelRead(format!("{}: {}", src.display(), e)))?;

    let siblings: Vec<String> = book
        .get_sheet_collection()
        .iter()
        .map(|s| s.get_name().to_string())
        .filter(|n| n != sheet_name)
        .collect();
    for name in siblings {
        let _ = book.remove_sheet_by_name(&name);
    }

    let sheet = book
        .get_sheet_by_name_mut(sheet_name)
        .ok_or_else(|| SplitError::SheetNotFound {
            file: src.display().to_string(),
            sheet: sheet_name.to_string(),
        })?;

    // 自底向上删不保留的行,行号不会被前面的删除扰动
    for idx in (0..data_rows).rev() {
        if keep.contains(&idx) {
            continue;
        }
        let abs_row = (header_row + idx + 1) as u32;
        sheet.remove_row(&abs_row, &1);
    }

    umya_spreadsheet::writer::xlsx::write(&book, out)?;
    Ok(())
}

fn export_plain(table: &SheetTable, keep: &[usize], out: &Path) -> SplitResult<()> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_mut(&0)
        .ok_or_else(|| SplitError::Internal("空工作簿".to_string()))?;
    sheet.set_name("中仓");

    for (i, h) in table.headers.iter().enumerate() {
        sheet.get_cell_mut((i as u32 + 1, 1)).set_value(h.clone());
    }
    for (r, &idx) in keep.iter().enumerate() {
        let row = &table.rows[idx];
        for (c, v) in row.iter().enumerate() {
            if !v.is_empty() {
                sheet
                    .get_cell_mut((c as u32 + 1, r as u32 + 2))
                    .set_value(v.clone());
            }
        }
    }
    umya_spreadsheet::writer::xlsx::write(&book, out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: Vec<Vec<&str>>) -> SheetTable {
        SheetTable {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        }
    }

    #[test]
    fn test_other_partition_filters_direct_and_channel() {
        let t = table(
            &["供应商", "中仓 或 工厂直发", "渠道"],
            vec![
                vec!["甲", "工厂直发", "Amazon"],
                vec!["乙", "中仓", "Amazon-US"],
                vec!["丙", "中仓", "沃尔玛"],
                vec!["", "", ""],
            ],
        );
        assert_eq!(other_partition_rows(&t).unwrap(), vec![1]);
    }

    #[test]
    fn test_no_channel_col_keeps_all_non_direct() {
        let t = table(
            &["供应商", "直发类型"],
            vec![vec!["甲", "工厂直发"], vec!["乙", "中仓"]],
        );
        assert_eq!(other_partition_rows(&t).unwrap(), vec![1]);
    }

    #[test]
    fn test_plain_export_writes_kept_rows() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("中仓20260830.xlsx");
        let t = table(
            &["供应商", "数量"],
            vec![vec!["甲", "10"], vec!["乙", "20"]],
        );
        export_plain(&t, &[1], &out).unwrap();

        let book = umya_spreadsheet::reader::xlsx::read(&out).unwrap();
        let sheet = book.get_sheet_by_name("中仓").unwrap();
        assert_eq!(sheet.get_cell((1, 2)).unwrap().get_value(), "乙");
        assert_eq!(sheet.get_highest_row(), 2);
    }

    #[test]
    fn test_styled_export_row_surgery() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src.xlsx");
        let out = dir.path().join("out.xlsx");

        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.set_name("数据");
        sheet.get_cell_mut((1, 1)).set_value("供应商");
        sheet.get_cell_mut((1, 2)).set_value("甲");
        sheet.get_cell_mut((1, 3)).set_value("乙");
        sheet.get_cell_mut((1, 4)).set_value("丙");
        umya_spreadsheet::writer::xlsx::write(&book, &src).unwrap();

        // 3 条数据行里只保留第 1 号(乙)
        export_styled(&src, "数据", 1, 3, &[1], &out).unwrap();
        let book = umya_spreadsheet::reader::xlsx::read(&out).unwrap();
        let sheet = book.get_sheet_by_name("数据").unwrap();
        assert_eq!(sheet.get_cell((1, 2)).unwrap().get_value(), "乙");
        assert_eq!(sheet.get_highest_row(), 2);
    }
}
