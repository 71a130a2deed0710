// ==========================================
// 工厂提货明细拆分系统 - 工作簿网格读取
// ==========================================
// 职责: calamine 只读解析 + 表头行探测
// 支持: .xlsx
// ==========================================

use crate::error::{SplitError, SplitResult};
use calamine::{open_workbook, Data, Reader, Xlsx};
use std::path::Path;

/// 一个 sheet 的纯文本网格（绝对坐标,含前导空行/空列的占位）
#[derive(Debug, Clone)]
pub struct SheetGrid {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

impl SheetGrid {
    /// 1-based 行列取值,越界返回空串
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row - 1)
            .and_then(|r| r.get(col - 1))
            .map(String::as_str)
            .unwrap_or("")
    }
}

fn cell_to_string(d: &Data) -> String {
    match d {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

/// 读取工作簿的所有 sheet 为文本网格
pub fn load_grids(path: &Path) -> SplitResult<Vec<SheetGrid>> {
    if !path.exists() {
        return Err(SplitError::FileNotFound(path.display().to_string()));
    }

    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e: calamine::XlsxError| SplitError::ExcelRead(e.to_string()))?;

    let sheet_names = workbook.sheet_names().to_owned();
    if sheet_names.is_empty() {
        return Err(SplitError::ExcelRead(format!(
            "{} 无工作表",
            path.display()
        )));
    }

    let mut grids = Vec::with_capacity(sheet_names.len());
    for name in sheet_names {
        let range = workbook.worksheet_range(&name)?;
        let (start_row, start_col) = range.start().unwrap_or((0, 0));

        // 前导空行/空列补占位,保证网格坐标与 Excel 行列号一致
        let mut rows: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];
        for data_row in range.rows() {
            let mut row: Vec<String> = vec![String::new(); start_col as usize];
            for cell in data_row {
                row.push(cell_to_string(cell));
            }
            rows.push(row);
        }
        grids.push(SheetGrid { name, rows });
    }

    Ok(grids)
}

/// 在前 50 行 × 前 80 列里找同时含「中仓」和「直发」的表头单元格。
/// 返回 (sheet名, 1-based 表头行号)；找不到则默认第一个 sheet 第 1 行。
pub fn detect_sheet_and_header(grids: &[SheetGrid]) -> (String, usize) {
    for grid in grids {
        for (i, row) in grid.rows.iter().take(50).enumerate() {
            for cell in row.iter().take(80) {
                if cell.contains("中仓") && cell.contains("直发") {
                    return (grid.name.clone(), i + 1);
                }
            }
        }
    }
    (
        grids.first().map(|g| g.name.clone()).unwrap_or_default(),
        1,
    )
}
