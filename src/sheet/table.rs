// ==========================================
// 工厂提货明细拆分系统 - 带表头的数据表
// ==========================================
// 职责: 表头去重、按列名取值、数值解析
// ==========================================

use super::grid::SheetGrid;

/// 带表头的数据表。表头重名按出现次序改写为「箱规」「箱规.1」「箱规.2」。
#[derive(Debug, Clone)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// header_row 为 1-based 表头行号,其下所有行为数据行
    pub fn from_grid(grid: &SheetGrid, header_row: usize) -> Self {
        let raw_headers: Vec<String> = grid
            .rows
            .get(header_row - 1)
            .cloned()
            .unwrap_or_default();
        let headers = dedup_headers(&raw_headers);

        let width = headers.len();
        let rows: Vec<Vec<String>> = grid
            .rows
            .iter()
            .skip(header_row)
            .map(|r| {
                let mut row = r.clone();
                row.resize(width, String::new());
                row
            })
            .collect();

        SheetTable { headers, rows }
    }

    pub fn col_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    /// 单元格文本,缺列/缺行返回空串
    pub fn value(&self, row: &[String], col: Option<usize>) -> String {
        col.and_then(|c| row.get(c))
            .map(|s| s.trim().to_string())
            .unwrap_or_default()
    }

    pub fn numeric(&self, row: &[String], col: Option<usize>) -> Option<f64> {
        parse_number(&self.value(row, col))
    }

    pub fn is_empty_row(row: &[String]) -> bool {
        row.iter().all(|c| c.trim().is_empty())
    }
}

/// 解析可能带千分位逗号或尾部 ".0" 的数值文本
pub fn parse_number(s: &str) -> Option<f64> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

fn dedup_headers(raw: &[String]) -> Vec<String> {
    let mut seen: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    raw.iter()
        .map(|h| {
            let base = h.trim().to_string();
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base.clone()
            } else {
                format!("{}.{}", base, count)
            };
            *count += 1;
            name
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::grid::SheetGrid;

    #[test]
    fn test_dedup_headers() {
        let raw: Vec<String> = ["SKU", "箱规", "箱规", "箱规"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            dedup_headers(&raw),
            vec!["SKU", "箱规", "箱规.1", "箱规.2"]
        );
    }

    #[test]
    fn test_from_grid_pads_rows() {
        let grid = SheetGrid {
            name: "s".to_string(),
            rows: vec![
                vec!["SKU".to_string(), "数量".to_string()],
                vec!["A001".to_string()],
            ],
        };
        let table = SheetTable::from_grid(&grid, 1);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].len(), 2);
        let qty_col = table.col_index("数量");
        assert_eq!(table.value(&table.rows[0], qty_col), "");
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("1,200"), Some(1200.0));
        assert_eq!(parse_number("36.0"), Some(36.0));
        assert_eq!(parse_number(" 12 "), Some(12.0));
        assert_eq!(parse_number("三十"), None);
        assert_eq!(parse_number(""), None);
    }
}
