// ==========================================
// 工厂提货明细拆分系统 - 模板实例化
// ==========================================
// 职责: 克隆模板样式/公式,重建数据区与合计行,回写「匹配」表
// 红线: 公式列不写值;模板第2行为数据模板,第4行为合计模板
// ==========================================

use super::formula::{col_letter, translate_formula};
use crate::domain::{ShipmentRow, SkuConfigEntry, SupplierGroup};
use crate::error::{SplitError, SplitResult};
use crate::sheet::parse_number;
use std::path::Path;
use tracing::{debug, warn};
use umya_spreadsheet::{Pane, PaneStateValues, PaneValues, SheetView, Spreadsheet, Style};

pub const MAIN_SHEET: &str = "工厂提货明细";
pub const MATCH_SHEET: &str = "匹配";

const DATA_TEMPLATE_ROW: u32 = 2;
const TOTAL_TEMPLATE_ROW: u32 = 4;
/// 合计行里重建 SUM 的列
const SUM_COLUMNS: &[&str] = &["G", "J", "V", "W", "X"];

/// 模板单元格快照: 样式 + 公式文本
#[derive(Clone)]
struct CellTemplate {
    style: Style,
    formula: Option<String>,
}

/// 一份已加载的模板工作簿,每个供应商分组实例化一份
pub struct TemplateWorkbook {
    book: Spreadsheet,
}

impl TemplateWorkbook {
    pub fn open(path: &Path) -> SplitResult<Self> {
        if !path.exists() {
            return Err(SplitError::TemplateNotFound(path.display().to_string()));
        }
        let book = umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|e| SplitError::ExcelRead(format!("{}: {}", path.display(), e)))?;
        if book.get_sheet_by_name(MAIN_SHEET).is_none() {
            return Err(SplitError::SheetNotFound {
                file: path.display().to_string(),
                sheet: MAIN_SHEET.to_string(),
            });
        }
        Ok(Self { book })
    }

    pub fn save(&self, path: &Path) -> SplitResult<()> {
        umya_spreadsheet::writer::xlsx::write(&self.book, path)?;
        Ok(())
    }

    /// 重写「匹配」sheet: 表头 + 每个 SKU 一行,数值缺失留空
    pub fn write_match_sheet(&mut self, entries: &[&SkuConfigEntry]) -> SplitResult<()> {
        let _ = self.book.remove_sheet_by_name(MATCH_SHEET);
        let sheet = self
            .book
            .new_sheet(MATCH_SHEET)
            .map_err(|e| SplitError::Internal(format!("创建「{}」sheet失败: {}", MATCH_SHEET, e)))?;

        let headers = ["SKU", "产品名称", "长", "宽", "高", "单箱毛重", "单箱数量"];
        for (i, h) in headers.iter().enumerate() {
            sheet.get_cell_mut((i as u32 + 1, 1)).set_value(*h);
        }
        for (r, entry) in entries.iter().enumerate() {
            let row = r as u32 + 2;
            sheet.get_cell_mut((1, row)).set_value(entry.sku.clone());
            sheet
                .get_cell_mut((2, row))
                .set_value(entry.product_name.clone());
            let numerics = [
                entry.length_cm,
                entry.width_cm,
                entry.height_cm,
                entry.gross_weight_per_carton,
                entry.units_per_carton,
            ];
            for (i, v) in numerics.iter().enumerate() {
                if let Some(n) = v {
                    sheet.get_cell_mut((i as u32 + 3, row)).set_value_number(*n);
                }
            }
        }
        debug!("「{}」sheet 写入 {} 条", MATCH_SHEET, entries.len());
        Ok(())
    }

    /// 重建主表数据区: 模板数据行克隆 N 份,尾接合计行。
    /// N=0 时只保留表头。
    pub fn rebuild_main_sheet(&mut self, group: &SupplierGroup, pickup_date: &str) -> SplitResult<()> {
        let sheet = self
            .book
            .get_sheet_by_name_mut(MAIN_SHEET)
            .ok_or_else(|| SplitError::Internal(format!("「{}」sheet 丢失", MAIN_SHEET)))?;

        let highest_col = sheet.get_highest_column().max(1);
        let highest_row = sheet.get_highest_row();

        // 表头列名 -> 列号
        let mut header_cols: Vec<(String, u32)> = Vec::new();
        for col in 1..=highest_col {
            let v = sheet
                .get_cell((col, 1))
                .map(|c| c.get_value().trim().to_string())
                .unwrap_or_default();
            if !v.is_empty() {
                header_cols.push((v, col));
            }
        }

        // 模板行快照
        let data_tpl = capture_row(sheet, DATA_TEMPLATE_ROW, highest_col);
        let total_tpl = capture_row(sheet, TOTAL_TEMPLATE_ROW, highest_col);
        let data_height = sheet
            .get_row_dimension(&DATA_TEMPLATE_ROW)
            .map(|r| *r.get_height());
        let total_height = sheet
            .get_row_dimension(&TOTAL_TEMPLATE_ROW)
            .map(|r| *r.get_height());

        // 清空表头以下所有行
        if highest_row >= DATA_TEMPLATE_ROW {
            sheet.remove_row(&DATA_TEMPLATE_ROW, &(highest_row - DATA_TEMPLATE_ROW + 1));
        }

        freeze_header_row(sheet);

        let n = group.rows.len() as u32;
        if n == 0 {
            warn!("供应商「{}」无数据行,仅保留表头", group.supplier_full_name);
            return Ok(());
        }

        // 数据行
        for (i, ship) in group.rows.iter().enumerate() {
            let row = DATA_TEMPLATE_ROW + i as u32;
            let delta = i as i64;
            for (col, tpl) in data_tpl.iter().enumerate() {
                let col = col as u32 + 1;
                let cell = sheet.get_cell_mut((col, row));
                cell.set_style(tpl.style.clone());
                if let Some(f) = &tpl.formula {
                    cell.set_formula(translate_formula(f, delta));
                }
            }
            if let Some(h) = data_height {
                sheet.get_row_dimension_mut(&row).set_height(h);
            }
            for (name, col) in &header_cols {
                if data_tpl
                    .get(*col as usize - 1)
                    .map(|t| t.formula.is_some())
                    .unwrap_or(false)
                {
                    continue;
                }
                write_value_cell(sheet, *col, row, name, ship, pickup_date);
            }
        }

        // 合计行
        let total_row = DATA_TEMPLATE_ROW + n;
        let last_data_row = total_row - 1;
        for (col, tpl) in total_tpl.iter().enumerate() {
            let col = col as u32 + 1;
            let cell = sheet.get_cell_mut((col, total_row));
            cell.set_style(tpl.style.clone());
        }
        if let Some(h) = total_height {
            sheet.get_row_dimension_mut(&total_row).set_height(h);
        }
        for letters in SUM_COLUMNS {
            let col = super::formula::col_index(letters);
            if col <= highest_col {
                sheet.get_cell_mut((col, total_row)).set_formula(format!(
                    "SUM({}{}:{}{})",
                    letters, DATA_TEMPLATE_ROW, letters, last_data_row
                ));
            }
        }

        sheet.set_auto_filter(format!("A1:{}{}", col_letter(highest_col), total_row));
        debug!(
            "供应商「{}」主表重建: {} 行 + 合计行",
            group.supplier_full_name, n
        );
        Ok(())
    }
}

/// 表头行冻结在 A2,不依赖模板里原有的窗格设置
fn freeze_header_row(sheet: &mut umya_spreadsheet::Worksheet) {
    let mut pane = Pane::default();
    pane.set_vertical_split(1.0);
    pane.get_top_left_cell_mut().set_coordinate("A2");
    pane.set_active_pane(PaneValues::BottomLeft);
    pane.set_state(PaneStateValues::Frozen);

    let views = sheet.get_sheet_views_mut();
    if views.get_sheet_view_list().is_empty() {
        views.add_sheet_view_list_mut(SheetView::default());
    }
    if let Some(view) = views.get_sheet_view_list_mut().first_mut() {
        view.set_pane(pane);
    }
}

fn capture_row(
    sheet: &umya_spreadsheet::Worksheet,
    row: u32,
    highest_col: u32,
) -> Vec<CellTemplate> {
    (1..=highest_col)
        .map(|col| match sheet.get_cell((col, row)) {
            Some(cell) => {
                let f = cell.get_formula();
                CellTemplate {
                    style: cell.get_style().clone(),
                    formula: if f.is_empty() {
                        None
                    } else {
                        Some(f.to_string())
                    },
                }
            }
            None => CellTemplate {
                style: Style::default(),
                formula: None,
            },
        })
        .collect()
}

fn write_value_cell(
    sheet: &mut umya_spreadsheet::Worksheet,
    col: u32,
    row: u32,
    header: &str,
    ship: &ShipmentRow,
    pickup_date: &str,
) {
    let text = match header {
        "预计提货日期" => pickup_date.to_string(),
        "销售负责人" => ship.operator.clone(),
        "账号" => ship.account.clone(),
        "FNSKU / UPC" | "FNSKU/UPC" => ship.fnsku_upc.clone(),
        "SKU" => ship.sku.clone(),
        "产品名称" => ship.product_name.clone(),
        "发货数量" => ship.ship_quantity.clone(),
        "单箱数量" => {
            let cell = sheet.get_cell_mut((col, row));
            if let Some(n) = ship.units_per_carton {
                cell.set_value_number(n);
            }
            return;
        }
        "物流渠道" => ship.logistics_channel.clone(),
        "发货仓库" => ship.ship_from_warehouse.clone(),
        "FBA ID" => ship.fba_id.clone(),
        "Reference ID" => ship.reference_id.clone(),
        "到货仓库" => ship.destination_warehouse.clone(),
        "仓库代码" => ship.warehouse_code.clone(),
        "工厂地址" => ship.factory_address.clone(),
        _ => return,
    };
    if text.is_empty() {
        return;
    }
    let cell = sheet.get_cell_mut((col, row));
    match parse_number(&text) {
        Some(n) if header == "发货数量" => {
            cell.set_value_number(n);
        }
        _ => {
            cell.set_value(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_template(path: &Path) {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.set_name(MAIN_SHEET);
        let headers = [
            "预计提货日期", "销售负责人", "账号", "FNSKU / UPC", "SKU", "产品名称", "发货数量",
        ];
        for (i, h) in headers.iter().enumerate() {
            sheet.get_cell_mut((i as u32 + 1, 1)).set_value(*h);
        }
        // G2 带公式,克隆时应平移而不是被值覆盖
        sheet.get_cell_mut((7, 2)).set_formula("E2&\"件\"");
        sheet.get_cell_mut((1, 4)).set_value("合计");
        umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
    }

    fn group_of(n: usize) -> SupplierGroup {
        let rows = (0..n)
            .map(|i| ShipmentRow {
                sku: format!("A{:03}", i),
                ship_quantity: "100".to_string(),
                ..Default::default()
            })
            .collect();
        SupplierGroup {
            supplier_full_name: "深圳市正美电子有限公司".to_string(),
            supplier_short_name: "正美".to_string(),
            factory_folder_name: "正美".to_string(),
            rows,
        }
    }

    #[test]
    fn test_rebuild_rows_and_total() {
        let dir = tempdir().unwrap();
        let tpl = dir.path().join("tpl.xlsx");
        sample_template(&tpl);

        let mut wb = TemplateWorkbook::open(&tpl).unwrap();
        wb.rebuild_main_sheet(&group_of(3), "2026.08.30").unwrap();

        let sheet = wb.book.get_sheet_by_name(MAIN_SHEET).unwrap();
        // 3 数据行在第 2..4 行,合计行在第 5 行
        assert_eq!(sheet.get_cell((5, 2)).unwrap().get_value(), "A000");
        assert_eq!(sheet.get_cell((5, 4)).unwrap().get_value(), "A002");
        assert_eq!(sheet.get_cell((7, 3)).unwrap().get_formula(), "E3&\"件\"");
        assert_eq!(
            sheet.get_cell((7, 5)).unwrap().get_formula(),
            "SUM(G2:G4)"
        );
        assert_eq!(sheet.get_cell((1, 2)).unwrap().get_value(), "2026.08.30");
    }

    #[test]
    fn test_empty_group_keeps_header_only() {
        let dir = tempdir().unwrap();
        let tpl = dir.path().join("tpl.xlsx");
        sample_template(&tpl);

        let mut wb = TemplateWorkbook::open(&tpl).unwrap();
        wb.rebuild_main_sheet(&group_of(0), "2026.08.30").unwrap();
        let sheet = wb.book.get_sheet_by_name(MAIN_SHEET).unwrap();
        assert_eq!(sheet.get_highest_row(), 1);
    }

    #[test]
    fn test_header_row_frozen_at_a2() {
        let dir = tempdir().unwrap();
        let tpl = dir.path().join("tpl.xlsx");
        sample_template(&tpl);

        let mut wb = TemplateWorkbook::open(&tpl).unwrap();
        wb.rebuild_main_sheet(&group_of(2), "2026.08.30").unwrap();

        let sheet = wb.book.get_sheet_by_name(MAIN_SHEET).unwrap();
        let views = sheet.get_sheets_views().get_sheet_view_list();
        let pane = views[0].get_pane().expect("冻结窗格缺失");
        assert_eq!(pane.get_top_left_cell().get_coordinate(), "A2");
        assert!(matches!(pane.get_state(), PaneStateValues::Frozen));
        assert_eq!(*pane.get_vertical_split(), 1.0);
    }

    #[test]
    fn test_match_sheet_written() {
        let dir = tempdir().unwrap();
        let tpl = dir.path().join("tpl.xlsx");
        sample_template(&tpl);

        let mut wb = TemplateWorkbook::open(&tpl).unwrap();
        let mut entry = SkuConfigEntry::unknown("A001".into(), "加湿器".into());
        entry.units_per_carton = Some(36.0);
        wb.write_match_sheet(&[&entry]).unwrap();
        let sheet = wb.book.get_sheet_by_name(MATCH_SHEET).unwrap();
        assert_eq!(sheet.get_cell((1, 2)).unwrap().get_value(), "A001");
        assert_eq!(sheet.get_cell((7, 2)).unwrap().get_value(), "36");
    }

    #[test]
    fn test_corrupt_template_reports_read_error() {
        let dir = tempdir().unwrap();
        let tpl = dir.path().join("bad.xlsx");
        std::fs::write(&tpl, b"not an xlsx").unwrap();
        let err = TemplateWorkbook::open(&tpl).err().expect("损坏模板应报错");
        assert!(matches!(err, SplitError::ExcelRead(_)));
    }

    #[test]
    fn test_missing_main_sheet_rejected() {
        let dir = tempdir().unwrap();
        let tpl = dir.path().join("bad.xlsx");
        let book = umya_spreadsheet::new_file();
        umya_spreadsheet::writer::xlsx::write(&book, &tpl).unwrap();
        assert!(TemplateWorkbook::open(&tpl).is_err());
    }
}
