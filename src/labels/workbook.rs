// ==========================================
// 工厂提货明细拆分系统 - 拆分产物回读
// ==========================================
// 职责: 从产出的提货明细表提取 FBA 货件编号与打印箱数
// ==========================================

use crate::error::SplitResult;
use crate::importer::{build_id_carton_map, read_fba_ids};
use crate::sheet::{load_grids, SheetTable};
use std::collections::HashMap;
use std::path::Path;

/// 一个拆分产物对应的箱唛请求素材
#[derive(Debug, Clone, Default)]
pub struct LabelRequest {
    pub fba_ids: Vec<String>,
    pub cartons: HashMap<String, u32>,
}

impl LabelRequest {
    pub fn is_empty(&self) -> bool {
        self.fba_ids.is_empty()
    }
}

/// 读取拆分产物: sheet 名含 工厂/提货/明细 者优先,否则第一个
pub fn read_label_request(path: &Path) -> SplitResult<LabelRequest> {
    let grids = load_grids(path)?;
    let grid = grids
        .iter()
        .find(|g| {
            g.name.contains("工厂") || g.name.contains("提货") || g.name.contains("明细")
        })
        .unwrap_or(&grids[0]);
    let table = SheetTable::from_grid(grid, 1);

    Ok(LabelRequest {
        fba_ids: read_fba_ids(&table),
        cartons: build_id_carton_map(&table),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_label_request_from_produced_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_mut(&0).unwrap();
        sheet.set_name("工厂提货明细");
        for (i, h) in ["SKU", "Reference ID", "发货箱数"].iter().enumerate() {
            sheet.get_cell_mut((i as u32 + 1, 1)).set_value(*h);
        }
        sheet.get_cell_mut((1, 2)).set_value("A001");
        sheet.get_cell_mut((2, 2)).set_value("fba15xyz");
        sheet.get_cell_mut((3, 2)).set_value_number(5);
        sheet.get_cell_mut((1, 3)).set_value("A002");
        sheet.get_cell_mut((2, 3)).set_value("TF2024001");
        umya_spreadsheet::writer::xlsx::write(&book, &path).unwrap();

        let req = read_label_request(&path).unwrap();
        assert_eq!(req.fba_ids, vec!["FBA15XYZ"]);
        assert_eq!(req.cartons.get("FBA15XYZ"), Some(&5));
        assert!(!req.cartons.contains_key("TF2024001"));
    }
}
