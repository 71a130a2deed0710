// ==========================================
// 工厂提货明细拆分系统 - 箱数推断
// ==========================================
// 职责: 从提货明细表按四级兜底推断每个货件的打印箱数
// 兜底链: 箱数列 -> ceil(发货数量/单箱数量) -> FBA列邻列 -> 1
// ==========================================

use crate::sheet::{find_col, SheetTable};
use std::collections::HashMap;
use tracing::debug;

const CARTON_COL_CANDIDATES: &[&str] = &[
    "发货箱数", "发货箱", "发货箱数量", "箱数", "箱数(发货箱数)", "发货箱数(J)",
];
const SHIP_QTY_CANDIDATES: &[&str] = &[
    "发货数量", "发货总数", "数量", "出货数量", "total_qty", "TotalQty",
];
const UNITS_CANDIDATES: &[&str] = &[
    "单箱数量", "箱规", "箱内数量", "单箱数", "units_per_carton", "units_per_box",
];
// 拆分产物里 Reference ID 列放 FBA货件编号,优先于 FBA ID 列
const SHIPMENT_ID_CANDIDATES: &[&str] = &[
    "Reference ID", "Reference_ID", "ReferenceId", "参考单号",
    "FBA ID", "FBA货件编号", "FBA货件ID", "FBA货件号",
];

fn find_carton_col(table: &SheetTable) -> Option<usize> {
    if let Some(idx) = find_col(table, CARTON_COL_CANDIDATES) {
        return Some(idx);
    }
    // 宽松兜底: 含「箱」但不是箱规/单箱类的列
    table.headers.iter().position(|h| {
        h.contains('箱') && !h.contains("箱规") && !h.contains("单箱") && !h.contains("箱内")
    })
}

pub fn find_shipment_id_col(table: &SheetTable) -> Option<usize> {
    if let Some(idx) = find_col(table, SHIPMENT_ID_CANDIDATES) {
        return Some(idx);
    }
    table.headers.iter().position(|h| {
        let lower = h.to_lowercase();
        lower.contains("reference") || lower.contains("fba") || h.contains("货件")
    })
}

/// 提货明细表里所有含 "FBA" 的货件编号(大写化,保序去重)
pub fn read_fba_ids(table: &SheetTable) -> Vec<String> {
    let Some(col) = find_shipment_id_col(table) else {
        return Vec::new();
    };
    let mut out: Vec<String> = Vec::new();
    for row in &table.rows {
        let v = table.value(row, Some(col)).to_uppercase();
        if v.contains("FBA") && !out.contains(&v) {
            out.push(v);
        }
    }
    out
}

fn carton_for_row(
    table: &SheetTable,
    row: &[String],
    carton_col: Option<usize>,
    ship_col: Option<usize>,
    units_col: Option<usize>,
    fba_col: usize,
) -> u32 {
    // 1. 箱数列直读
    if let Some(n) = table.numeric(row, carton_col) {
        if n >= 1.0 {
            return n.round() as u32;
        }
    }
    // 2. ceil(发货数量 / 单箱数量)
    if let (Some(ship), Some(units)) =
        (table.numeric(row, ship_col), table.numeric(row, units_col))
    {
        if ship > 0.0 && units > 0.0 {
            return (ship / units).ceil() as u32;
        }
    }
    // 3. FBA 列左右邻列里找首个 >=1 的数值
    for offset in [1i64, -1, 2, -2, 3] {
        let idx = fba_col as i64 + offset;
        if idx < 0 {
            continue;
        }
        if let Some(n) = table.numeric(row, Some(idx as usize)) {
            if n >= 1.0 {
                return n.round() as u32;
            }
        }
    }
    // 4. 保底一箱
    1
}

/// FBA货件编号 -> 打印箱数。
/// 同一编号出现于多行时取最后一行: 导出表常在每个SKU行重复整单箱数,累加会放大打印量。
pub fn build_id_carton_map(table: &SheetTable) -> HashMap<String, u32> {
    let Some(fba_col) = find_shipment_id_col(table) else {
        return HashMap::new();
    };
    let carton_col = find_carton_col(table);
    let ship_col = find_col(table, SHIP_QTY_CANDIDATES);
    let units_col = find_col(table, UNITS_CANDIDATES);

    let mut map: HashMap<String, u32> = HashMap::new();
    for row in &table.rows {
        let id = table.value(row, Some(fba_col)).to_uppercase();
        if !id.contains("FBA") {
            continue;
        }
        let cartons = carton_for_row(table, row, carton_col, ship_col, units_col, fba_col);
        map.insert(id.clone(), cartons);
        debug!("货件 {} 箱数 {}", id, cartons);
    }
    map
}
