// ==========================================
// 工厂提货明细拆分系统 - 配置表导入
// ==========================================
// 职责: 读取 SKU信息 / 工厂信息 两张配置表
// 红线: SKU信息 缺失即终止,工厂信息 缺失仅告警
// ==========================================

use crate::domain::{FactoryDirectory, SkuCatalog, SkuConfigEntry};
use crate::error::{SplitError, SplitResult};
use crate::sheet::{find_col, load_grids, require_col, SheetGrid, SheetTable};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

const SKU_SHEET: &str = "SKU信息";
const FACTORY_SHEET: &str = "工厂信息";

/// 配置工作簿的解析结果
#[derive(Debug, Clone)]
pub struct ConfigBook {
    pub catalog: SkuCatalog,
    pub factories: FactoryDirectory,
}

pub fn load_config(path: &Path) -> SplitResult<ConfigBook> {
    let grids = load_grids(path)?;

    let sku_grid = find_sheet(&grids, SKU_SHEET).ok_or_else(|| SplitError::SheetNotFound {
        file: path.display().to_string(),
        sheet: SKU_SHEET.to_string(),
    })?;
    let catalog = parse_sku_sheet(sku_grid)?;
    info!("SKU配置加载完成: {} 条", catalog.entries().len());

    let factories = match find_sheet(&grids, FACTORY_SHEET) {
        Some(grid) => parse_factory_sheet(grid),
        None => {
            warn!("配置表缺少「{}」sheet,地址匹配将退化为空地址", FACTORY_SHEET);
            FactoryDirectory::default()
        }
    };

    Ok(ConfigBook { catalog, factories })
}

fn find_sheet<'a>(grids: &'a [SheetGrid], name: &str) -> Option<&'a SheetGrid> {
    grids.iter().find(|g| g.name == name)
}

fn parse_sku_sheet(grid: &SheetGrid) -> SplitResult<SkuCatalog> {
    let table = SheetTable::from_grid(grid, 1);

    let sku_col = require_col(&table, &["SKU"], &format!("{} 表的 SKU", SKU_SHEET))?;
    let alias_col = find_col(&table, &["SKU检索", "检索SKU"]);
    let name_col = find_col(&table, &["产品名称", "品名"]);
    let short_col = find_col(&table, &["工厂简称", "简称"]);
    let units_col = find_col(&table, &["箱规", "单箱数量", "箱内数量"]);
    let len_col = find_col(&table, &["长"]);
    let wid_col = find_col(&table, &["宽"]);
    let hei_col = find_col(&table, &["高"]);
    let weight_col = find_col(&table, &["毛重", "单箱毛重"]);

    let mut entries = Vec::new();
    let mut shorts: HashMap<String, String> = HashMap::new();
    for row in &table.rows {
        let sku = table.value(row, Some(sku_col));
        if sku.is_empty() {
            continue;
        }
        let entry = SkuConfigEntry {
            sku: sku.clone(),
            product_name: table.value(row, name_col),
            length_cm: table.numeric(row, len_col),
            width_cm: table.numeric(row, wid_col),
            height_cm: table.numeric(row, hei_col),
            gross_weight_per_carton: table.numeric(row, weight_col),
            units_per_carton: table.numeric(row, units_col),
        };
        let short = table.value(row, short_col);
        if !short.is_empty() {
            shorts.insert(sku.clone(), short.clone());
        }

        // 「SKU检索」与 SKU 不同时,派生一条共享属性的别名条目
        let alias = table.value(row, alias_col);
        if !alias.is_empty() && alias != sku {
            let mut alias_entry = entry.clone();
            alias_entry.sku = alias.clone();
            if !short.is_empty() {
                shorts.insert(alias, short);
            }
            entries.push(entry);
            entries.push(alias_entry);
        } else {
            entries.push(entry);
        }
    }

    Ok(SkuCatalog::from_entries(entries, shorts))
}

fn parse_factory_sheet(grid: &SheetGrid) -> FactoryDirectory {
    let table = SheetTable::from_grid(grid, 1);
    let name_col = find_col(&table, &["工厂名称", "工厂", "供应商", "名称"]);
    let addr_col = find_col(&table, &["工厂地址", "地址", "提货地址"]);
    let (Some(name_col), Some(addr_col)) = (name_col, addr_col) else {
        warn!("「{}」表缺少名称/地址列,忽略该表", FACTORY_SHEET);
        return FactoryDirectory::default();
    };

    let mut entries = Vec::new();
    for row in &table.rows {
        let name = table.value(row, Some(name_col));
        let addr = table.value(row, Some(addr_col));
        if !name.is_empty() && !addr.is_empty() {
            entries.push((name, addr));
        }
    }
    info!("工厂地址表加载完成: {} 条", entries.len());
    FactoryDirectory::new(entries)
}

/// 把待拆分文件里出现、但配置表缺失的 SKU 按空尺寸补录进目录,
/// 品名从明细表顺带取。
pub fn merge_missing_skus(catalog: &mut SkuCatalog, table: &SheetTable) {
    let Some(sku_col) = find_col(table, &["仓库SKU", "SKU"]) else {
        return;
    };
    let name_col = find_col(table, &["产品名称", "品名"]);

    let mut added = 0usize;
    for row in &table.rows {
        let sku = table.value(row, Some(sku_col));
        if sku.is_empty() || catalog.contains(&sku) {
            continue;
        }
        catalog.push_missing(SkuConfigEntry::unknown(sku, table.value(row, name_col)));
        added += 1;
    }
    if added > 0 {
        warn!("配置表缺失 {} 个SKU,已按空尺寸补录", added);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(name: &str, rows: Vec<Vec<&str>>) -> SheetGrid {
        SheetGrid {
            name: name.to_string(),
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
        }
    }

    #[test]
    fn test_parse_sku_sheet() {
        let g = grid(
            SKU_SHEET,
            vec![
                vec!["SKU", "SKU检索", "产品名称", "工厂简称", "箱规", "长", "宽", "高", "毛重"],
                vec!["A001", "A001-US", "加湿器", "正美", "36", "60", "40", "30", "12.5"],
                vec!["", "", "空行跳过", "", "", "", "", "", ""],
            ],
        );
        let catalog = parse_sku_sheet(&g).unwrap();
        assert_eq!(catalog.entries().len(), 2);
        assert_eq!(catalog.units_per_carton("A001"), Some(36.0));
        assert_eq!(catalog.units_per_carton("A001-US"), Some(36.0));
        assert_eq!(catalog.factory_short_name("A001-US"), "正美");
    }

    #[test]
    fn test_merge_missing_skus() {
        let g = grid(
            SKU_SHEET,
            vec![vec!["SKU", "产品名称"], vec!["A001", "加湿器"]],
        );
        let mut catalog = parse_sku_sheet(&g).unwrap();
        let detail = grid(
            "数据",
            vec![
                vec!["仓库SKU", "产品名称"],
                vec!["A001", "加湿器"],
                vec!["B002", "风扇"],
            ],
        );
        let table = SheetTable::from_grid(&detail, 1);
        merge_missing_skus(&mut catalog, &table);
        assert!(catalog.contains("B002"));
        assert_eq!(catalog.units_per_carton("B002"), None);
    }
}
