// ==========================================
// 工厂提货明细拆分系统 - 货件行装配
// ==========================================
// 职责: 文件1行 -> ShipmentRow / SupplierGroup
// 红线: FBA/Reference 两列只做精确列名匹配
// ==========================================

use super::classifier::RawSupplierRows;
use crate::domain::{FactoryDirectory, ShipmentRow, SkuCatalog, SupplierGroup};
use crate::error::SplitResult;
use crate::matching::{match_factory_address, match_factory_name, supplier_short_name};
use crate::sheet::{choose_best_numeric_col, find_col, find_col_exact, SheetTable};
use tracing::debug;

// FBA货件编号 写入 Reference ID 列,TF调拨单号 写入 FBA ID 列。
// 这是与箱唛下载端的列名约定,见 domain::ShipmentRow 的说明。
const FBA_SHIPMENT_COLS: &[&str] = &["FBA货件编号", "FBA ID", "FBA货件ID", "FBA货件号"];
const TF_ORDER_COLS: &[&str] = &[
    "TF调拨单", "TF调拨单号", "调拨单号", "TF单号", "调拨单", "Reference ID", "参考单号",
];

/// 文件1各字段的列号,表头解析一次后整张表复用
#[derive(Debug, Clone)]
pub struct DetailColumns {
    operator: Option<usize>,
    account: Option<usize>,
    fnsku_upc: Option<usize>,
    sku: Option<usize>,
    product_name: Option<usize>,
    ship_quantity: Option<usize>,
    units_per_carton: Option<usize>,
    logistics_channel: Option<usize>,
    ship_from: Option<usize>,
    fba_shipment: Option<usize>,
    tf_order: Option<usize>,
    destination: Option<usize>,
    warehouse_code: Option<usize>,
}

impl DetailColumns {
    pub fn resolve(table: &SheetTable) -> Self {
        Self {
            operator: find_col(table, &["运营"]),
            account: find_col(table, &["店铺账号/目的仓库", "账号"]),
            fnsku_upc: find_col(table, &["FNSKU / UPC", "FNSKU/UPC", "FNSKU"]),
            sku: find_col(table, &["仓库SKU", "SKU"]),
            product_name: find_col(table, &["产品名称", "品名"]),
            ship_quantity: find_col(table, &["发货数量", "数量"]),
            units_per_carton: choose_best_numeric_col(table, "箱规"),
            logistics_channel: find_col(table, &["物流渠道", "物流方式"]),
            ship_from: find_col(table, &["发货仓库", "发货仓"]),
            fba_shipment: find_col_exact(table, FBA_SHIPMENT_COLS),
            tf_order: find_col_exact(table, TF_ORDER_COLS),
            destination: find_col(table, &["配送地址/收货人信息", "到货仓库"]),
            warehouse_code: find_col(table, &["仓库代码"]),
        }
    }
}

/// 组装一个供应商分组:行字段解析 + 短名派生 + 工厂地址模糊匹配
pub fn build_group(
    table: &SheetTable,
    raw: &RawSupplierRows,
    cols: &DetailColumns,
    catalog: &SkuCatalog,
    factories: &FactoryDirectory,
) -> SplitResult<SupplierGroup> {
    let short = supplier_short_name(&raw.supplier);

    // 工厂文件夹名: 工厂信息表模糊匹配出的标准名优先,否则供应商短名
    let matched = match_factory_name(&[short.as_str(), raw.supplier.as_str()], factories);
    let folder_name = if matched.is_empty() {
        short.clone()
    } else {
        matched
    };

    let mut rows = Vec::with_capacity(raw.row_indexes.len());
    for &idx in &raw.row_indexes {
        let row = &table.rows[idx];
        let sku = table.value(row, cols.sku);
        let units = table
            .numeric(row, cols.units_per_carton)
            .or_else(|| catalog.units_per_carton(&sku));

        // 地址按行匹配: SKU的工厂简称 -> 供应商短名 -> 供应商全名
        let fac_short = catalog.factory_short_name(&sku);
        let address =
            match_factory_address(&[fac_short, &short, &raw.supplier], factories);
        if address.is_empty() {
            debug!("供应商「{}」SKU {} 未匹配到工厂地址", raw.supplier, sku);
        }
        rows.push(ShipmentRow {
            operator: table.value(row, cols.operator),
            account: table.value(row, cols.account),
            fnsku_upc: table.value(row, cols.fnsku_upc),
            sku,
            product_name: table.value(row, cols.product_name),
            ship_quantity: table.value(row, cols.ship_quantity),
            units_per_carton: units,
            logistics_channel: table.value(row, cols.logistics_channel),
            ship_from_warehouse: table.value(row, cols.ship_from),
            fba_id: table.value(row, cols.tf_order),
            reference_id: table.value(row, cols.fba_shipment),
            destination_warehouse: table.value(row, cols.destination),
            warehouse_code: table.value(row, cols.warehouse_code),
            factory_address: address,
        });
    }

    Ok(SupplierGroup {
        supplier_full_name: raw.supplier.clone(),
        supplier_short_name: short,
        factory_folder_name: folder_name,
        rows,
    })
}
