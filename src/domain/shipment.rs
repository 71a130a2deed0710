// ==========================================
// 工厂提货明细拆分系统 - 货件领域模型
// ==========================================
// 用途: 分类/分组层写入,模板引擎只读消费
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// ShipmentRow - 一条待写入模板的货件行
// ==========================================
// 由文件1的一行派生,创建后不再修改,写入数据行时消费一次。
// 注意: reference_id 列存放 FBA 货件编号（值含 "FBA"）,
// fba_id 列存放 TF 调拨单号——这是与箱唛下载端的列名约定,不可对调。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShipmentRow {
    pub operator: String,              // 销售负责人（来自文件1「运营」列）
    pub account: String,               // 账号
    pub fnsku_upc: String,             // FNSKU / UPC
    pub sku: String,                   // SKU
    pub product_name: String,          // 产品名称
    pub ship_quantity: String,         // 发货数量（原值,数字时按数字写入）
    pub units_per_carton: Option<f64>, // 单箱数量（文件1箱规 -> 配置兜底 -> 空）
    pub logistics_channel: String,     // 物流渠道
    pub ship_from_warehouse: String,   // 发货仓库
    pub fba_id: String,                // FBA ID 列（TF调拨单号）
    pub reference_id: String,          // Reference ID 列（FBA货件编号）
    pub destination_warehouse: String, // 到货仓库
    pub warehouse_code: String,        // 仓库代码
    pub factory_address: String,       // 工厂地址（模糊匹配结果,可为空）
}

// ==========================================
// SupplierGroup - 供应商分组
// ==========================================
// 分组阶段创建,模板实例化阶段消费,对应工作簿保存后丢弃
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierGroup {
    pub supplier_full_name: String,  // 供应商列原值
    pub supplier_short_name: String, // 供应商短名（文件名用）
    pub factory_folder_name: String, // 工厂文件夹名（配置表匹配优先,否则短名）
    pub rows: Vec<ShipmentRow>,
}
