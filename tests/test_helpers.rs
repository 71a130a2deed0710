// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 在临时目录里生成文件1/配置表/模板三件套
// ==========================================

#![allow(dead_code)]

use std::path::Path;

/// 文件1的表头(第2行,第1行是导出报表的横幅)
pub const SOURCE_HEADERS: &[&str] = &[
    "运营",
    "店铺账号/目的仓库",
    "FNSKU / UPC",
    "仓库SKU",
    "产品名称",
    "发货数量",
    "箱规",
    "物流渠道",
    "发货仓库",
    "FBA货件编号",
    "TF调拨单号",
    "配送地址/收货人信息",
    "仓库代码",
    "供应商",
    "中仓 或 工厂直发",
    "渠道",
];

/// 模板主表表头,J 列(发货箱数)在模板第2行带公式
pub const TEMPLATE_HEADERS: &[&str] = &[
    "预计提货日期",
    "销售负责人",
    "账号",
    "FNSKU / UPC",
    "SKU",
    "产品名称",
    "发货数量",
    "单箱数量",
    "物流渠道",
    "发货箱数",
    "发货仓库",
    "FBA ID",
    "Reference ID",
    "到货仓库",
    "仓库代码",
    "工厂地址",
];

/// 生成文件1: 第1行横幅,第2行表头,数据行按传入顺序写入
pub fn write_source_workbook(path: &Path, rows: &[Vec<&str>]) {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    sheet.set_name("线上数据");
    sheet.get_cell_mut((1, 1)).set_value("中仓&直发数据导出");
    for (i, h) in SOURCE_HEADERS.iter().enumerate() {
        sheet.get_cell_mut((i as u32 + 1, 2)).set_value(*h);
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, v) in row.iter().enumerate() {
            if !v.is_empty() {
                sheet
                    .get_cell_mut((c as u32 + 1, r as u32 + 3))
                    .set_value(*v);
            }
        }
    }
    umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
}

/// 文件1的一行,只填常用字段
pub fn source_row<'a>(
    sku: &'a str,
    product: &'a str,
    qty: &'a str,
    units: &'a str,
    fba: &'a str,
    tf: &'a str,
    supplier: &'a str,
    direct: &'a str,
    channel: &'a str,
) -> Vec<&'a str> {
    vec![
        "小王", "US-01", "X002ABC", sku, product, qty, units, "海运", "深圳仓", fba, tf,
        "整柜提货", "ONT8", supplier, direct, channel,
    ]
}

/// 生成配置表: SKU信息 + 工厂信息
pub fn write_config_workbook(
    path: &Path,
    sku_rows: &[(&str, &str, &str, &str)], // (SKU, 产品名称, 工厂简称, 箱规)
    factory_rows: &[(&str, &str)],         // (工厂名称, 工厂地址)
) {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    sheet.set_name("SKU信息");
    for (i, h) in ["SKU", "产品名称", "工厂简称", "箱规", "长", "宽", "高", "毛重"]
        .iter()
        .enumerate()
    {
        sheet.get_cell_mut((i as u32 + 1, 1)).set_value(*h);
    }
    for (r, (sku, name, short, units)) in sku_rows.iter().enumerate() {
        let row = r as u32 + 2;
        sheet.get_cell_mut((1, row)).set_value(*sku);
        sheet.get_cell_mut((2, row)).set_value(*name);
        sheet.get_cell_mut((3, row)).set_value(*short);
        sheet.get_cell_mut((4, row)).set_value(*units);
        sheet.get_cell_mut((5, row)).set_value_number(60);
        sheet.get_cell_mut((6, row)).set_value_number(40);
        sheet.get_cell_mut((7, row)).set_value_number(30);
        sheet.get_cell_mut((8, row)).set_value_number(12.5);
    }

    let factory = book.new_sheet("工厂信息").unwrap();
    factory.get_cell_mut((1, 1)).set_value("工厂名称");
    factory.get_cell_mut((2, 1)).set_value("工厂地址");
    for (r, (name, addr)) in factory_rows.iter().enumerate() {
        let row = r as u32 + 2;
        factory.get_cell_mut((1, row)).set_value(*name);
        factory.get_cell_mut((2, row)).set_value(*addr);
    }
    umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
}

/// 生成模板: 工厂提货明细 sheet,第2行 J 列带箱数公式,第4行为合计模板
pub fn write_template_workbook(path: &Path) {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book.get_sheet_mut(&0).unwrap();
    sheet.set_name("工厂提货明细");
    for (i, h) in TEMPLATE_HEADERS.iter().enumerate() {
        sheet.get_cell_mut((i as u32 + 1, 1)).set_value(*h);
    }
    sheet
        .get_cell_mut((10, 2))
        .set_formula("ROUNDUP(G2/H2,0)");
    sheet.get_cell_mut((1, 4)).set_value("合计");
    umya_spreadsheet::writer::xlsx::write(&book, path).unwrap();
}
