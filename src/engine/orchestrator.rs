// ==========================================
// 工厂提货明细拆分系统 - 拆分总调度
// ==========================================
// 职责: 文件1 -> 按供应商逐个产出提货明细表 + 中仓汇总表
// 红线: 单个供应商失败只记录,不中断整次拆分
// ==========================================

use super::exporter::{export_summary, other_partition_rows};
use super::naming::{
    build_output_filename, direct_folder_name, parse_pickup_date, resolve_template_path,
    summary_file_name, unique_path,
};
use super::template::TemplateWorkbook;
use crate::domain::SupplierGroup;
use crate::error::SplitResult;
use crate::importer::{
    build_group, classify_direct_rows, load_config, merge_missing_skus, DetailColumns,
};
use crate::sheet::{detect_sheet_and_header, load_grids, SheetTable};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// 一次拆分的全部输入
#[derive(Debug, Clone)]
pub struct SplitOptions {
    pub source_path: PathBuf,           // 文件1(线上取回数据)
    pub config_path: PathBuf,           // 配置表(SKU信息/工厂信息)
    pub template_path: Option<PathBuf>, // 不填则找程序同目录默认模板
    pub out_root: PathBuf,
    pub pickup_date: String,   // 预计提货日期
    pub time_tag: String,      // 文件名可选时间段
    pub product_tag: String,   // 文件名可选产品名
    pub operator_name: String, // 文件名前缀(姓名)
    pub split_supplier_folder: bool, // 是否按工厂建子文件夹
}

/// 一次拆分的产出与失败清单
#[derive(Debug, Default)]
pub struct SplitOutcome {
    pub outputs: Vec<PathBuf>,
    pub summary_path: Option<PathBuf>,
    pub failures: Vec<(String, String)>, // (供应商, 失败原因)
}

pub fn process_file(opts: &SplitOptions) -> SplitResult<SplitOutcome> {
    let date = parse_pickup_date(&opts.pickup_date)?;

    let grids = load_grids(&opts.source_path)?;
    let (sheet_name, header_row) = detect_sheet_and_header(&grids);
    info!("文件1命中 sheet「{}」,表头第 {} 行", sheet_name, header_row);
    let grid = grids
        .iter()
        .find(|g| g.name == sheet_name)
        .unwrap_or(&grids[0]);
    let table = SheetTable::from_grid(grid, header_row);

    let raw_groups = classify_direct_rows(&table)?;
    if raw_groups.is_empty() {
        info!("无工厂直发行,拆分结束");
        return Ok(SplitOutcome::default());
    }

    let mut config = load_config(&opts.config_path)?;
    let direct_view = SheetTable {
        headers: table.headers.clone(),
        rows: raw_groups
            .iter()
            .flat_map(|g| g.row_indexes.iter().map(|&i| table.rows[i].clone()))
            .collect(),
    };
    merge_missing_skus(&mut config.catalog, &direct_view);

    let template_path = resolve_template_path(opts.template_path.as_deref())?;
    let cols = DetailColumns::resolve(&table);

    let out_base = opts.out_root.join(direct_folder_name(&date));
    std::fs::create_dir_all(&out_base)?;

    let mut outcome = SplitOutcome::default();
    let total = raw_groups.len();
    for (i, raw) in raw_groups.iter().enumerate() {
        let result = (|| -> SplitResult<PathBuf> {
            let group = build_group(&table, raw, &cols, &config.catalog, &config.factories)?;
            let folder = if opts.split_supplier_folder {
                out_base.join(&group.factory_folder_name)
            } else {
                out_base.clone()
            };
            std::fs::create_dir_all(&folder)?;
            write_group_workbook(&template_path, &folder, &group, opts, &date, &config)
        })();
        match result {
            Ok(path) => {
                info!("[{}/{}] {} -> {}", i + 1, total, raw.supplier, path.display());
                outcome.outputs.push(path);
            }
            Err(e) => {
                error!("[{}/{}] 供应商「{}」拆分失败: {}", i + 1, total, raw.supplier, e);
                outcome.failures.push((raw.supplier.clone(), e.to_string()));
            }
        }
    }

    // 中仓汇总表失败只告警
    match other_partition_rows(&table) {
        Ok(keep) if !keep.is_empty() => {
            let sum_path = unique_path(out_base.join(summary_file_name(&date)));
            match export_summary(
                &opts.source_path,
                &sheet_name,
                header_row,
                &table,
                &keep,
                &sum_path,
            ) {
                Ok(()) => outcome.summary_path = Some(sum_path),
                Err(e) => warn!("汇总表生成失败: {}", e),
            }
        }
        Ok(_) => info!("中仓行为空,不生成汇总表"),
        Err(e) => warn!("汇总表生成失败: {}", e),
    }

    Ok(outcome)
}

fn write_group_workbook(
    template_path: &Path,
    folder: &Path,
    group: &SupplierGroup,
    opts: &SplitOptions,
    date: &super::naming::PickupDate,
    config: &crate::importer::ConfigBook,
) -> SplitResult<PathBuf> {
    let mut wb = TemplateWorkbook::open(template_path)?;

    let sku_set: HashSet<String> = group
        .rows
        .iter()
        .map(|r| r.sku.clone())
        .filter(|s| !s.is_empty())
        .collect();
    wb.write_match_sheet(&config.catalog.subset(&sku_set))?;
    wb.rebuild_main_sheet(group, &date.cell)?;

    let filename = build_output_filename(
        &opts.operator_name,
        date,
        &opts.time_tag,
        &opts.product_tag,
        &group.supplier_short_name,
    );
    let out_path = unique_path(folder.join(filename));
    wb.save(&out_path)?;
    Ok(out_path)
}
