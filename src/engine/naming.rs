// ==========================================
// 工厂提货明细拆分系统 - 路径与文件名
// ==========================================
// 职责: 提货日期解析、输出目录/文件名拼装、重名避让
// ==========================================

use crate::error::{SplitError, SplitResult};
use crate::matching::sanitize_filename;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};

pub const DEFAULT_TEMPLATE_NAME: &str = "工厂提货明细模板.xlsx";

/// 提货日期的两种书写
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupDate {
    pub cell: String,  // 写入单元格: YYYY/MM/DD
    pub fname: String, // 用于文件名: YYYY.MM.DD
    pub date: NaiveDate,
}

/// 接受 2026-08-30 / 2026/08/30 / 2026.08.30 / 2026年8月30日
pub fn parse_pickup_date(input: &str) -> SplitResult<PickupDate> {
    let s: String = input
        .trim()
        .replace('年', "-")
        .replace('月', "-")
        .replace('日', "")
        .replace(['.', '/'], "-");
    let parts: Vec<&str> = s.split('-').filter(|p| !p.is_empty()).collect();
    let err = || SplitError::DateParse(input.to_string());
    if parts.len() < 3 || parts[0].len() != 4 {
        return Err(err());
    }
    let y: i32 = parts[0].parse().map_err(|_| err())?;
    let m: u32 = parts[1].parse().map_err(|_| err())?;
    let d: u32 = parts[2].parse().map_err(|_| err())?;
    let date = NaiveDate::from_ymd_opt(y, m, d).ok_or_else(err)?;
    Ok(PickupDate {
        cell: date.format("%Y/%m/%d").to_string(),
        fname: date.format("%Y.%m.%d").to_string(),
        date,
    })
}

/// 输出根目录下的当次拆分目录: 直发{MMDD}
pub fn direct_folder_name(date: &PickupDate) -> String {
    format!("直发{}", date.date.format("%m%d"))
}

/// 汇总表文件名: 中仓{YYYYMMDD}.xlsx
pub fn summary_file_name(date: &PickupDate) -> String {
    format!("中仓{}.xlsx", date.date.format("%Y%m%d"))
}

/// 供应商工作簿文件名:
/// {姓名}-【{日期}[+{时间}][ + {产品}]+{供应商短名}】工厂提货明细表.xlsx
pub fn build_output_filename(
    operator_name: &str,
    date: &PickupDate,
    time_tag: &str,
    product_tag: &str,
    supplier_short: &str,
) -> String {
    let mut tag = date.fname.clone();
    let t = sanitize_filename(time_tag);
    let p = sanitize_filename(product_tag);
    if !t.is_empty() {
        tag.push('+');
        tag.push_str(&t);
    }
    if !p.is_empty() {
        // 时间存在时产品用 “ + ” 分隔
        let sep = if t.is_empty() { "+" } else { " + " };
        tag.push_str(sep);
        tag.push_str(&p);
    }
    tag.push('+');
    tag.push_str(supplier_short);
    format!(
        "{}-【{}】工厂提货明细表.xlsx",
        sanitize_filename(operator_name),
        tag
    )
}

/// 路径已存在时追加 (1)、(2)… 直到不冲突
pub fn unique_path(path: PathBuf) -> PathBuf {
    if !path.exists() {
        return path;
    }
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut k = 1u32;
    loop {
        let name = if ext.is_empty() {
            format!("{}({})", stem, k)
        } else {
            format!("{}({}).{}", stem, k, ext)
        };
        let candidate = parent.join(name);
        if !candidate.exists() {
            return candidate;
        }
        k += 1;
    }
}

/// 模板路径: 显式指定优先,否则找可执行文件同目录的默认模板
pub fn resolve_template_path(explicit: Option<&Path>) -> SplitResult<PathBuf> {
    if let Some(p) = explicit {
        if p.is_file() {
            return Ok(p.to_path_buf());
        }
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            let candidate = dir.join(DEFAULT_TEMPLATE_NAME);
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
    }
    Err(SplitError::TemplateNotFound(format!(
        "请显式指定模板,或把「{}」放到程序同目录",
        DEFAULT_TEMPLATE_NAME
    )))
}
