// ==========================================
// 工厂提货明细表自动拆分系统 - 核心库
// ==========================================
// 系统定位: 把线上取回的发货明细按供应商拆成
//           带公式的提货明细表,并可选下载FBA箱唛
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 配置与货件模型
pub mod domain;

// 表格读取层 - calamine 网格与列名解析
pub mod sheet;

// 匹配层 - 供应商短名与工厂地址模糊匹配
pub mod matching;

// 导入层 - 配置表/发货明细表解析
pub mod importer;

// 引擎层 - 模板实例化/汇总导出/总调度
pub mod engine;

// 箱唛层 - 积加FBA箱唛下载
pub mod labels;

// 错误类型
pub mod error;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{FactoryDirectory, ShipmentRow, SkuCatalog, SkuConfigEntry, SupplierGroup};

// 错误
pub use error::{SplitError, SplitResult};

// 引擎
pub use engine::{process_file, PickupDate, SplitOptions, SplitOutcome, TemplateWorkbook};

// 箱唛
pub use labels::{LabelAuth, LabelClientConfig, LabelError, LabelResult, LabelSession};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "工厂提货明细表自动拆分";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
