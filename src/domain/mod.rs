// ==========================================
// 工厂提货明细拆分系统 - 领域模型层
// ==========================================
// 职责: 定义配置实体与货件实体
// 红线: 不含文件访问逻辑,不含拆分引擎逻辑
// ==========================================

pub mod config;
pub mod shipment;

// 重导出核心类型
pub use config::{FactoryDirectory, SkuCatalog, SkuConfigEntry};
pub use shipment::{ShipmentRow, SupplierGroup};
