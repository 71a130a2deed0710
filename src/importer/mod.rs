// ==========================================
// 工厂提货明细拆分系统 - 导入层
// ==========================================
// 读取配置表与发货明细表,产出供应商分组
// ==========================================

pub mod classifier;
pub mod config_loader;
pub mod quantity;
pub mod row_builder;

pub use classifier::{
    classify_direct_rows, find_channel_col, is_amazon_channel, is_factory_direct,
    RawSupplierRows,
};
pub use config_loader::{load_config, merge_missing_skus, ConfigBook};
pub use quantity::{build_id_carton_map, read_fba_ids};
pub use row_builder::{build_group, DetailColumns};
