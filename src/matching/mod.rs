// ==========================================
// 工厂提货明细拆分系统 - 名称匹配层
// ==========================================
// 职责: 名称归一化 + 工厂模糊匹配
// 纯函数,无 I/O
// ==========================================

pub mod fuzzy;
pub mod normalize;

pub use fuzzy::{match_factory_address, match_factory_name};
pub use normalize::{norm_key, sanitize_filename, supplier_short_name};
