// ==========================================
// 工厂提货明细拆分系统 - FBA 箱唛下载
// ==========================================
// 拆分产物 -> 积加打印 -> 传输中心 ZIP
// ==========================================

pub mod client;
pub mod error;
pub mod rate_limiter;
pub mod workbook;

pub use client::{LabelAuth, LabelClientConfig, LabelSession};
pub use error::{LabelError, LabelResult};
pub use rate_limiter::{Clock, PrintRateLimiter, SystemClock, DEFAULT_PRINT_COOLDOWN};
pub use workbook::{read_label_request, LabelRequest};
