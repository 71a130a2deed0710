// ==========================================
// 工厂提货明细拆分系统 - 拆分引擎
// ==========================================
// 模板实例化、汇总导出、路径命名、总调度
// ==========================================

pub mod exporter;
pub mod formula;
pub mod naming;
pub mod orchestrator;
pub mod template;

pub use naming::{parse_pickup_date, resolve_template_path, PickupDate, DEFAULT_TEMPLATE_NAME};
pub use orchestrator::{process_file, SplitOptions, SplitOutcome};
pub use template::{TemplateWorkbook, MAIN_SHEET, MATCH_SHEET};
