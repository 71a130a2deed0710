// ==========================================
// 工厂提货明细拆分系统 - 表格读取层
// ==========================================

pub mod columns;
pub mod grid;
pub mod table;

pub use columns::{choose_best_numeric_col, find_col, find_col_exact, require_col};
pub use grid::{detect_sheet_and_header, load_grids, SheetGrid};
pub use table::{parse_number, SheetTable};
