// ==========================================
// 工厂提货明细拆分系统 - 核心错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 拆分主流程错误类型
///
/// 所有致命错误都携带足够的上下文（哪个文件/sheet/列），
/// 让操作人员不看源码也能修正输入。
#[derive(Error, Debug)]
pub enum SplitError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("Excel 读取失败: {0}")]
    ExcelRead(String),

    #[error("Excel 写入失败: {0}")]
    ExcelWrite(String),

    #[error("文件读写失败: {0}")]
    FileIo(String),

    // ===== 表结构错误 =====
    #[error("找不到必要列: {column}。请确认文件表头是否一致。")]
    ColumnNotFound { column: String },

    #[error("{file} 缺少 sheet: {sheet}")]
    SheetNotFound { file: String, sheet: String },

    // ===== 配置/模板错误 =====
    #[error("找不到模板文件。请指定模板路径，或把模板放到程序同目录并命名为: {0}")]
    TemplateNotFound(String),

    // ===== 日期错误 =====
    #[error("日期格式错误: {0}。请用 YYYY-MM-DD / YYYY/MM/DD / YYYY.MM.DD（例如 2025/12/13）")]
    DateParse(String),

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    Internal(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for SplitError {
    fn from(err: std::io::Error) -> Self {
        SplitError::FileIo(err.to_string())
    }
}

impl From<calamine::XlsxError> for SplitError {
    fn from(err: calamine::XlsxError) -> Self {
        SplitError::ExcelRead(err.to_string())
    }
}

impl From<umya_spreadsheet::XlsxError> for SplitError {
    fn from(err: umya_spreadsheet::XlsxError) -> Self {
        SplitError::ExcelWrite(err.to_string())
    }
}

/// Result 类型别名
pub type SplitResult<T> = Result<T, SplitError>;
