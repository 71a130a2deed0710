// ==========================================
// 工厂提货明细拆分系统 - 箱唛下载错误
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LabelError {
    #[error("箱唛接口请求失败: {0}")]
    Http(#[from] reqwest::Error),

    #[error("箱唛接口返回异常 HTTP={status}: {body}")]
    Api { status: u16, body: String },

    #[error("FBA查询有返回,但未匹配到可打印任务")]
    NoPrintableTasks,

    #[error("等待下载ZIP超时(传输中心未出现本次新增 FBA_SHIPMENT_*.zip)")]
    DownloadTimeout,

    #[error("下载URL返回为空")]
    EmptyDownloadUrl,

    #[error("读取拆分文件失败: {0}")]
    Workbook(#[from] crate::error::SplitError),

    #[error("箱唛文件写入失败: {0}")]
    Io(#[from] std::io::Error),
}

pub type LabelResult<T> = Result<T, LabelError>;
