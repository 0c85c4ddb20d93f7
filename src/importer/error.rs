// ==========================================
// 打包运营工作台 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 行级数据问题不是错误,折算进订单状态;此处只定义文件级失败
// ==========================================

use thiserror::Error;

/// 单次导入允许的文件大小上限(20 MiB)
pub const MAX_FILE_SIZE: usize = 20 * 1024 * 1024;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件超出大小限制: {size} 字节(上限 {limit} 字节)")]
    SizeLimitExceeded { size: usize, limit: usize },

    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    // ===== 解析错误 =====
    #[error("文件解析失败: {0}")]
    ParseFailure(String),

    #[error("文件无数据行(去除表头后为空)")]
    EmptyFile,

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ParseFailure(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
