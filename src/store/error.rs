// ==========================================
// 打包运营工作台 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 未知 id 的更新/删除是静默无操作,不是错误
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    // ===== 持久化错误 =====
    #[error("持久化读写失败: {0}")]
    PersistenceError(String),

    #[error("状态序列化失败: {0}")]
    SerializationError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("锁获取失败: {0}")]
    LockError(String),

    // ===== 导出错误 =====
    #[error("CSV 导出失败: {0}")]
    ExportError(String),
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::PersistenceError(err.to_string())
    }
}

// 实现 From<serde_json::Error>
impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::SerializationError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for StoreError {
    fn from(err: csv::Error) -> Self {
        StoreError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type StoreResult<T> = Result<T, StoreError>;
