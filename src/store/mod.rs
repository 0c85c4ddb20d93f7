// ==========================================
// 打包运营工作台 - 仓储层
// ==========================================
// 职责: 订单集合持有、持久化、查询与导出
// 红线: 仓储不含导入逻辑;持久化后端通过 trait 注入
// ==========================================

// 模块声明
pub mod error;
pub mod export;
pub mod order_store;
pub mod state_store;

// 重导出核心类型
pub use error::{StoreError, StoreResult};
pub use export::{export_filename, export_to_csv, EXPORT_HEADERS};
pub use order_store::{ListenerId, OrderStore};
pub use state_store::{
    MemoryStateStore, SqliteStateStore, StateStore, ORDERS_SLOT, UPDATED_AT_SLOT,
};
