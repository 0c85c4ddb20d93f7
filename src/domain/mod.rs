// ==========================================
// 打包运营工作台 - 领域层
// ==========================================
// 职责: 实体、枚举与查询类型定义
// 红线: 领域层不做 I/O,不依赖导入层与仓储层
// ==========================================

pub mod order;
pub mod query;
pub mod types;

// 重导出核心类型
pub use order::{ColumnMap, ImportReport, OrderPatch, PackingOrder, SkippedValue};
pub use query::{
    OrderFilters, OrderPage, OrderSort, OrderStats, SortField, SortValue, UniqueField, FILTER_ALL,
};
pub use types::{MainPhotoStatus, OrderStatus, SortDirection};
