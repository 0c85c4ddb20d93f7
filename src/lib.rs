// ==========================================
// 打包运营工作台 - 核心库
// ==========================================
// 职责: 订单打包单的导入、对账与本地仓储
// 系统定位: 客户端侧单线程引擎(上游文件选择器/下游渲染均为外部协作方)
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 外部打包单
pub mod importer;

// 仓储层 - 订单集合与持久化
pub mod store;

// 日志系统
pub mod logging;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    ColumnMap, ImportReport, MainPhotoStatus, OrderFilters, OrderPage, OrderPatch, OrderSort,
    OrderStats, OrderStatus, PackingOrder, SkippedValue, SortDirection, SortField, UniqueField,
};

// 导入层
pub use importer::{
    ImportError, ImportOutput, PackingImporter, UniversalSheetParser, UploadedFile, MAX_FILE_SIZE,
};

// 仓储层
pub use store::{
    export_filename, export_to_csv, MemoryStateStore, OrderStore, SqliteStateStore, StateStore,
    StoreError,
};
