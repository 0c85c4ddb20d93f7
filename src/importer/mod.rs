// ==========================================
// 打包运营工作台 - 导入层
// ==========================================
// 职责: 外部打包单导入,生成内部订单记录
// 支持: CSV / Excel / ODS
// 红线: 导入层为纯转换管道,不访问仓储与网络
// ==========================================

// 模块声明
pub mod column_classifier;
pub mod error;
pub mod file_parser;
pub mod packing_importer;
pub mod packing_importer_trait;
pub mod record_builder;

// 重导出核心类型
pub use column_classifier::ColumnClassifier;
pub use error::{ImportError, ImportResult, MAX_FILE_SIZE};
pub use file_parser::{DelimitedSheetParser, SpreadsheetParser, UniversalSheetParser};
pub use packing_importer::{ImportOutput, PackingImporter};
pub use record_builder::RecordBuilder;

// 重导出 Trait 接口
pub use packing_importer_trait::{
    BuildOutcome, HeaderClassifier, OrderRecordBuilder, SheetGrid, SheetParser, UploadedFile,
};
