// ==========================================
// 打包运营工作台 - 导入编排器实现
// ==========================================
// 职责: 整合导入管道,从上传文件到订单批次
// 流程: 格式嗅探 → 列分类 → 记录构建 → 汇总报告
// 红线: 不触碰仓储;整批构建完成前不产出任何订单(调用方决定落库时机)
// ==========================================

use crate::domain::order::{ImportReport, PackingOrder};
use crate::domain::types::OrderStatus;
use crate::importer::column_classifier::ColumnClassifier;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::UniversalSheetParser;
use crate::importer::packing_importer_trait::{
    HeaderClassifier, OrderRecordBuilder, SheetParser, UploadedFile,
};
use crate::importer::record_builder::RecordBuilder;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

// ==========================================
// ImportOutput - 单次导入产出
// ==========================================
#[derive(Debug, Clone)]
pub struct ImportOutput {
    /// 构建完成的订单(保持源行顺序)
    pub orders: Vec<PackingOrder>,
    /// 导入汇总
    pub report: ImportReport,
}

// ==========================================
// PackingImporter - 打包单导入编排器
// ==========================================
pub struct PackingImporter {
    sheet_parser: Box<dyn SheetParser>,
    header_classifier: Box<dyn HeaderClassifier>,
    record_builder: Box<dyn OrderRecordBuilder>,
}

impl PackingImporter {
    /// 注入各阶段组件(测试时可替换)
    pub fn new(
        sheet_parser: Box<dyn SheetParser>,
        header_classifier: Box<dyn HeaderClassifier>,
        record_builder: Box<dyn OrderRecordBuilder>,
    ) -> Self {
        Self {
            sheet_parser,
            header_classifier,
            record_builder,
        }
    }

    /// 缺省装配: 扩展名自动分流 + 内置列规则 + 标准构建器
    pub fn with_defaults() -> Self {
        Self::new(
            Box::new(UniversalSheetParser),
            Box::new(ColumnClassifier::new()),
            Box::new(RecordBuilder),
        )
    }

    /// 导入上传文件(主入口)
    ///
    /// # 流程
    /// 1. 格式嗅探与网格提取(含大小校验)
    /// 2. 表头列分类
    /// 3. 逐行构建订单(行级问题折算进状态)
    /// 4. 生成汇总报告
    ///
    /// # 错误
    /// - 仅文件级失败(超限/解析失败/空文件)返回 Err,此时不产出任何订单
    #[instrument(skip(self, file), fields(file_name = %file.name, file_size = file.size()))]
    pub fn import(&self, file: &UploadedFile) -> ImportResult<ImportOutput> {
        let start_time = Instant::now();
        info!("开始导入打包单");

        // === 阶段 0: 格式嗅探与网格提取 ===
        let grid = self.sheet_parser.parse_grid(file)?;
        let total_rows = grid.len() - 1;
        debug!(total_rows, "网格提取完成");

        // === 阶段 1: 表头列分类 ===
        let columns = self.header_classifier.classify(&grid[0]);
        debug!(?columns, "列分类完成");

        // === 阶段 2: 记录构建 ===
        let outcome = self.record_builder.build_records(&grid[1..], &columns);

        if !outcome.skipped_values.is_empty() {
            warn!(
                count = outcome.skipped_values.len(),
                "附图取值未通过 URL 校验,已丢弃"
            );
        }

        // === 阶段 3: 汇总报告 ===
        let invalid = outcome
            .orders
            .iter()
            .filter(|o| o.status == OrderStatus::Invalid)
            .count();
        let missing_photo = outcome
            .orders
            .iter()
            .filter(|o| o.status == OrderStatus::MissingPhoto)
            .count();

        let report = ImportReport {
            total_rows,
            built: outcome.orders.len(),
            skipped_blank: outcome.skipped_blank,
            invalid,
            missing_photo,
            skipped_values: outcome.skipped_values,
            elapsed_ms: start_time.elapsed().as_millis() as i64,
        };

        info!(
            built = report.built,
            invalid = report.invalid,
            missing_photo = report.missing_photo,
            elapsed_ms = report.elapsed_ms,
            "打包单导入完成"
        );

        Ok(ImportOutput {
            orders: outcome.orders,
            report,
        })
    }
}

impl Default for PackingImporter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_file(content: &str) -> UploadedFile {
        UploadedFile::new("orders.csv", content.as_bytes().to_vec())
    }

    #[test]
    fn test_import_end_to_end_row_conservation() {
        let importer = PackingImporter::with_defaults();
        let file = csv_file(
            "Order Number,Product Name,Main Photo\n\
             SO-1,挂坠,https://cdn.example.com/1.jpg\n\
             SO-2,手链,https://cdn.example.com/2.jpg\n\
             ,,\n\
             SO-3,戒指,\n",
        );

        let output = importer.import(&file).unwrap();

        // 行数守恒: 4 行原始数据,1 行空白,产出 3 条
        assert_eq!(output.report.total_rows, 4);
        assert_eq!(output.report.skipped_blank, 1);
        assert_eq!(output.orders.len(), 3);

        // 源行顺序保持
        assert_eq!(output.orders[0].order_number.as_deref(), Some("SO-1"));
        assert_eq!(output.orders[2].order_number.as_deref(), Some("SO-3"));
        assert_eq!(output.report.missing_photo, 1);
    }

    #[test]
    fn test_import_semicolon_delimited() {
        let importer = PackingImporter::with_defaults();
        let file = csv_file(
            "Order Number;Product Name;Main Photo;SKU;Quantity\n\
             SO-1;挂坠;https://cdn.example.com/1.jpg;P-01;3\n",
        );

        let output = importer.import(&file).unwrap();
        assert_eq!(output.orders.len(), 1);
        assert_eq!(output.orders[0].sku.as_deref(), Some("P-01"));
        assert_eq!(output.orders[0].quantity, 3);
    }

    #[test]
    fn test_import_empty_file_is_error() {
        let importer = PackingImporter::with_defaults();
        let file = csv_file("Order Number,Product Name\n");
        assert!(importer.import(&file).is_err());
    }
}
