// ==========================================
// 打包运营工作台 - 记录构建与校验实现
// ==========================================
// 职责: 原始数据行 → PackingOrder,含类型转换与派生字段计算
// 红线: 行级问题不抛错,折算进订单状态;附图解析失败静默降级为空列表
// 派生顺序: main_photo_status → polaroid_count → status
// ==========================================

use crate::domain::order::{ColumnMap, PackingOrder, SkippedValue};
use crate::domain::types::OrderStatus;
use crate::importer::packing_importer_trait::{BuildOutcome, OrderRecordBuilder};
use serde_json::Value;
use uuid::Uuid;

/// 附图单元格内的候选分隔符,按查找顺序
const POLAROID_DELIMITERS: [char; 4] = [',', ';', '|', '\n'];

pub struct RecordBuilder;

impl RecordBuilder {
    /// 取指定列的单元格值: 列号有效且修剪后非空才返回
    fn cell(row: &[String], index: Option<usize>) -> Option<String> {
        let idx = index?;
        let raw = row.get(idx)?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// 数量解析: 整数,缺失或无法解析时缺省为 1
    fn parse_quantity(row: &[String], index: Option<usize>) -> u32 {
        Self::cell(row, index)
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(1)
    }

    /// 附图单元格解析
    ///
    /// # 优先级
    /// 1. JSON 数组 → 逐项做 URL 校验
    /// 2. 按第一个出现的分隔符(, ; | 换行)切分 → 逐段修剪并做 URL 校验
    /// 3. 整体即是一个合法 URL → 单元素列表
    /// 4. 以上都不是 → 空列表(不报错)
    ///
    /// # 返回
    /// - (保留的 URL 列表, 被校验丢弃的取值)
    fn parse_polaroids(raw: &str) -> (Vec<String>, Vec<String>) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return (Vec::new(), Vec::new());
        }

        let mut kept = Vec::new();
        let mut skipped = Vec::new();

        // 1. JSON 数组
        if let Ok(Value::Array(items)) = serde_json::from_str::<Value>(trimmed) {
            for item in items {
                match item.as_str() {
                    Some(s) if PackingOrder::is_valid_photo_url(s) => {
                        kept.push(s.trim().to_string());
                    }
                    Some(s) => skipped.push(s.to_string()),
                    None => skipped.push(item.to_string()),
                }
            }
            return (kept, skipped);
        }

        // 2. 第一个出现的分隔符
        if let Some(delimiter) = POLAROID_DELIMITERS
            .iter()
            .copied()
            .find(|d| trimmed.contains(*d))
        {
            for piece in trimmed.split(delimiter) {
                let piece = piece.trim();
                if piece.is_empty() {
                    continue;
                }
                if PackingOrder::is_valid_photo_url(piece) {
                    kept.push(piece.to_string());
                } else {
                    skipped.push(piece.to_string());
                }
            }
            return (kept, skipped);
        }

        // 3. 整体即单个 URL
        if PackingOrder::is_valid_photo_url(trimmed) {
            return (vec![trimmed.to_string()], Vec::new());
        }

        (Vec::new(), vec![trimmed.to_string()])
    }

    /// 构建单行订单;行内所有单元格空白时返回 None
    fn build_one(row: &[String], columns: &ColumnMap, skipped: &mut Vec<String>) -> Option<PackingOrder> {
        // 整行空白 → 跳过(不计为 invalid)
        if row.iter().all(|v| v.trim().is_empty()) {
            return None;
        }

        let order_number = Self::cell(row, columns.order_number);
        let product_name = Self::cell(row, columns.product_name);
        let main_photo = Self::cell(row, columns.main_photo);

        let (polaroids, dropped) = match Self::cell(row, columns.polaroids) {
            Some(raw) => Self::parse_polaroids(&raw),
            None => (Vec::new(), Vec::new()),
        };
        skipped.extend(dropped);

        let mut order = PackingOrder {
            id: Uuid::new_v4().to_string(),
            order_number,
            product_name,
            variant: Self::cell(row, columns.variant),
            color: Self::cell(row, columns.color),
            sku: Self::cell(row, columns.sku),
            quantity: Self::parse_quantity(row, columns.quantity),
            customer: Self::cell(row, columns.customer),
            notes: Self::cell(row, columns.notes),
            main_photo,
            polaroids,
            back_engraving_type: Self::cell(row, columns.back_engraving_type),
            back_engraving_value: Self::cell(row, columns.back_engraving_value),
            main_photo_status: crate::domain::types::MainPhotoStatus::Missing,
            polaroid_count: 0,
            status: OrderStatus::Pending,
            packer: Self::cell(row, columns.packer),
            packed_at: None,
        };

        // 派生字段按固定顺序计算
        order.recompute_derived();
        order.status = Self::resolve_status(&order);

        Some(order)
    }

    /// 状态判定
    ///
    /// # 规则(优先级从高到低)
    /// - 单号或商品名缺失 → Invalid(终态,优先于缺图)
    /// - 主图状态 Missing → MissingPhoto
    /// - 其余 → Pending
    fn resolve_status(order: &PackingOrder) -> OrderStatus {
        if order.order_number.is_none() || order.product_name.is_none() {
            return OrderStatus::Invalid;
        }
        if order.main_photo_status == crate::domain::types::MainPhotoStatus::Missing {
            return OrderStatus::MissingPhoto;
        }
        OrderStatus::Pending
    }
}

impl OrderRecordBuilder for RecordBuilder {
    fn build_records(&self, rows: &[Vec<String>], columns: &ColumnMap) -> BuildOutcome {
        let mut outcome = BuildOutcome::default();

        for (row_idx, row) in rows.iter().enumerate() {
            let mut dropped = Vec::new();
            match Self::build_one(row, columns, &mut dropped) {
                Some(order) => outcome.orders.push(order),
                None => outcome.skipped_blank += 1,
            }
            outcome.skipped_values.extend(
                dropped
                    .into_iter()
                    .map(|value| SkippedValue { row: row_idx + 1, value }),
            );
        }

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::MainPhotoStatus;

    fn columns() -> ColumnMap {
        ColumnMap {
            order_number: Some(0),
            product_name: Some(1),
            main_photo: Some(2),
            polaroids: Some(3),
            quantity: Some(4),
            ..Default::default()
        }
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_basic_row_builds_pending_order() {
        let rows = vec![row(&["SO-1", "挂坠", "https://cdn.example.com/x.jpg", "", "2"])];
        let outcome = RecordBuilder.build_records(&rows, &columns());

        assert_eq!(outcome.orders.len(), 1);
        let order = &outcome.orders[0];
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.main_photo_status, MainPhotoStatus::Success);
        assert_eq!(order.quantity, 2);
        assert!(!order.id.is_empty());
    }

    #[test]
    fn test_blank_rows_skipped_not_counted_invalid() {
        let rows = vec![
            row(&["SO-1", "挂坠", "https://a.com/1.jpg", "", ""]),
            row(&["", "  ", "", "", ""]),
            row(&["SO-2", "手链", "https://a.com/2.jpg", "", ""]),
        ];
        let outcome = RecordBuilder.build_records(&rows, &columns());

        // 行数守恒: 输出 = 非空白行数
        assert_eq!(outcome.orders.len(), 2);
        assert_eq!(outcome.skipped_blank, 1);
    }

    #[test]
    fn test_invalid_takes_priority_over_photo_check() {
        // 只有合法主图,缺单号和商品名 → invalid,不是 missing-photo
        let rows = vec![row(&["", "", "https://x.com/a.jpg", "", ""])];
        let outcome = RecordBuilder.build_records(&rows, &columns());

        assert_eq!(outcome.orders.len(), 1);
        assert_eq!(outcome.orders[0].status, OrderStatus::Invalid);
    }

    #[test]
    fn test_missing_photo_status() {
        let rows = vec![
            row(&["SO-1", "挂坠", "", "", ""]),
            row(&["SO-2", "手链", "Missing Photo", "", ""]),
            row(&["SO-3", "戒指", "not-a-url", "", ""]),
        ];
        let outcome = RecordBuilder.build_records(&rows, &columns());

        assert_eq!(outcome.orders[0].status, OrderStatus::MissingPhoto);
        assert_eq!(outcome.orders[1].status, OrderStatus::MissingPhoto);
        // 非法 URL 不是缺图,保持 pending
        assert_eq!(outcome.orders[2].main_photo_status, MainPhotoStatus::Invalid);
        assert_eq!(outcome.orders[2].status, OrderStatus::Pending);
    }

    #[test]
    fn test_polaroids_comma_split() {
        let rows = vec![row(&[
            "SO-1",
            "挂坠",
            "https://a.com/m.jpg",
            "https://a.com/1.jpg,https://a.com/2.jpg",
            "",
        ])];
        let outcome = RecordBuilder.build_records(&rows, &columns());

        let order = &outcome.orders[0];
        assert_eq!(
            order.polaroids,
            vec!["https://a.com/1.jpg", "https://a.com/2.jpg"]
        );
        assert_eq!(order.polaroid_count, 2);
    }

    #[test]
    fn test_polaroids_json_array_filters_bad_entries() {
        let rows = vec![row(&[
            "SO-1",
            "挂坠",
            "https://a.com/m.jpg",
            r#"["https://a.com/1.jpg","bad"]"#,
            "",
        ])];
        let outcome = RecordBuilder.build_records(&rows, &columns());

        let order = &outcome.orders[0];
        assert_eq!(order.polaroids, vec!["https://a.com/1.jpg"]);
        assert_eq!(order.polaroid_count, 1);
        // 丢弃值进入诊断通道
        assert_eq!(outcome.skipped_values.len(), 1);
        assert_eq!(outcome.skipped_values[0].value, "bad");
    }

    #[test]
    fn test_polaroids_single_url() {
        let rows = vec![row(&["SO-1", "挂坠", "https://a.com/m.jpg", "https://a.com/1.jpg", ""])];
        let outcome = RecordBuilder.build_records(&rows, &columns());
        assert_eq!(outcome.orders[0].polaroids, vec!["https://a.com/1.jpg"]);
    }

    #[test]
    fn test_polaroids_garbage_degrades_to_empty() {
        let rows = vec![row(&["SO-1", "挂坠", "https://a.com/m.jpg", "乱七八糟", ""])];
        let outcome = RecordBuilder.build_records(&rows, &columns());

        assert!(outcome.orders[0].polaroids.is_empty());
        assert_eq!(outcome.orders[0].polaroid_count, 0);
        assert_eq!(outcome.skipped_values.len(), 1);
    }

    #[test]
    fn test_quantity_defaults_to_one() {
        let rows = vec![
            row(&["SO-1", "挂坠", "https://a.com/m.jpg", "", ""]),
            row(&["SO-2", "手链", "https://a.com/m.jpg", "", "abc"]),
        ];
        let outcome = RecordBuilder.build_records(&rows, &columns());

        assert_eq!(outcome.orders[0].quantity, 1);
        assert_eq!(outcome.orders[1].quantity, 1);
    }

    #[test]
    fn test_unmapped_fields_left_absent() {
        let rows = vec![row(&["SO-1", "挂坠", "https://a.com/m.jpg", "", ""])];
        let outcome = RecordBuilder.build_records(&rows, &columns());

        let order = &outcome.orders[0];
        assert_eq!(order.variant, None);
        assert_eq!(order.customer, None);
        assert_eq!(order.notes, None);
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let rows = vec![row(&[
            "SO-1",
            "挂坠",
            "https://a.com/m.jpg",
            "https://a.com/1.jpg;https://a.com/2.jpg",
            "",
        ])];
        let outcome = RecordBuilder.build_records(&rows, &columns());

        let mut order = outcome.orders[0].clone();
        let status_before = order.main_photo_status;
        let count_before = order.polaroid_count;
        order.recompute_derived();

        assert_eq!(order.main_photo_status, status_before);
        assert_eq!(order.polaroid_count, count_before);
    }
}
