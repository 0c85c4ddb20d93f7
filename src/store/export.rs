// ==========================================
// 打包运营工作台 - CSV 导出
// ==========================================
// 职责: 订单列表 → 固定 17 列 CSV 文本
// 口径: 所有单元格加引号,内嵌引号翻倍,行分隔符 \n
// ==========================================

use crate::domain::order::PackingOrder;
use crate::store::error::{StoreError, StoreResult};
use chrono::Local;
use csv::{QuoteStyle, Terminator, WriterBuilder};

/// 固定导出表头(17 列,顺序不可变)
pub const EXPORT_HEADERS: [&str; 17] = [
    "Order Number",
    "Product",
    "Variant",
    "Color",
    "Status",
    "Packer",
    "Customer",
    "SKU",
    "Quantity",
    "Main Photo",
    "Main Photo Status",
    "Polaroids",
    "Polaroid Count",
    "Engraving Type",
    "Engraving Value",
    "Packed At",
    "Notes",
];

/// 序列化给定订单列表为 CSV 文本
///
/// # 口径
/// - 缺失字段输出空串
/// - 附图列表以 "; " 连接
/// - 打包时间输出 ISO-8601
pub fn export_to_csv(orders: &[PackingOrder]) -> StoreResult<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADERS)?;

    for order in orders {
        let quantity = order.quantity.to_string();
        let polaroids = order.polaroids.join("; ");
        let polaroid_count = order.polaroid_count.to_string();
        let packed_at = order
            .packed_at
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();

        writer.write_record([
            order.order_number.as_deref().unwrap_or(""),
            order.product_name.as_deref().unwrap_or(""),
            order.variant.as_deref().unwrap_or(""),
            order.color.as_deref().unwrap_or(""),
            order.status.as_str(),
            order.packer.as_deref().unwrap_or(""),
            order.customer.as_deref().unwrap_or(""),
            order.sku.as_deref().unwrap_or(""),
            quantity.as_str(),
            order.main_photo.as_deref().unwrap_or(""),
            order.main_photo_status.as_str(),
            polaroids.as_str(),
            polaroid_count.as_str(),
            order.back_engraving_type.as_deref().unwrap_or(""),
            order.back_engraving_value.as_deref().unwrap_or(""),
            packed_at.as_str(),
            order.notes.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| StoreError::ExportError(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| StoreError::ExportError(e.to_string()))
}

/// 建议导出文件名: {前缀}_filtered_{YYYY-MM-DD}_{HH-MM-SS}.csv
pub fn export_filename(prefix: &str) -> String {
    format!(
        "{}_filtered_{}.csv",
        prefix,
        Local::now().format("%Y-%m-%d_%H-%M-%S")
    )
}
