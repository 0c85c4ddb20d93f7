// ==========================================
// 打包运营工作台 - 查询领域模型
// ==========================================
// 职责: 订单视图的过滤/排序/分页/统计参数与结果类型
// 红线: 过滤为全条件合取;排序时缺失值恒排在有值之后(与方向无关)
// ==========================================

use crate::domain::order::PackingOrder;
use crate::domain::types::{OrderStatus, SortDirection};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// 精确匹配过滤器的"不限"哨兵值
pub const FILTER_ALL: &str = "all";

// ==========================================
// OrderFilters - 过滤条件(合取)
// ==========================================
// 说明: None 或哨兵值 "all" 均表示该维度不限
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilters {
    /// 子串搜索(不区分大小写): 单号/商品/款式/客户/SKU
    pub search: Option<String>,
    /// 精确匹配: 打包状态
    pub status: Option<String>,
    /// 精确匹配: 打包人
    pub packer: Option<String>,
    /// 精确匹配: SKU
    pub sku: Option<String>,
    /// 精确匹配: 款式
    pub variant: Option<String>,
}

impl OrderFilters {
    /// 判断精确匹配过滤值是否生效(None / "all" 不生效)
    pub fn is_active(value: &Option<String>) -> bool {
        match value {
            Some(v) => v != FILTER_ALL,
            None => false,
        }
    }
}

// ==========================================
// SortField - 可排序字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    OrderNumber,
    ProductName,
    Variant,
    Color,
    Sku,
    Quantity,
    Customer,
    Status,
    Packer,
    PackedAt,
    MainPhotoStatus,
    PolaroidCount,
    Notes,
}

/// 排序取值(同一字段恒为同一变体,跨变体比较视为相等)
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Text(String),
    Int(i64),
    Time(DateTime<Utc>),
}

impl SortValue {
    /// 同类取值比较
    pub fn compare(&self, other: &SortValue) -> Ordering {
        match (self, other) {
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            (SortValue::Int(a), SortValue::Int(b)) => a.cmp(b),
            (SortValue::Time(a), SortValue::Time(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl SortField {
    /// 提取订单上的排序取值; None 表示该订单此字段缺失
    pub fn value_of(&self, order: &PackingOrder) -> Option<SortValue> {
        match self {
            SortField::OrderNumber => order.order_number.clone().map(SortValue::Text),
            SortField::ProductName => order.product_name.clone().map(SortValue::Text),
            SortField::Variant => order.variant.clone().map(SortValue::Text),
            SortField::Color => order.color.clone().map(SortValue::Text),
            SortField::Sku => order.sku.clone().map(SortValue::Text),
            SortField::Quantity => Some(SortValue::Int(order.quantity as i64)),
            SortField::Customer => order.customer.clone().map(SortValue::Text),
            SortField::Status => Some(SortValue::Text(order.status.as_str().to_string())),
            SortField::Packer => order.packer.clone().map(SortValue::Text),
            SortField::PackedAt => order.packed_at.map(SortValue::Time),
            SortField::MainPhotoStatus => {
                Some(SortValue::Text(order.main_photo_status.as_str().to_string()))
            }
            SortField::PolaroidCount => Some(SortValue::Int(order.polaroid_count as i64)),
            SortField::Notes => order.notes.clone().map(SortValue::Text),
        }
    }
}

// ==========================================
// OrderSort - 排序参数
// ==========================================
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSort {
    pub field: SortField,
    pub direction: SortDirection,
}

// ==========================================
// OrderPage - 分页查询结果
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPage {
    /// 当前页数据(过滤+排序后截取)
    pub orders: Vec<PackingOrder>,
    /// 过滤后总记录数
    pub total: usize,
    /// 总页数(total=0 时为 0)
    pub total_pages: usize,
    /// 当前页码(1 起)
    pub current_page: usize,
    /// 每页记录数
    pub page_size: usize,
}

// ==========================================
// UniqueField - 去重取值字段
// ==========================================
// 用途: 前端过滤下拉框的候选值来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UniqueField {
    Status,
    Packer,
    Sku,
    Variant,
    Color,
    Customer,
}

impl UniqueField {
    /// 提取订单上的字符串取值(派生口径: 状态取序列化标识)
    pub fn value_of(&self, order: &PackingOrder) -> Option<String> {
        match self {
            UniqueField::Status => Some(order.status.as_str().to_string()),
            UniqueField::Packer => order.packer.clone(),
            UniqueField::Sku => order.sku.clone(),
            UniqueField::Variant => order.variant.clone(),
            UniqueField::Color => order.color.clone(),
            UniqueField::Customer => order.customer.clone(),
        }
    }
}

// ==========================================
// OrderStats - 状态统计
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStats {
    pub total: usize,
    pub pending: usize,
    pub packed: usize,
    pub dispute: usize,
    pub missing_photo: usize,
    pub invalid: usize,
    /// 已打包占比(四舍五入到整数百分比,total=0 时为 0)
    pub packed_percentage: u32,
}

impl OrderStats {
    /// 对一组订单计数
    pub fn from_orders(orders: &[PackingOrder]) -> Self {
        let mut stats = OrderStats {
            total: orders.len(),
            ..Default::default()
        };

        for order in orders {
            match order.status {
                OrderStatus::Pending => stats.pending += 1,
                OrderStatus::Packed => stats.packed += 1,
                OrderStatus::Dispute => stats.dispute += 1,
                OrderStatus::MissingPhoto => stats.missing_photo += 1,
                OrderStatus::Invalid => stats.invalid += 1,
            }
        }

        stats.packed_percentage = if stats.total == 0 {
            0
        } else {
            ((stats.packed as f64 / stats.total as f64) * 100.0).round() as u32
        };

        stats
    }
}
