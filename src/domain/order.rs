// ==========================================
// 打包运营工作台 - 订单领域模型
// ==========================================
// 职责: 打包订单实体 + 导入中间结构 + 派生字段口径
// 红线: 派生字段(main_photo_status/polaroid_count)只能重算,不接受外部直接赋值
// ==========================================

use crate::domain::types::{MainPhotoStatus, OrderStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

/// 主图占位文本(不区分大小写),视同缺图
const MISSING_PHOTO_PLACEHOLDER: &str = "missing photo";

// ==========================================
// PackingOrder - 打包订单(单件商品一条)
// ==========================================
// 用途: 导入层构建,仓储层持有,前端只读消费
// 说明: 持久化为 JSON,字段名与前端口径一致(camelCase)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingOrder {
    // ===== 标识 =====
    pub id: String,                  // 导入时生成的 UUID v4,生命周期内不变
    pub order_number: Option<String>, // 业务单号(跨批次不保证唯一)

    // ===== 商品描述 =====
    pub product_name: Option<String>, // 商品名称
    pub variant: Option<String>,      // 款式/规格
    pub color: Option<String>,        // 颜色
    pub sku: Option<String>,          // SKU
    pub quantity: u32,                // 数量(缺省 1)
    pub customer: Option<String>,     // 客户
    pub notes: Option<String>,        // 备注

    // ===== 媒体引用 =====
    pub main_photo: Option<String>,        // 主图 URL
    pub polaroids: Vec<String>,            // 拍立得附图 URL 列表(有序)
    pub back_engraving_type: Option<String>,  // 背面刻字类型
    pub back_engraving_value: Option<String>, // 背面刻字内容

    // ===== 派生字段(导入时计算,更新时重算)=====
    pub main_photo_status: MainPhotoStatus, // 主图校验状态
    pub polaroid_count: usize,              // 恒等于 polaroids.len()

    // ===== 工作流 =====
    pub status: OrderStatus, // 打包状态

    // ===== 操作痕迹 =====
    pub packer: Option<String>,            // 打包人(置为 packed 时记录)
    pub packed_at: Option<DateTime<Utc>>,  // 打包时间(置为 packed 时记录,离开 packed 不清除)
}

impl PackingOrder {
    /// 主图校验口径
    ///
    /// # 规则
    /// - 空白 / 占位文本 "missing photo"(不区分大小写)→ Missing
    /// - http/https 绝对 URL → Success
    /// - 其余(相对路径/裸文件名/其他 scheme)→ Invalid
    pub fn derive_main_photo_status(main_photo: Option<&str>) -> MainPhotoStatus {
        match main_photo {
            None => MainPhotoStatus::Missing,
            Some(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty()
                    || trimmed.eq_ignore_ascii_case(MISSING_PHOTO_PLACEHOLDER)
                {
                    MainPhotoStatus::Missing
                } else if Self::is_valid_photo_url(trimmed) {
                    MainPhotoStatus::Success
                } else {
                    MainPhotoStatus::Invalid
                }
            }
        }
    }

    /// URL 合法性口径: 必须是 http/https 绝对 URL
    pub fn is_valid_photo_url(value: &str) -> bool {
        match Url::parse(value.trim()) {
            Ok(url) => matches!(url.scheme(), "http" | "https"),
            Err(_) => false,
        }
    }

    /// 重算派生字段(幂等)
    ///
    /// # 说明
    /// - main_photo / polaroids 被修改后调用
    /// - 不改动 status: 工作流状态在构建后归人工操作所有
    pub fn recompute_derived(&mut self) {
        self.main_photo_status = Self::derive_main_photo_status(self.main_photo.as_deref());
        self.polaroid_count = self.polaroids.len();
    }
}

// ==========================================
// OrderPatch - 订单字段部分更新
// ==========================================
// 用途: OrderStore::update_order 的入参,None 表示不改动
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPatch {
    pub order_number: Option<String>,
    pub product_name: Option<String>,
    pub variant: Option<String>,
    pub color: Option<String>,
    pub sku: Option<String>,
    pub quantity: Option<u32>,
    pub customer: Option<String>,
    pub notes: Option<String>,
    pub main_photo: Option<String>,
    pub polaroids: Option<Vec<String>>,
    pub back_engraving_type: Option<String>,
    pub back_engraving_value: Option<String>,
    pub status: Option<OrderStatus>,
    pub packer: Option<String>,
}

// ==========================================
// ColumnMap - 表头分类结果
// ==========================================
// 说明: 固定形状(每个识别字段一个 Option 列号),不用开放字典
// 用途: 列分类器输出,记录构建器按列号取值; None 表示该字段未映射
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    pub order_number: Option<usize>,
    pub product_name: Option<usize>,
    pub variant: Option<usize>,
    pub color: Option<usize>,
    pub main_photo: Option<usize>,
    pub polaroids: Option<usize>,
    pub back_engraving_type: Option<usize>,
    pub back_engraving_value: Option<usize>,
    pub customer: Option<usize>,
    pub sku: Option<usize>,
    pub quantity: Option<usize>,
    pub packer: Option<usize>,
    pub notes: Option<usize>,
    pub status: Option<usize>,
    pub main_photo_status: Option<usize>,
    pub polaroid_count: Option<usize>,
}

// ==========================================
// SkippedValue - 导入诊断(被丢弃的附图取值)
// ==========================================
// 说明: 默认行为不变(静默降级为空列表),仅提供可见性
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedValue {
    /// 数据行号(1 起,含表头后的第一行为 1)
    pub row: usize,
    /// 被 URL 校验丢弃的原始取值
    pub value: String,
}

// ==========================================
// ImportReport - 导入汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    /// 表头后的原始数据行数(含空白行)
    pub total_rows: usize,
    /// 成功构建的订单数(= 非空白行数)
    pub built: usize,
    /// 跳过的空白行数
    pub skipped_blank: usize,
    /// 构建即判定 invalid 的订单数
    pub invalid: usize,
    /// 构建即判定 missing-photo 的订单数
    pub missing_photo: usize,
    /// 被丢弃的附图取值明细
    pub skipped_values: Vec<SkippedValue>,
    /// 导入耗时(毫秒)
    pub elapsed_ms: i64,
}
