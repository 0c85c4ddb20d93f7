// ==========================================
// 打包运营工作台 - 列分类器实现
// ==========================================
// 职责: 自由命名的表头 → 内部固定字段的列号映射
// 红线: 互斥靠排除模式维护,不靠字段检查顺序;调整时只扩展排除模式
// ==========================================

use crate::domain::order::ColumnMap;
use crate::importer::packing_importer_trait::HeaderClassifier;
use regex::Regex;

// ==========================================
// FieldRule - 单字段识别规则
// ==========================================
// 说明: include 命中且 exclude(若有)未命中才算匹配
struct FieldRule {
    include: Regex,
    exclude: Option<Regex>,
}

impl FieldRule {
    fn new(include: &str, exclude: Option<&str>) -> Self {
        Self {
            include: Regex::new(include).expect("内置表头模式必须合法"),
            exclude: exclude.map(|p| Regex::new(p).expect("内置表头模式必须合法")),
        }
    }

    fn matches(&self, header: &str) -> bool {
        if !self.include.is_match(header) {
            return false;
        }
        match &self.exclude {
            Some(ex) => !ex.is_match(header),
            None => true,
        }
    }
}

// ==========================================
// ColumnClassifier - 列分类器
// ==========================================
// 说明: 纯函数式分类,无 I/O;每个字段独立取第一个命中的表头
pub struct ColumnClassifier {
    order_number: FieldRule,
    product_name: FieldRule,
    variant: FieldRule,
    color: FieldRule,
    main_photo: FieldRule,
    polaroids: FieldRule,
    back_engraving_type: FieldRule,
    back_engraving_value: FieldRule,
    customer: FieldRule,
    sku: FieldRule,
    quantity: FieldRule,
    packer: FieldRule,
    notes: FieldRule,
    status: FieldRule,
    main_photo_status: FieldRule,
    polaroid_count: FieldRule,
}

impl ColumnClassifier {
    pub fn new() -> Self {
        Self {
            order_number: FieldRule::new(
                r"(?i)order\s*(number|no\.?|num|id|#)|^order$|^#$|订单号|^单号$",
                None,
            ),
            product_name: FieldRule::new(r"(?i)product|^item(\s*name)?$|商品|品名", None),
            variant: FieldRule::new(r"(?i)variant|option|款式|规格", None),
            color: FieldRule::new(r"(?i)colou?r|颜色", None),
            // 主图排除拍立得/附加图/状态/数量类表头,避免一列被双重归类
            main_photo: FieldRule::new(
                r"(?i)photo|image|picture|主图|图片",
                Some(r"(?i)polaroid|additional|status|count|拍立得|附图|状态|数"),
            ),
            polaroids: FieldRule::new(
                r"(?i)polaroid|additional\s*(photo|image)s?|拍立得|附图",
                Some(r"(?i)count|数"),
            ),
            back_engraving_type: FieldRule::new(r"(?i)engrav\w*\s*type|刻字类型", None),
            // 刻字内容排除 type,与 back_engraving_type 互斥
            back_engraving_value: FieldRule::new(
                r"(?i)engrav|刻字",
                Some(r"(?i)type|类型"),
            ),
            customer: FieldRule::new(r"(?i)customer|client|buyer|客户", None),
            sku: FieldRule::new(r"(?i)sku", None),
            quantity: FieldRule::new(
                r"(?i)quantity|qty|数量",
                Some(r"(?i)polaroid|拍立得"),
            ),
            packer: FieldRule::new(r"(?i)packer|packed\s*by|打包人", None),
            notes: FieldRule::new(r"(?i)notes?|comment|remark|备注", None),
            // 工作流状态排除照片状态类表头
            status: FieldRule::new(r"(?i)status|状态", Some(r"(?i)photo|image|主图|图片")),
            main_photo_status: FieldRule::new(r"(?i)photo\s*status|主图状态|图片状态", None),
            polaroid_count: FieldRule::new(r"(?i)polaroid\s*(count|number)|拍立得数", None),
        }
    }

    /// 找到第一个命中规则的表头列号
    fn find(rule: &FieldRule, headers: &[String]) -> Option<usize> {
        headers.iter().position(|h| {
            let normalized = h.trim().to_lowercase();
            rule.matches(&normalized)
        })
    }
}

impl Default for ColumnClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderClassifier for ColumnClassifier {
    fn classify(&self, headers: &[String]) -> ColumnMap {
        ColumnMap {
            order_number: Self::find(&self.order_number, headers),
            product_name: Self::find(&self.product_name, headers),
            variant: Self::find(&self.variant, headers),
            color: Self::find(&self.color, headers),
            main_photo: Self::find(&self.main_photo, headers),
            polaroids: Self::find(&self.polaroids, headers),
            back_engraving_type: Self::find(&self.back_engraving_type, headers),
            back_engraving_value: Self::find(&self.back_engraving_value, headers),
            customer: Self::find(&self.customer, headers),
            sku: Self::find(&self.sku, headers),
            quantity: Self::find(&self.quantity, headers),
            packer: Self::find(&self.packer, headers),
            notes: Self::find(&self.notes, headers),
            status: Self::find(&self.status, headers),
            main_photo_status: Self::find(&self.main_photo_status, headers),
            polaroid_count: Self::find(&self.polaroid_count, headers),
        }
    }
}
