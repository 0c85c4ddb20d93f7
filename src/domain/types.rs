// ==========================================
// 打包运营工作台 - 领域类型定义
// ==========================================
// 职责: 订单状态与照片状态的枚举类型
// 红线: 状态值与前端/导出口径保持 kebab-case 一致
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 订单工作流状态 (Order Status)
// ==========================================
// 说明: invalid / missing-photo 由导入时派生,其余为人工操作结果
// 红线: 不做状态机校验,任意状态间转换均合法(人工纠错需要)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,      // 待打包
    Packed,       // 已打包
    Dispute,      // 争议待核查
    MissingPhoto, // 缺主图
    Invalid,      // 关键字段缺失,无法处理
}

impl OrderStatus {
    /// 转换为字符串标识(与序列化口径一致)
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Packed => "packed",
            OrderStatus::Dispute => "dispute",
            OrderStatus::MissingPhoto => "missing-photo",
            OrderStatus::Invalid => "invalid",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 主图校验状态 (Main Photo Status)
// ==========================================
// 说明: 纯派生字段,永远由 main_photo 重算,不独立存储
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MainPhotoStatus {
    Success, // 合法的 http/https 绝对 URL
    Invalid, // 有内容但不是合法 URL
    Missing, // 空白或占位文本 "missing photo"
}

impl MainPhotoStatus {
    /// 转换为字符串标识
    pub fn as_str(&self) -> &'static str {
        match self {
            MainPhotoStatus::Success => "success",
            MainPhotoStatus::Invalid => "invalid",
            MainPhotoStatus::Missing => "missing",
        }
    }
}

impl fmt::Display for MainPhotoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 排序方向 (Sort Direction)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_serde_kebab_case() {
        let json = serde_json::to_string(&OrderStatus::MissingPhoto).unwrap();
        assert_eq!(json, "\"missing-photo\"");

        let back: OrderStatus = serde_json::from_str("\"missing-photo\"").unwrap();
        assert_eq!(back, OrderStatus::MissingPhoto);
    }

    #[test]
    fn test_main_photo_status_as_str() {
        assert_eq!(MainPhotoStatus::Success.as_str(), "success");
        assert_eq!(MainPhotoStatus::Missing.as_str(), "missing");
    }
}
