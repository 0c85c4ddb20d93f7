// ==========================================
// 打包运营工作台 - 导入管道 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口(不包含实现)
// 说明: 三个阶段均为纯转换,无 I/O 副作用(文件解析只读入参字节)
// ==========================================

use crate::domain::order::{ColumnMap, PackingOrder, SkippedValue};
use crate::importer::error::ImportResult;

/// 解析产物: 二维字符串网格,第 0 行恒为表头
pub type SheetGrid = Vec<Vec<String>>;

// ==========================================
// UploadedFile - 上传文件载体
// ==========================================
// 说明: 文件名用于扩展名分流,字节内容已全量驻留内存
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// 从磁盘路径读入(桌面端文件选择器场景)
    pub fn from_path(path: impl AsRef<std::path::Path>) -> ImportResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(crate::importer::error::ImportError::FileNotFound(
                path.display().to_string(),
            ));
        }
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

// ==========================================
// SheetParser Trait
// ==========================================
// 用途: 文件格式嗅探与网格提取(阶段 0)
// 实现者: DelimitedSheetParser, SpreadsheetParser, UniversalSheetParser
pub trait SheetParser: Send + Sync {
    /// 将上传文件解析为二维网格(含表头行)
    ///
    /// # 返回
    /// - Ok(SheetGrid): 第 0 行为表头,至少存在一行数据
    /// - Err: 大小超限 / 解析失败 / 无数据行
    fn parse_grid(&self, file: &UploadedFile) -> ImportResult<SheetGrid>;
}

// ==========================================
// HeaderClassifier Trait
// ==========================================
// 用途: 表头 → 内部字段列号映射(阶段 1)
// 实现者: ColumnClassifier
pub trait HeaderClassifier: Send + Sync {
    /// 对表头行做模糊分类
    ///
    /// # 说明
    /// - 每个字段独立扫描,命中第一个匹配的表头列
    /// - 未命中的字段为 None,由下游缺省处理
    fn classify(&self, headers: &[String]) -> ColumnMap;
}

// ==========================================
// BuildOutcome - 记录构建产物
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct BuildOutcome {
    /// 构建完成的订单(保持源行顺序)
    pub orders: Vec<PackingOrder>,
    /// 跳过的空白行数
    pub skipped_blank: usize,
    /// 被 URL 校验丢弃的附图取值(诊断通道,默认行为不受影响)
    pub skipped_values: Vec<SkippedValue>,
}

// ==========================================
// OrderRecordBuilder Trait
// ==========================================
// 用途: 原始行 → 订单记录构建与校验(阶段 2)
// 实现者: RecordBuilder
pub trait OrderRecordBuilder: Send + Sync {
    /// 按列映射构建全部数据行
    ///
    /// # 参数
    /// - rows: 数据行(不含表头)
    /// - columns: 列分类结果
    fn build_records(&self, rows: &[Vec<String>], columns: &ColumnMap) -> BuildOutcome;
}
