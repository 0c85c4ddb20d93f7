// ==========================================
// 打包运营工作台 - 文件解析器实现
// ==========================================
// 职责: 格式嗅探 + 二维网格提取
// 支持: 分隔文本 (.csv) / 表格容器 (.xlsx/.xls/.ods 等,取第一个工作表)
// 红线: 解析前先做大小校验;引号内的分隔符与换行不切分字段/行
// ==========================================

use crate::importer::error::{ImportError, ImportResult, MAX_FILE_SIZE};
use crate::importer::packing_importer_trait::{SheetParser, SheetGrid, UploadedFile};
use calamine::{open_workbook_auto_from_rs, Reader};
use std::io::Cursor;
use std::path::Path;

/// 候选分隔符,按优先顺序(计数并列时取靠前者)
const DELIMITER_CANDIDATES: [char; 3] = [',', ';', '\t'];

/// 大小校验,每个解析器入口各自执行(解析器可被单独调用,不依赖分流器)
fn ensure_within_size_limit(file: &UploadedFile) -> ImportResult<()> {
    if file.size() > MAX_FILE_SIZE {
        return Err(ImportError::SizeLimitExceeded {
            size: file.size(),
            limit: MAX_FILE_SIZE,
        });
    }
    Ok(())
}

// ==========================================
// 分隔文本解析器 (.csv)
// ==========================================
pub struct DelimitedSheetParser;

impl DelimitedSheetParser {
    /// 依据第一个非空白行做分隔符多数判定
    ///
    /// # 规则
    /// - 对每个候选分隔符统计该行切分后的字段数,取最多者
    /// - 只看单行,不做多行统计
    pub fn detect_delimiter(first_line: &str) -> char {
        let mut best = DELIMITER_CANDIDATES[0];
        let mut best_count = 0usize;

        for candidate in DELIMITER_CANDIDATES {
            let count = first_line.split(candidate).count();
            if count > best_count {
                best = candidate;
                best_count = count;
            }
        }

        best
    }

    /// 引号感知的网格扫描
    ///
    /// # 说明
    /// - 空白行在扫描前整体丢弃
    /// - 引号内的分隔符与换行按普通字符处理
    /// - 双引号("")不做反转义,引号字符本身不进入字段值
    fn scan_rows(text: &str, delimiter: char) -> Vec<Vec<String>> {
        // 先丢弃空白行
        let cleaned = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n");

        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut row: Vec<String> = Vec::new();
        let mut field = String::new();
        let mut in_quotes = false;

        for ch in cleaned.chars() {
            if ch == '"' {
                in_quotes = !in_quotes;
                continue;
            }

            if !in_quotes {
                if ch == delimiter {
                    row.push(std::mem::take(&mut field));
                    continue;
                }
                if ch == '\n' {
                    row.push(std::mem::take(&mut field));
                    rows.push(std::mem::take(&mut row));
                    continue;
                }
                if ch == '\r' {
                    continue;
                }
            }

            field.push(ch);
        }

        // 收尾: 最后一行无换行结束
        if !field.is_empty() || !row.is_empty() {
            row.push(field);
            rows.push(row);
        }

        rows
    }
}

impl SheetParser for DelimitedSheetParser {
    fn parse_grid(&self, file: &UploadedFile) -> ImportResult<SheetGrid> {
        ensure_within_size_limit(file)?;

        let text = String::from_utf8_lossy(&file.bytes);

        // 判定依据与扫描口径一致: 跳过前导空白行,取第一个非空白行
        let first_line = text
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("");
        let delimiter = Self::detect_delimiter(first_line);

        let grid = Self::scan_rows(&text, delimiter);

        // 去除表头后无数据行
        if grid.len() < 2 {
            return Err(ImportError::EmptyFile);
        }

        Ok(grid)
    }
}

// ==========================================
// 表格容器解析器 (Excel / ODS)
// ==========================================
pub struct SpreadsheetParser;

impl SheetParser for SpreadsheetParser {
    fn parse_grid(&self, file: &UploadedFile) -> ImportResult<SheetGrid> {
        ensure_within_size_limit(file)?;

        let cursor = Cursor::new(file.bytes.as_slice());
        let mut workbook = open_workbook_auto_from_rs(cursor)
            .map_err(|e| ImportError::ParseFailure(e.to_string()))?;

        // 取文档顺序的第一个工作表
        let sheet_names = workbook.sheet_names();
        if sheet_names.is_empty() {
            return Err(ImportError::ParseFailure("表格文件无工作表".to_string()));
        }
        let sheet_name = sheet_names[0].clone();

        let range = workbook
            .worksheet_range(&sheet_name)
            .map_err(|e| ImportError::ParseFailure(e.to_string()))?;

        let mut grid: SheetGrid = Vec::new();
        for data_row in range.rows() {
            let cells: Vec<String> = data_row
                .iter()
                .map(|cell| cell.to_string().trim().to_string())
                .collect();

            // 跳过完全空白的行
            if cells.iter().all(|v| v.is_empty()) {
                continue;
            }

            grid.push(cells);
        }

        if grid.len() < 2 {
            return Err(ImportError::EmptyFile);
        }

        Ok(grid)
    }
}

// ==========================================
// 通用解析器(根据扩展名自动分流)
// ==========================================
// 说明: .csv 走分隔文本;其余一律按表格容器尝试解码,
//       不支持的二进制格式在解码阶段以 ParseFailure 报错
pub struct UniversalSheetParser;

impl SheetParser for UniversalSheetParser {
    fn parse_grid(&self, file: &UploadedFile) -> ImportResult<SheetGrid> {
        // 大小校验由各解析器自行执行,先于任何解析
        let ext = Path::new(&file.name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        if ext == "csv" {
            DelimitedSheetParser.parse_grid(file)
        } else {
            SpreadsheetParser.parse_grid(file)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_file(content: &str) -> UploadedFile {
        UploadedFile::new("orders.csv", content.as_bytes().to_vec())
    }

    #[test]
    fn test_detect_delimiter_comma() {
        assert_eq!(DelimitedSheetParser::detect_delimiter("a,b,c"), ',');
    }

    #[test]
    fn test_detect_delimiter_semicolon_plurality() {
        // 分号切 5 段 vs 逗号切 1 段 → 选分号
        assert_eq!(DelimitedSheetParser::detect_delimiter("a;b;c;d;e"), ';');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(DelimitedSheetParser::detect_delimiter("a\tb\tc"), '\t');
    }

    #[test]
    fn test_parse_basic_grid() {
        let grid = DelimitedSheetParser
            .parse_grid(&csv_file("单号,商品\nSO-1,挂坠\nSO-2,手链\n"))
            .unwrap();

        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0], vec!["单号", "商品"]);
        assert_eq!(grid[1], vec!["SO-1", "挂坠"]);
    }

    #[test]
    fn test_blank_lines_dropped_before_parsing() {
        let grid = DelimitedSheetParser
            .parse_grid(&csv_file("a,b\n\n1,2\n   \n3,4\n"))
            .unwrap();

        assert_eq!(grid.len(), 3);
    }

    #[test]
    fn test_quoted_delimiter_not_split() {
        let grid = DelimitedSheetParser
            .parse_grid(&csv_file("a,b\n\"x,y\",2\n"))
            .unwrap();

        assert_eq!(grid[1], vec!["x,y", "2"]);
    }

    #[test]
    fn test_quoted_newline_not_row_break() {
        let grid = DelimitedSheetParser
            .parse_grid(&csv_file("a,b\n\"第一行\n第二行\",2\n"))
            .unwrap();

        assert_eq!(grid.len(), 2);
        assert_eq!(grid[1][0], "第一行\n第二行");
    }

    #[test]
    fn test_empty_file_rejected() {
        let result = DelimitedSheetParser.parse_grid(&csv_file("单号,商品\n"));
        assert!(matches!(result, Err(ImportError::EmptyFile)));

        let result = DelimitedSheetParser.parse_grid(&csv_file(""));
        assert!(matches!(result, Err(ImportError::EmptyFile)));
    }

    #[test]
    fn test_delimiter_detected_after_leading_blank_lines() {
        // 前导空白行不参与分隔符判定,否则分号文件会误判为逗号
        let grid = DelimitedSheetParser
            .parse_grid(&csv_file("\n\n单号;商品\nSO-1;挂坠\n"))
            .unwrap();

        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0], vec!["单号", "商品"]);
        assert_eq!(grid[1], vec!["SO-1", "挂坠"]);
    }

    #[test]
    fn test_size_limit_checked_before_parse() {
        let file = UploadedFile::new("big.csv", vec![b'x'; MAX_FILE_SIZE + 1]);
        let result = UniversalSheetParser.parse_grid(&file);
        assert!(matches!(
            result,
            Err(ImportError::SizeLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_size_limit_enforced_by_each_parser() {
        // 各解析器被单独调用时同样拒绝超限文件
        let file = UploadedFile::new("big.csv", vec![b'x'; MAX_FILE_SIZE + 1]);
        assert!(matches!(
            DelimitedSheetParser.parse_grid(&file),
            Err(ImportError::SizeLimitExceeded { .. })
        ));
        assert!(matches!(
            SpreadsheetParser.parse_grid(&file),
            Err(ImportError::SizeLimitExceeded { .. })
        ));
    }

    #[test]
    fn test_unknown_binary_fails_as_parse_failure() {
        // 非 .csv 扩展名一律走表格容器解码,坏内容报 ParseFailure
        let file = UploadedFile::new("orders.xlsx", vec![0u8, 1, 2, 3]);
        let result = UniversalSheetParser.parse_grid(&file);
        assert!(matches!(result, Err(ImportError::ParseFailure(_))));
    }

    #[test]
    fn test_csv_extension_case_insensitive() {
        let file = UploadedFile::new("ORDERS.CSV", "a,b\n1,2\n".as_bytes().to_vec());
        let grid = UniversalSheetParser.parse_grid(&file).unwrap();
        assert_eq!(grid.len(), 2);
    }
}
