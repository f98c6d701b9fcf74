// ==========================================
// 缝制线生产跟踪系统 - 导入层
// ==========================================
// 职责: 外部表格导入,生成投入记录
// 支持: Excel, CSV
// ==========================================

pub mod error;
pub mod file_parser;
pub mod input_importer;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, RawRow, UniversalFileParser};
pub use input_importer::{ImportReport, InputImporter, SkippedRow};
