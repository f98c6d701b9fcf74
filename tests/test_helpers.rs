// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、测试数据生成等功能
// ==========================================

#![allow(dead_code)]

use sewing_line_tracker::db::{init_schema, open_sqlite_connection};
use sewing_line_tracker::domain::{InputRecord, InputSizeShade, MatchKey};
use std::error::Error;
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是有效 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    init_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 场景匹配键: 5 / H&M / PO123 / Basic Tee / PF001 / Black
pub fn scenario_key() -> MatchKey {
    MatchKey::new("5", "H&M", "PO123", "Basic Tee", "PF001", "Black")
}

/// 构造投入记录
pub fn input_record(id: &str, key: MatchKey, rows: &[(&str, &str, i64)]) -> InputRecord {
    InputRecord::new(
        id,
        key,
        None,
        rows.iter()
            .map(|(size, shade, qty)| InputSizeShade::new(*size, *shade, *qty))
            .collect(),
    )
}
