// ==========================================
// 缝制线生产跟踪系统 - 投入记录批量导入
// ==========================================
// 流程: 文件解析 → 字段映射 → 按记录分组 → 写入存储
// 分组: 有 input_id 按 input_id，否则按 (日期, 匹配键, 缝制完成日期)
// 红线: 匹配键不完整或尺码为空的行跳过并报告，不中断导入
// 红线: 数量按统一规则转换（非数字为0，负数为0）
// ==========================================

use crate::domain::{InputRecord, InputSizeShade, MatchKey, MatchKeyField, RecordKind};
use crate::engine::quantity::coerce_quantity;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawRow, UniversalFileParser};
use crate::repository::RecordStore;
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

// 列名（已归一化）
const COL_INPUT_ID: &str = "input_id";
const COL_DATE: &str = "date";
const COL_SEWING_FINISH_DATE: &str = "sewing_finish_date";
const COL_SIZE: &str = "size";
const COL_SHADE: &str = "shade";
const COL_QUANTITY: &str = "quantity";

/// 被跳过的行（行号按表格行计，表头为第1行）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRow {
    pub row: usize,
    pub reason: String,
}

/// 导入结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub imported_records: usize,
    pub imported_rows: usize,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Id(String),
    Composite {
        date: Option<NaiveDate>,
        match_key: MatchKey,
        sewing_finish_date: Option<NaiveDate>,
    },
}

// ==========================================
// InputImporter - 投入记录导入器
// ==========================================
pub struct InputImporter {
    store: Arc<dyn RecordStore<InputRecord>>,
}

impl InputImporter {
    pub fn new(store: Arc<dyn RecordStore<InputRecord>>) -> Self {
        Self { store }
    }

    /// 从 CSV / Excel 文件导入投入记录
    ///
    /// # 返回
    /// - Ok(ImportReport): 导入统计（含跳过的行）
    /// - Err: 文件无法解析、缺少必需列或写入失败
    pub fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<ImportReport> {
        let path = file_path.as_ref();
        info!(file = %path.display(), "开始导入投入记录");

        let rows = UniversalFileParser.parse(path)?;
        let (records, skipped) = Self::map_rows(&rows)?;

        let imported_rows = records.iter().map(|r| r.rows.len()).sum();
        for record in &records {
            self.store.upsert(record)?;
        }

        for s in &skipped {
            warn!(row = s.row, reason = %s.reason, "导入行已跳过");
        }
        info!(
            file = %path.display(),
            imported_records = records.len(),
            imported_rows,
            skipped = skipped.len(),
            "投入记录导入完成"
        );

        Ok(ImportReport {
            imported_records: records.len(),
            imported_rows,
            skipped,
        })
    }

    /// 原始行 → 投入记录（保持首次出现顺序）
    pub fn map_rows(rows: &[RawRow]) -> ImportResult<(Vec<InputRecord>, Vec<SkippedRow>)> {
        if let Some(first) = rows.first() {
            for required in [COL_SIZE, COL_QUANTITY] {
                if !first.contains_key(required) {
                    return Err(ImportError::MissingColumn(required.to_string()));
                }
            }
        }

        let mut records: Vec<InputRecord> = Vec::new();
        let mut index: HashMap<GroupKey, usize> = HashMap::new();
        let mut skipped = Vec::new();

        for (i, row) in rows.iter().enumerate() {
            let row_number = i + 2;
            match Self::map_row(row, row_number) {
                Ok((group, fields)) => {
                    let slot = *index.entry(group.clone()).or_insert_with(|| {
                        let id = match &group {
                            GroupKey::Id(id) => id.clone(),
                            GroupKey::Composite { .. } => RecordKind::Input.generate_id(),
                        };
                        let mut record = InputRecord::new(
                            id,
                            fields.match_key.clone(),
                            fields.sewing_finish_date,
                            Vec::new(),
                        );
                        record.date = fields.date;
                        records.push(record);
                        records.len() - 1
                    });
                    merge_row(&mut records[slot], fields.row);
                }
                Err(reason) => skipped.push(SkippedRow {
                    row: row_number,
                    reason,
                }),
            }
        }

        for record in &mut records {
            record.recompute_total();
        }
        Ok((records, skipped))
    }

    fn map_row(row: &RawRow, row_number: usize) -> Result<(GroupKey, MappedRow), String> {
        let mut match_key = MatchKey::default();
        for field in MatchKeyField::ALL {
            match_key.set(field, get_string(row, field.column_name()));
        }
        if !match_key.is_complete() {
            let missing: Vec<&str> = MatchKeyField::ALL
                .iter()
                .filter(|f| match_key.get(**f).trim().is_empty())
                .map(|f| f.column_name())
                .collect();
            return Err(format!("匹配键不完整，缺少: {}", missing.join(", ")));
        }

        let size = get_string(row, COL_SIZE);
        if size.is_empty() {
            return Err("尺码为空".to_string());
        }

        let date = parse_optional_date(row, COL_DATE)
            .map_err(|v| format!("日期格式错误 ({}): {}", COL_DATE, v))?;
        let sewing_finish_date = parse_optional_date(row, COL_SEWING_FINISH_DATE)
            .map_err(|v| format!("日期格式错误 ({}): {}", COL_SEWING_FINISH_DATE, v))?;

        let raw_quantity = get_string(row, COL_QUANTITY);
        let quantity = coerce_quantity(&raw_quantity);
        if quantity == 0 && !raw_quantity.is_empty() && raw_quantity != "0" {
            warn!(row = row_number, raw = %raw_quantity, "数量无法识别，按0处理");
        }

        let input_id = get_string(row, COL_INPUT_ID);
        let group = if input_id.is_empty() {
            GroupKey::Composite {
                date,
                match_key: match_key.clone(),
                sewing_finish_date,
            }
        } else {
            GroupKey::Id(input_id)
        };

        Ok((
            group,
            MappedRow {
                date,
                match_key,
                sewing_finish_date,
                row: InputSizeShade::new(size, get_string(row, COL_SHADE), quantity),
            },
        ))
    }
}

struct MappedRow {
    date: Option<NaiveDate>,
    match_key: MatchKey,
    sewing_finish_date: Option<NaiveDate>,
    row: InputSizeShade,
}

/// 同一记录内重复的尺码/色差合并数量
fn merge_row(record: &mut InputRecord, row: InputSizeShade) {
    match record
        .rows
        .iter_mut()
        .find(|r| r.size == row.size && r.shade == row.shade)
    {
        Some(existing) => existing.quantity = existing.quantity.saturating_add(row.quantity),
        None => record.rows.push(row),
    }
}

fn get_string(row: &RawRow, column: &str) -> String {
    row.get(column).map(|v| v.trim().to_string()).unwrap_or_default()
}

/// 解析可选日期（空值为 None，无法识别时返回原值）
fn parse_optional_date(row: &RawRow, column: &str) -> Result<Option<NaiveDate>, String> {
    let value = get_string(row, column);
    if value.is_empty() {
        return Ok(None);
    }
    parse_date(&value).map(Some).ok_or(value)
}

/// 支持 YYYY-MM-DD / YYYY/MM/DD / YYYYMMDD，以及 Excel 日期序列号
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    for format in ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    // Excel 序列号（1900 日期系统，基准 1899-12-30）
    let serial = value.parse::<f64>().ok()?;
    if !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_signed(Duration::days(serial.trunc() as i64))
}
