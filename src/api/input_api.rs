// ==========================================
// 缝制线生产跟踪系统 - 投入记录 API
// ==========================================
// 职责: 投入记录的查询、录入、保存、删除、批量导入
// 红线: 保存前重算合计（派生字段不信任调用方）
// 红线: 读取失败降级为空列表（记录日志）；写入失败返回错误
// ==========================================

use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::InputRecord;
use crate::engine::quantity::coerce_quantity;
use crate::engine::snapshot::load_or_empty;
use crate::importer::{ImportReport, InputImporter};
use crate::repository::RecordStore;

// ==========================================
// InputApi - 投入记录 API
// ==========================================
pub struct InputApi {
    store: Arc<dyn RecordStore<InputRecord>>,
    importer: InputImporter,
}

impl InputApi {
    pub fn new(store: Arc<dyn RecordStore<InputRecord>>) -> Self {
        Self {
            importer: InputImporter::new(store.clone()),
            store,
        }
    }

    /// 全部投入记录（按录入顺序）
    pub fn list_inputs(&self) -> Vec<InputRecord> {
        load_or_empty(self.store.as_ref())
    }

    /// 按ID查询投入记录
    pub fn get_input(&self, id: &str) -> ApiResult<InputRecord> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidInput("投入记录ID不能为空".to_string()));
        }

        self.store
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("投入记录(id={})不存在", id)))
    }

    /// 新投入记录（已生成ID，预置一行空尺码/色差）
    pub fn new_input(&self) -> InputRecord {
        InputRecord::new_blank()
    }

    /// 修改行数量（原始输入按统一规则转换）
    pub fn set_row_quantity(&self, record: &mut InputRecord, index: usize, raw: &str) -> ApiResult<()> {
        if !record.set_quantity(index, coerce_quantity(raw)) {
            return Err(ApiError::InvalidInput(format!(
                "尺码/色差行下标越界: {} (共{}行)",
                index,
                record.rows.len()
            )));
        }
        Ok(())
    }

    /// 删除尺码/色差行（至少保留一行）
    pub fn remove_row(&self, record: &mut InputRecord, index: usize) -> ApiResult<()> {
        if index >= record.rows.len() {
            return Err(ApiError::InvalidInput(format!(
                "尺码/色差行下标越界: {} (共{}行)",
                index,
                record.rows.len()
            )));
        }
        if !record.remove_row(index) {
            return Err(ApiError::ValidationError("至少保留一行尺码/色差".to_string()));
        }
        Ok(())
    }

    /// 保存投入记录（存在则整体替换）
    ///
    /// # 返回
    /// - Ok(InputRecord): 已持久化的记录（合计已重算）
    /// - Err(ApiError): 校验或存储写入失败
    pub fn save_input(&self, record: &InputRecord) -> ApiResult<InputRecord> {
        if record.id.trim().is_empty() {
            return Err(ApiError::InvalidInput("投入记录ID不能为空".to_string()));
        }

        let mut record = record.clone();
        for row in &mut record.rows {
            row.quantity = row.quantity.max(0);
        }
        record.recompute_total();

        if !record.match_key.is_complete() {
            warn!(input_id = %record.id, "投入记录匹配键不完整，将不参与对账");
        }

        self.store.upsert(&record).map_err(|e| {
            error!(input_id = %record.id, error = %e, "投入记录保存失败");
            ApiError::from(e)
        })?;

        info!(
            input_id = %record.id,
            match_key = %record.match_key,
            total_quantity = record.total_quantity,
            "投入记录已保存"
        );
        Ok(record)
    }

    /// 删除投入记录（不存在时为 no-op）
    pub fn delete_input(&self, id: &str) -> ApiResult<()> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidInput("投入记录ID不能为空".to_string()));
        }

        self.store.delete_by_id(id).map_err(|e| {
            error!(input_id = id, error = %e, "投入记录删除失败");
            ApiError::from(e)
        })?;

        info!(input_id = id, "投入记录已删除");
        Ok(())
    }

    /// 从 CSV / Excel 文件批量导入
    pub fn import_from_file<P: AsRef<Path>>(&self, file_path: P) -> ApiResult<ImportReport> {
        let path = file_path.as_ref();
        self.importer.import_file(path).map_err(|e| {
            error!(file = %path.display(), error = %e, "投入记录导入失败");
            ApiError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InputSizeShade, MatchKey};
    use crate::repository::InMemoryRecordStore;

    fn api() -> InputApi {
        InputApi::new(Arc::new(InMemoryRecordStore::<InputRecord>::new()))
    }

    #[test]
    fn test_save_recomputes_total() {
        let api = api();
        let mut record = InputRecord::new(
            "INP001",
            MatchKey::new("5", "H&M", "PO123", "Basic Tee", "PF001", "Black"),
            None,
            vec![InputSizeShade::new("M", "A", 500), InputSizeShade::new("L", "A", 700)],
        );
        record.total_quantity = 1;
        record.rows[1].quantity = -5;

        let saved = api.save_input(&record).unwrap();
        assert_eq!(saved.total_quantity, 500);
        assert_eq!(api.get_input("INP001").unwrap().total_quantity, 500);
    }

    #[test]
    fn test_row_editing() {
        let api = api();
        let mut record = api.new_input();
        assert_eq!(record.rows.len(), 1);

        api.set_row_quantity(&mut record, 0, "12.9").unwrap();
        assert_eq!(record.total_quantity, 12);
        assert!(matches!(
            api.set_row_quantity(&mut record, 3, "1"),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            api.remove_row(&mut record, 0),
            Err(ApiError::ValidationError(_))
        ));
    }

    #[test]
    fn test_delete_and_not_found() {
        let api = api();
        let record = api.save_input(&api.new_input()).unwrap();
        api.delete_input(&record.id).unwrap();

        assert!(api.list_inputs().is_empty());
        assert!(matches!(api.get_input(&record.id), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_import_missing_file() {
        let result = api().import_from_file("does_not_exist.csv");
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
