// ==========================================
// 缝制线生产跟踪系统 - 投入记录数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 存储: input_record（主表） + input_size_shade（有序明细行）
// 写入: 主表 upsert + 明细整体重写，同一事务内完成
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{InputRecord, InputSizeShade, MatchKey};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_store::RecordStore;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::info;

// ==========================================
// InputRecordRepository - 投入记录仓储
// ==========================================
pub struct InputRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl InputRecordRepository {
    /// 创建新的 InputRecordRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 加载全部明细行，按 input_id 分组（组内按 line_no 排序）
    fn load_rows(conn: &Connection) -> RepositoryResult<HashMap<String, Vec<InputSizeShade>>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT input_id, size, shade, quantity
            FROM input_size_shade
            ORDER BY input_id ASC, line_no ASC
            "#,
        )?;

        let mut grouped: HashMap<String, Vec<InputSizeShade>> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                InputSizeShade {
                    size: row.get(1)?,
                    shade: row.get(2)?,
                    quantity: row.get(3)?,
                },
            ))
        })?;

        for row in rows {
            let (input_id, size_shade) = row?;
            grouped.entry(input_id).or_default().push(size_shade);
        }
        Ok(grouped)
    }
}

impl RecordStore<InputRecord> for InputRecordRepository {
    fn list_all(&self) -> RepositoryResult<Vec<InputRecord>> {
        let conn = self.get_conn()?;
        let mut rows_by_id = Self::load_rows(&conn)?;

        let mut stmt = conn.prepare(
            r#"
            SELECT
                id, record_date,
                line_number, buyer, po, style, pf, color,
                sewing_finish_date, total_quantity
            FROM input_record
            ORDER BY rowid ASC
            "#,
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(InputRecord {
                    id: row.get(0)?,
                    date: row.get(1)?,
                    match_key: MatchKey {
                        line_number: row.get(2)?,
                        buyer: row.get(3)?,
                        po: row.get(4)?,
                        style: row.get(5)?,
                        pf: row.get(6)?,
                        color: row.get(7)?,
                    },
                    sewing_finish_date: row.get(8)?,
                    rows: Vec::new(),
                    total_quantity: row.get(9)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;

        Ok(records
            .into_iter()
            .map(|mut record| {
                record.rows = rows_by_id.remove(&record.id).unwrap_or_default();
                record
            })
            .collect())
    }

    fn upsert(&self, record: &InputRecord) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            r#"
            INSERT INTO input_record (
                id, record_date,
                line_number, buyer, po, style, pf, color,
                sewing_finish_date, total_quantity
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(id) DO UPDATE SET
                record_date = excluded.record_date,
                line_number = excluded.line_number,
                buyer = excluded.buyer,
                po = excluded.po,
                style = excluded.style,
                pf = excluded.pf,
                color = excluded.color,
                sewing_finish_date = excluded.sewing_finish_date,
                total_quantity = excluded.total_quantity
            "#,
            params![
                record.id,
                record.date,
                record.match_key.line_number,
                record.match_key.buyer,
                record.match_key.po,
                record.match_key.style,
                record.match_key.pf,
                record.match_key.color,
                record.sewing_finish_date,
                record.total_quantity,
            ],
        )?;

        tx.execute(
            "DELETE FROM input_size_shade WHERE input_id = ?1",
            params![record.id],
        )?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO input_size_shade (input_id, line_no, size, shade, quantity)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )?;
            for (line_no, row) in record.rows.iter().enumerate() {
                stmt.execute(params![record.id, line_no as i64, row.size, row.shade, row.quantity])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(
            input_id = %record.id,
            match_key = %record.match_key,
            rows = record.rows.len(),
            total_quantity = record.total_quantity,
            "投入记录已保存"
        );
        Ok(())
    }

    fn delete_by_id(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        // 明细行由 ON DELETE CASCADE 级联删除
        let affected = conn.execute("DELETE FROM input_record WHERE id = ?1", params![id])?;
        info!(input_id = %id, affected, "投入记录已删除");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use chrono::NaiveDate;

    fn repo() -> InputRecordRepository {
        InputRecordRepository::from_connection(Arc::new(Mutex::new(open_in_memory().unwrap())))
    }

    fn input(id: &str, rows: Vec<InputSizeShade>) -> InputRecord {
        let mut record = InputRecord::new(
            id,
            MatchKey::new("5", "H&M", "PO123", "Basic Tee", "PF001", "Black"),
            NaiveDate::from_ymd_opt(2024, 7, 30),
            rows,
        );
        record.date = NaiveDate::from_ymd_opt(2024, 7, 20);
        record
    }

    #[test]
    fn test_roundtrip_keeps_row_order() {
        let repo = repo();
        let record = input(
            "INP001",
            vec![
                InputSizeShade::new("M", "A", 500),
                InputSizeShade::new("L", "A", 700),
                InputSizeShade::new("S", "B", 10),
            ],
        );
        repo.upsert(&record).unwrap();

        assert_eq!(repo.list_all().unwrap(), vec![record]);
    }

    #[test]
    fn test_upsert_rewrites_rows() {
        let repo = repo();
        repo.upsert(&input("INP001", vec![InputSizeShade::new("M", "A", 500)]))
            .unwrap();
        repo.upsert(&input("INP002", vec![InputSizeShade::new("S", "B", 1)]))
            .unwrap();

        let updated = input(
            "INP001",
            vec![InputSizeShade::new("XL", "C", 5), InputSizeShade::new("M", "A", 1)],
        );
        repo.upsert(&updated).unwrap();

        let all = repo.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0], updated);
        assert_eq!(all[0].total_quantity, 6);
        assert_eq!(all[1].id, "INP002");
    }

    #[test]
    fn test_delete_cascades_rows() {
        let repo = repo();
        repo.upsert(&input("INP001", vec![InputSizeShade::new("M", "A", 500)]))
            .unwrap();
        repo.delete_by_id("INP001").unwrap();
        repo.delete_by_id("INP001").unwrap();

        assert!(repo.list_all().unwrap().is_empty());
        let orphan_rows: i64 = repo
            .get_conn()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM input_size_shade", [], |row| row.get(0))
            .unwrap();
        assert_eq!(orphan_rows, 0);
    }
}
