// ==========================================
// 缝制线生产跟踪系统 - 产出记录数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑（余量由引擎计算后原样存储）
// 存储: output_record（主表） + output_size_shade（有序明细行）
// 写入: 主表 upsert + 明细整体重写，同一事务内完成
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::{MatchKey, OutputRecord, OutputSizeShade};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_store::RecordStore;
use rusqlite::{params, Connection, Result as SqliteResult};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::info;

// ==========================================
// OutputRecordRepository - 产出记录仓储
// ==========================================
pub struct OutputRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl OutputRecordRepository {
    /// 创建新的 OutputRecordRepository 实例
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

    /// 加载全部明细行，按 output_id 分组（组内按 line_no 排序）
    fn load_rows(conn: &Connection) -> RepositoryResult<HashMap<String, Vec<OutputSizeShade>>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT output_id, size, shade, input_quantity, output_quantity, balance_quantity
            FROM output_size_shade
            ORDER BY output_id ASC, line_no ASC
            "#,
        )?;

        let mut grouped: HashMap<String, Vec<OutputSizeShade>> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                OutputSizeShade {
                    size: row.get(1)?,
                    shade: row.get(2)?,
                    input_quantity: row.get(3)?,
                    output_quantity: row.get(4)?,
                    balance_quantity: row.get(5)?,
                },
            ))
        })?;

        for row in rows {
            let (output_id, size_shade) = row?;
            grouped.entry(output_id).or_default().push(size_shade);
        }
        Ok(grouped)
    }
}

impl RecordStore<OutputRecord> for OutputRecordRepository {
    fn list_all(&self) -> RepositoryResult<Vec<OutputRecord>> {
        let conn = self.get_conn()?;
        let mut rows_by_id = Self::load_rows(&conn)?;

        let mut stmt = conn.prepare(
            r#"
            SELECT
                id, record_date,
                line_number, buyer, po, style, pf, color,
                sewing_finish_date, total_output_quantity, total_balance_quantity
            FROM output_record
            ORDER BY rowid ASC
            "#,
        )?;

        let records = stmt
            .query_map([], |row| {
                Ok(OutputRecord {
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
                    total_output_quantity: row.get(9)?,
                    total_balance_quantity: row.get(10)?,
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

    fn upsert(&self, record: &OutputRecord) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute(
            r#"
            INSERT INTO output_record (
                id, record_date,
                line_number, buyer, po, style, pf, color,
                sewing_finish_date, total_output_quantity, total_balance_quantity
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(id) DO UPDATE SET
                record_date = excluded.record_date,
                line_number = excluded.line_number,
                buyer = excluded.buyer,
                po = excluded.po,
                style = excluded.style,
                pf = excluded.pf,
                color = excluded.color,
                sewing_finish_date = excluded.sewing_finish_date,
                total_output_quantity = excluded.total_output_quantity,
                total_balance_quantity = excluded.total_balance_quantity
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
                record.total_output_quantity,
                record.total_balance_quantity,
            ],
        )?;

        tx.execute(
            "DELETE FROM output_size_shade WHERE output_id = ?1",
            params![record.id],
        )?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO output_size_shade (
                    output_id, line_no, size, shade,
                    input_quantity, output_quantity, balance_quantity
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
            )?;
            for (line_no, row) in record.rows.iter().enumerate() {
                stmt.execute(params![
                    record.id,
                    line_no as i64,
                    row.size,
                    row.shade,
                    row.input_quantity,
                    row.output_quantity,
                    row.balance_quantity,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(
            output_id = %record.id,
            match_key = %record.match_key,
            total_output = record.total_output_quantity,
            total_balance = record.total_balance_quantity,
            "产出记录已保存"
        );
        Ok(())
    }

    fn delete_by_id(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM output_record WHERE id = ?1", params![id])?;
        info!(output_id = %id, affected, "产出记录已删除");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn repo() -> OutputRecordRepository {
        OutputRecordRepository::from_connection(Arc::new(Mutex::new(open_in_memory().unwrap())))
    }

    fn output(id: &str, out: i64) -> OutputRecord {
        let mut record = OutputRecord::with_id(id);
        record.match_key = MatchKey::new("5", "H&M", "PO123", "Basic Tee", "PF001", "Black");
        record.rows = vec![
            OutputSizeShade {
                size: "M".to_string(),
                shade: "A".to_string(),
                input_quantity: 100,
                output_quantity: out,
                balance_quantity: 100 - out,
            },
            OutputSizeShade {
                size: "L".to_string(),
                shade: "A".to_string(),
                input_quantity: 50,
                output_quantity: 0,
                balance_quantity: 50,
            },
        ];
        record.recompute_totals();
        record
    }

    #[test]
    fn test_roundtrip_preserves_negative_balance() {
        let repo = repo();
        let record = output("OUT001", 130);
        repo.upsert(&record).unwrap();

        let all = repo.list_all().unwrap();
        assert_eq!(all, vec![record]);
        assert_eq!(all[0].rows[0].balance_quantity, -30);
        assert_eq!(all[0].total_balance_quantity, 20);
    }

    #[test]
    fn test_last_write_wins() {
        let repo = repo();
        repo.upsert(&output("OUT001", 10)).unwrap();
        repo.upsert(&output("OUT001", 20)).unwrap();

        let all = repo.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].total_output_quantity, 20);
    }

    #[test]
    fn test_delete_by_id() {
        let repo = repo();
        repo.upsert(&output("OUT001", 10)).unwrap();
        repo.delete_by_id("OUT001").unwrap();
        assert!(repo.find_by_id("OUT001").unwrap().is_none());
    }
}
