// ==========================================
// 缝制线生产跟踪系统 - 员工数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 存储: employee 表（技能列表以 JSON 存储于 skills_json）
// ==========================================

use crate::db::open_sqlite_connection;
use crate::domain::types::Gender;
use crate::domain::{Employee, EmployeeSkill};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::record_store::RecordStore;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};
use tracing::info;

// ==========================================
// EmployeeRepository - 员工仓储
// ==========================================
/// 员工仓储
/// 职责: 管理 employee 表的 CRUD 操作
pub struct EmployeeRepository {
    conn: Arc<Mutex<Connection>>,
}

const SELECT_COLUMNS: &str = r#"
    id, name, designation, line_number, join_date, phone, skills_json,
    nid, father_name, mother_name, is_married, gender, blood_group,
    division, district, upazila, thana, post_office, village, photo
"#;

impl EmployeeRepository {
    /// 创建新的 EmployeeRepository 实例
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

    /// 按产线查询员工
    pub fn find_by_line_number(&self, line_number: &str) -> RepositoryResult<Vec<Employee>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM employee WHERE line_number = ?1 ORDER BY rowid ASC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let employees = stmt
            .query_map(params![line_number], map_employee_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(employees)
    }
}

impl RecordStore<Employee> for EmployeeRepository {
    fn list_all(&self) -> RepositoryResult<Vec<Employee>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM employee ORDER BY rowid ASC", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let employees = stmt
            .query_map([], map_employee_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(employees)
    }

    fn upsert(&self, employee: &Employee) -> RepositoryResult<()> {
        let skills_json = serde_json::to_string(&employee.skills)?;
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO employee (
                id, name, designation, line_number, join_date, phone, skills_json,
                nid, father_name, mother_name, is_married, gender, blood_group,
                division, district, upazila, thana, post_office, village, photo
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                designation = excluded.designation,
                line_number = excluded.line_number,
                join_date = excluded.join_date,
                phone = excluded.phone,
                skills_json = excluded.skills_json,
                nid = excluded.nid,
                father_name = excluded.father_name,
                mother_name = excluded.mother_name,
                is_married = excluded.is_married,
                gender = excluded.gender,
                blood_group = excluded.blood_group,
                division = excluded.division,
                district = excluded.district,
                upazila = excluded.upazila,
                thana = excluded.thana,
                post_office = excluded.post_office,
                village = excluded.village,
                photo = excluded.photo
            "#,
            params![
                employee.id,
                employee.name,
                employee.designation,
                employee.line_number,
                employee.join_date,
                employee.phone,
                skills_json,
                employee.nid,
                employee.father_name,
                employee.mother_name,
                employee.is_married,
                employee.gender.to_db_str(),
                employee.blood_group,
                employee.division,
                employee.district,
                employee.upazila,
                employee.thana,
                employee.post_office,
                employee.village,
                employee.photo,
            ],
        )?;

        info!(employee_id = %employee.id, "员工档案已保存");
        Ok(())
    }

    fn delete_by_id(&self, id: &str) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let affected = conn.execute("DELETE FROM employee WHERE id = ?1", params![id])?;
        info!(employee_id = %id, affected, "员工档案已删除");
        Ok(())
    }

    fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Employee>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM employee WHERE id = ?1", SELECT_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let result = stmt.query_row(params![id], map_employee_row);

        match result {
            Ok(employee) => Ok(Some(employee)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// 行映射（列顺序与 SELECT_COLUMNS 一致）
fn map_employee_row(row: &Row<'_>) -> SqliteResult<Employee> {
    let skills_json: String = row.get(6)?;
    let skills: Vec<EmployeeSkill> = serde_json::from_str(&skills_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?;

    Ok(Employee {
        id: row.get(0)?,
        name: row.get(1)?,
        designation: row.get(2)?,
        line_number: row.get(3)?,
        join_date: row.get(4)?,
        phone: row.get(5)?,
        skills,
        nid: row.get(7)?,
        father_name: row.get(8)?,
        mother_name: row.get(9)?,
        is_married: row.get(10)?,
        gender: Gender::from_str(&row.get::<_, String>(11)?),
        blood_group: row.get(12)?,
        division: row.get(13)?,
        district: row.get(14)?,
        upazila: row.get(15)?,
        thana: row.get(16)?,
        post_office: row.get(17)?,
        village: row.get(18)?,
        photo: row.get(19)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;
    use chrono::NaiveDate;

    fn repo() -> EmployeeRepository {
        EmployeeRepository::from_connection(Arc::new(Mutex::new(open_in_memory().unwrap())))
    }

    fn employee(id: &str, line: &str) -> Employee {
        let mut emp = Employee::with_id(id);
        emp.name = format!("Name {}", id);
        emp.designation = "Sewing Operator".to_string();
        emp.line_number = line.to_string();
        emp.join_date = NaiveDate::from_ymd_opt(2023, 1, 15);
        emp.skills = vec![EmployeeSkill {
            item: "T-Shirt".to_string(),
            process: "Neck Join".to_string(),
        }];
        emp.gender = Gender::Female;
        emp.is_married = true;
        emp
    }

    #[test]
    fn test_upsert_and_list_roundtrip() {
        let repo = repo();
        let emp = employee("EMP001", "5");
        repo.upsert(&emp).unwrap();

        let all = repo.list_all().unwrap();
        assert_eq!(all, vec![emp.clone()]);
        assert_eq!(repo.find_by_id("EMP001").unwrap(), Some(emp));
        assert_eq!(repo.find_by_id("EMP404").unwrap(), None);
    }

    #[test]
    fn test_upsert_keeps_insertion_order() {
        let repo = repo();
        repo.upsert(&employee("EMP001", "5")).unwrap();
        repo.upsert(&employee("EMP002", "3")).unwrap();

        let mut changed = employee("EMP001", "7");
        changed.name = "Renamed".to_string();
        repo.upsert(&changed).unwrap();

        let ids: Vec<String> = repo.list_all().unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["EMP001", "EMP002"]);
        assert_eq!(repo.find_by_line_number("7").unwrap()[0].name, "Renamed");
    }

    #[test]
    fn test_delete_by_id() {
        let repo = repo();
        repo.upsert(&employee("EMP001", "5")).unwrap();
        repo.delete_by_id("EMP404").unwrap();
        repo.delete_by_id("EMP001").unwrap();
        assert!(repo.list_all().unwrap().is_empty());
    }
}
