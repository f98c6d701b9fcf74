// ==========================================
// 缝制线生产跟踪系统 - 员工档案 API
// ==========================================
// 职责: 员工档案的查询、新建、保存、删除
// 红线: 读取失败降级为空列表（记录日志）；写入失败返回错误
// ==========================================

use std::sync::Arc;
use tracing::{error, info};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::Employee;
use crate::engine::snapshot::load_or_empty;
use crate::repository::RecordStore;

// ==========================================
// EmployeeApi - 员工档案 API
// ==========================================
pub struct EmployeeApi {
    store: Arc<dyn RecordStore<Employee>>,
}

impl EmployeeApi {
    pub fn new(store: Arc<dyn RecordStore<Employee>>) -> Self {
        Self { store }
    }

    /// 全部员工（按录入顺序）
    pub fn list_employees(&self) -> Vec<Employee> {
        load_or_empty(self.store.as_ref())
    }

    /// 按ID查询员工
    ///
    /// # 返回
    /// - Ok(Employee): 员工档案
    /// - Err(ApiError::NotFound): 不存在
    pub fn get_employee(&self, id: &str) -> ApiResult<Employee> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidInput("员工ID不能为空".to_string()));
        }

        self.store
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("员工(id={})不存在", id)))
    }

    /// 新员工档案（已生成ID，预置一行空技能）
    pub fn new_employee(&self) -> Employee {
        Employee::new_blank()
    }

    /// 删除技能行（至少保留一行）
    pub fn remove_skill(&self, employee: &mut Employee, index: usize) -> ApiResult<()> {
        if index >= employee.skills.len() {
            return Err(ApiError::InvalidInput(format!(
                "技能行下标越界: {} (共{}行)",
                index,
                employee.skills.len()
            )));
        }
        if !employee.remove_skill(index) {
            return Err(ApiError::ValidationError("至少保留一行技能".to_string()));
        }
        Ok(())
    }

    /// 保存员工档案（存在则整体替换）
    ///
    /// # 返回
    /// - Ok(()): 已持久化
    /// - Err(ApiError::ValidationError): 必填字段缺失
    /// - Err(ApiError): 存储写入失败
    pub fn save_employee(&self, employee: &Employee) -> ApiResult<()> {
        let missing = employee.missing_required_fields();
        if !missing.is_empty() {
            return Err(ApiError::ValidationError(format!(
                "必填字段缺失: {}",
                missing.join(", ")
            )));
        }

        self.store.upsert(employee).map_err(|e| {
            error!(employee_id = %employee.id, error = %e, "员工档案保存失败");
            ApiError::from(e)
        })?;

        info!(employee_id = %employee.id, name = %employee.name, "员工档案已保存");
        Ok(())
    }

    /// 删除员工档案（不存在时为 no-op）
    pub fn delete_employee(&self, id: &str) -> ApiResult<()> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidInput("员工ID不能为空".to_string()));
        }

        self.store.delete_by_id(id).map_err(|e| {
            error!(employee_id = id, error = %e, "员工档案删除失败");
            ApiError::from(e)
        })?;

        info!(employee_id = id, "员工档案已删除");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryRecordStore;

    fn api() -> EmployeeApi {
        EmployeeApi::new(Arc::new(InMemoryRecordStore::<Employee>::new()))
    }

    #[test]
    fn test_save_requires_name_and_designation() {
        let api = api();
        let mut employee = api.new_employee();

        let result = api.save_employee(&employee);
        assert!(matches!(result, Err(ApiError::ValidationError(msg)) if msg.contains("name")));
        assert!(api.list_employees().is_empty(), "校验失败时不应写入");

        employee.name = "John Doe".to_string();
        employee.designation = "Operator".to_string();
        api.save_employee(&employee).unwrap();

        let loaded = api.get_employee(&employee.id).unwrap();
        assert_eq!(loaded, employee);
    }

    #[test]
    fn test_save_replaces_existing() {
        let api = api();
        let mut employee = Employee::with_id("EMP001");
        employee.name = "John Doe".to_string();
        employee.designation = "Operator".to_string();
        api.save_employee(&employee).unwrap();

        employee.designation = "Supervisor".to_string();
        api.save_employee(&employee).unwrap();

        let all = api.list_employees();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].designation, "Supervisor");
    }

    #[test]
    fn test_get_and_delete() {
        let api = api();
        assert!(matches!(api.get_employee("EMP404"), Err(ApiError::NotFound(_))));
        assert!(matches!(api.get_employee(" "), Err(ApiError::InvalidInput(_))));
        api.delete_employee("EMP404").unwrap();
    }

    #[test]
    fn test_remove_last_skill_is_refused() {
        let api = api();
        let mut employee = api.new_employee();

        assert!(matches!(
            api.remove_skill(&mut employee, 0),
            Err(ApiError::ValidationError(_))
        ));
        assert!(matches!(
            api.remove_skill(&mut employee, 5),
            Err(ApiError::InvalidInput(_))
        ));

        employee.add_skill();
        api.remove_skill(&mut employee, 1).unwrap();
        assert_eq!(employee.skills.len(), 1);
    }
}
