// ==========================================
// 缝制线生产跟踪系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::api::{ApiResult, EmployeeApi, InputApi, OutputApi};
use crate::config::ConfigManager;
use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::{Employee, InputRecord, OutputRecord};
use crate::repository::{
    seed_demo_data_if_empty, EmployeeRepository, InputRecordRepository, OutputRecordRepository,
    RecordStore, SeedSummary,
};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "SEWING_LINE_TRACKER_DB_PATH";

/// 应用状态
///
/// 包含所有API实例和共享资源（单一共享连接）
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 员工档案API
    pub employee_api: Arc<EmployeeApi>,

    /// 投入记录API
    pub input_api: Arc<InputApi>,

    /// 产出记录API
    pub output_api: Arc<OutputApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,

    employee_store: Arc<dyn RecordStore<Employee>>,
    input_store: Arc<dyn RecordStore<InputRecord>>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 打开共享连接并建表（幂等）
    /// 2. 初始化所有Repository
    /// 3. 创建所有API实例
    /// 4. 按配置写入演示数据
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!(db_path = %db_path, "初始化AppState");

        let conn = open_sqlite_connection(&db_path).map_err(|e| format!("无法打开数据库: {}", e))?;
        init_schema(&conn).map_err(|e| format!("数据库初始化失败: {}", e))?;
        Self::from_connection(db_path, Arc::new(Mutex::new(conn)))
    }

    /// 从已初始化的共享连接创建（测试 / 内存数据库）
    pub fn from_connection(db_path: String, conn: Arc<Mutex<Connection>>) -> Result<Self, String> {
        // ==========================================
        // 初始化Repository层
        // ==========================================
        let employee_store: Arc<dyn RecordStore<Employee>> =
            Arc::new(EmployeeRepository::from_connection(conn.clone()));
        let input_store: Arc<dyn RecordStore<InputRecord>> =
            Arc::new(InputRecordRepository::from_connection(conn.clone()));
        let output_store: Arc<dyn RecordStore<OutputRecord>> =
            Arc::new(OutputRecordRepository::from_connection(conn.clone()));

        let config_manager = Arc::new(
            ConfigManager::from_connection(conn)
                .map_err(|e| format!("无法创建ConfigManager: {}", e))?,
        );

        // ==========================================
        // 创建API实例
        // ==========================================
        let state = Self {
            db_path,
            employee_api: Arc::new(EmployeeApi::new(employee_store.clone())),
            input_api: Arc::new(InputApi::new(input_store.clone())),
            output_api: Arc::new(OutputApi::new(input_store.clone(), output_store)),
            config_manager,
            employee_store,
            input_store,
        };

        // 演示数据（best-effort：失败不阻塞启动）
        match state.config_manager.seed_demo_data() {
            Ok(true) => {
                if let Err(e) = state.seed_demo_data() {
                    tracing::warn!(error = %e, "演示数据写入失败(将继续启动)");
                }
            }
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "读取演示数据配置失败(将继续启动)"),
        }

        tracing::info!(db_path = %state.db_path, "AppState初始化完成");
        Ok(state)
    }

    /// 写入演示员工/投入数据（仅对空表生效）
    pub fn seed_demo_data(&self) -> ApiResult<SeedSummary> {
        let summary =
            seed_demo_data_if_empty(self.employee_store.as_ref(), self.input_store.as_ref())?;
        tracing::info!(
            employees_seeded = summary.employees_seeded,
            inputs_seeded = summary.inputs_seeded,
            "演示数据写入完成"
        );
        Ok(summary)
    }
}

/// 获取默认数据库路径
///
/// 优先级: 环境变量 → 用户数据目录 → 当前目录
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./sewing_line_tracker.db");

    if let Some(data_dir) = dirs::data_dir() {
        // 开发环境使用独立目录，避免污染生产数据
        #[cfg(debug_assertions)]
        let dir = data_dir.join("sewing-line-tracker-dev");

        #[cfg(not(debug_assertions))]
        let dir = data_dir.join("sewing-line-tracker");

        // 目录创建失败时保留当前目录回退值
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("sewing_line_tracker.db");
        }
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config_keys;
    use crate::db::open_in_memory;

    fn memory_state() -> AppState {
        let conn = open_in_memory().expect("无法创建内存数据库");
        AppState::from_connection(":memory:".to_string(), Arc::new(Mutex::new(conn)))
            .expect("无法创建AppState")
    }

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_seed_demo_data_only_once() {
        let state = memory_state();
        assert!(state.input_api.list_inputs().is_empty(), "默认不写入演示数据");

        let first = state.seed_demo_data().unwrap();
        assert_eq!(first.employees_seeded, 2);
        assert_eq!(first.inputs_seeded, 2);

        let second = state.seed_demo_data().unwrap();
        assert_eq!(second, SeedSummary::default());
        assert_eq!(state.employee_api.list_employees().len(), 2);
    }

    #[test]
    fn test_seed_on_startup_when_configured() {
        let conn = Arc::new(Mutex::new(open_in_memory().expect("无法创建内存数据库")));
        ConfigManager::from_connection(conn.clone())
            .unwrap()
            .set_config_value(config_keys::SEED_DEMO_DATA, "true")
            .unwrap();

        let state = AppState::from_connection(":memory:".to_string(), conn).unwrap();
        assert_eq!(state.input_api.list_inputs().len(), 2);
        assert!(state.output_api.list_outputs().is_empty());
    }
}
