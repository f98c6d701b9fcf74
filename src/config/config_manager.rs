// ==========================================
// 缝制线生产跟踪系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value)
// ==========================================

use crate::db::open_sqlite_connection;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::BTreeMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    pub fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 从 config_kv 表读取配置值，带默认值
    pub fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 写入配置值（存在则覆盖）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let key = key.trim();
        if key.is_empty() {
            return Err("配置键不能为空".into());
        }

        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;

        info!(config_key = key, value, "配置已更新");
        Ok(())
    }

    /// 列出全部配置（按键排序）
    pub fn list_configs(&self) -> Result<Vec<(String, String)>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt = conn.prepare("SELECT key, value FROM config_kv ORDER BY key")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// 获取所有配置的快照（JSON格式）
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let config_map: BTreeMap<String, String> = self.list_configs()?.into_iter().collect();
        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }

    // ===== 启动配置 =====

    /// 启动时是否写入演示数据（默认 false）
    pub fn seed_demo_data(&self) -> Result<bool, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::SEED_DEMO_DATA, "false")?;
        match value.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" | "" => Ok(false),
            other => {
                warn!(
                    config_key = config_keys::SEED_DEMO_DATA,
                    raw_value = other,
                    "配置值无法识别，按 false 处理"
                );
                Ok(false)
            }
        }
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 启动时写入演示员工/投入数据
    pub const SEED_DEMO_DATA: &str = "seed_demo_data";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn manager() -> ConfigManager {
        let conn = open_in_memory().expect("无法创建内存数据库");
        ConfigManager::from_connection(Arc::new(Mutex::new(conn))).expect("无法创建配置管理器")
    }

    #[test]
    fn test_get_missing_and_default() {
        let config = manager();
        assert_eq!(config.get_config_value("nope").unwrap(), None);
        assert_eq!(config.get_config_or_default("nope", "x").unwrap(), "x");
    }

    #[test]
    fn test_set_overwrites_and_lists_sorted() {
        let config = manager();
        config.set_config_value("b_key", "1").unwrap();
        config.set_config_value("a_key", "2").unwrap();
        config.set_config_value("b_key", "3").unwrap();

        let all = config.list_configs().unwrap();
        assert_eq!(
            all,
            vec![
                ("a_key".to_string(), "2".to_string()),
                ("b_key".to_string(), "3".to_string())
            ]
        );

        let snapshot: serde_json::Value =
            serde_json::from_str(&config.get_config_snapshot().unwrap()).unwrap();
        assert_eq!(snapshot["b_key"], "3");
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(manager().set_config_value("  ", "v").is_err());
    }

    #[test]
    fn test_seed_demo_data_flag() {
        let config = manager();
        assert!(!config.seed_demo_data().unwrap(), "默认不写入演示数据");

        config.set_config_value(config_keys::SEED_DEMO_DATA, "TRUE").unwrap();
        assert!(config.seed_demo_data().unwrap());

        config.set_config_value(config_keys::SEED_DEMO_DATA, "maybe").unwrap();
        assert!(!config.seed_demo_data().unwrap());
    }
}
