// ==========================================
// 缝制线生产跟踪系统 - 应用层
// ==========================================
// 职责: 组装仓储/API，连接命令行前端与后端
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState, DB_PATH_ENV};
