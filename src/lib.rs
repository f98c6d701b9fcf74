// ==========================================
// 缝制线生产跟踪系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 缝制线员工档案 / 投入 / 产出对账
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 数据访问
pub mod repository;

// 引擎层 - 汇总与对账
pub mod engine;

// 导入层 - 外部表格
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 业务接口
pub mod api;

// 应用层 - 组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{BalanceStatus, Gender, MatchKey, MatchKeyField, RecordKind, SizeShadeKey};

// 领域实体
pub use domain::{Employee, EmployeeSkill, InputRecord, InputSizeShade, OutputRecord, OutputSizeShade};

// 引擎
pub use engine::{
    AutofillOrchestrator, ClaimEngine, DraftChange, DraftMode, InputAggregator, MatchKeyOptions,
    OutputDraft, ReconciliationEngine, RecordSnapshot,
};

// 存储
pub use repository::{InMemoryRecordStore, RecordStore};

// API
pub use api::{ApiError, ApiResult, EmployeeApi, InputApi, OutputApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "缝制线生产跟踪系统";
