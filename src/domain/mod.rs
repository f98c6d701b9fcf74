// ==========================================
// 缝制线生产跟踪系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、派生字段不变量
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod employee;
pub mod input;
pub mod output;
pub mod types;

// 重导出核心类型
pub use employee::{Employee, EmployeeSkill};
pub use input::{InputRecord, InputSizeShade};
pub use output::{OutputRecord, OutputSizeShade};
pub use types::{BalanceStatus, Gender, MatchKey, MatchKeyField, RecordKind, SizeShadeKey};
