// ==========================================
// 缝制线生产跟踪系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供数据访问接口,屏蔽存储细节
// 约束: 所有查询使用参数化,防止 SQL 注入
// ==========================================

pub mod employee_repo;
pub mod error;
pub mod input_repo;
pub mod memory_store;
pub mod output_repo;
pub mod record_store;
pub mod seed;

// 重导出核心仓储
pub use employee_repo::EmployeeRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use input_repo::InputRecordRepository;
pub use memory_store::InMemoryRecordStore;
pub use output_repo::OutputRecordRepository;
pub use record_store::{RecordStore, StoredRecord};
pub use seed::{seed_demo_data_if_empty, SeedSummary};
