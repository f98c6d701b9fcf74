// ==========================================
// 缝制线生产跟踪系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行前端调用
// ==========================================

pub mod employee_api;
pub mod error;
pub mod input_api;
pub mod output_api;

// 重导出核心类型
pub use employee_api::EmployeeApi;
pub use error::{ApiError, ApiResult};
pub use input_api::InputApi;
pub use output_api::{OutputApi, PreviewRow, ReconciliationPreview};
