// ==========================================
// 缝制线生产跟踪系统 - 引擎层
// ==========================================
// 职责: 投入汇总、已产出占用、对账、自动填充
// 红线: Engine 不拼 SQL, 只处理内存快照
// 红线: 引擎均为纯函数,读取失败在快照层降级
// ==========================================

pub mod aggregation;
pub mod autofill;
pub mod claim;
pub mod options;
pub mod quantity;
pub mod reconciliation;
pub mod snapshot;

// 重导出核心引擎
pub use aggregation::InputAggregator;
pub use autofill::{AutofillOrchestrator, DraftChange, DraftMode, OutputDraft};
pub use claim::ClaimEngine;
pub use options::MatchKeyOptions;
pub use quantity::{coerce_quantity, saturating_sum, SizeShadeTotals};
pub use reconciliation::ReconciliationEngine;
pub use snapshot::{load_or_empty, RecordSnapshot};
