// ==========================================
// 缝制线生产跟踪系统 - 产出记录 API
// ==========================================
// 职责: 产出录入草稿（自动填充/对账）、保存、删除、批次对账预览
// 流程: 每次修改 → 整表读取快照 → AutofillOrchestrator::recompute
// 红线: 读取失败降级为空列表（记录日志）；写入失败返回错误
// 红线: 超出投入（负余量）允许保存，仅记录告警
// ==========================================

use serde::Serialize;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::{BalanceStatus, InputRecord, MatchKey, OutputRecord};
use crate::engine::{
    load_or_empty, saturating_sum, AutofillOrchestrator, ClaimEngine, DraftChange,
    InputAggregator, MatchKeyOptions, OutputDraft, RecordSnapshot,
};
use crate::repository::RecordStore;

// ==========================================
// ReconciliationPreview - 批次对账预览
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRow {
    pub size: String,
    pub shade: String,
    pub input_quantity: i64,
    pub output_quantity: i64, // 全部产出记录合计
    pub balance_quantity: i64,
    pub status: BalanceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationPreview {
    pub match_key: MatchKey,
    pub matching_inputs: usize,
    pub matching_outputs: usize,
    pub rows: Vec<PreviewRow>,
    pub total_input_quantity: i64,
    pub total_output_quantity: i64,
    pub total_balance_quantity: i64,
}

// ==========================================
// OutputApi - 产出记录 API
// ==========================================
pub struct OutputApi {
    inputs: Arc<dyn RecordStore<InputRecord>>,
    outputs: Arc<dyn RecordStore<OutputRecord>>,
    orchestrator: AutofillOrchestrator,
}

impl OutputApi {
    pub fn new(
        inputs: Arc<dyn RecordStore<InputRecord>>,
        outputs: Arc<dyn RecordStore<OutputRecord>>,
    ) -> Self {
        Self {
            inputs,
            outputs,
            orchestrator: AutofillOrchestrator::new(),
        }
    }

    fn snapshot(&self) -> RecordSnapshot {
        RecordSnapshot::load(self.inputs.as_ref(), self.outputs.as_ref())
    }

    /// 全部产出记录（按录入顺序）
    pub fn list_outputs(&self) -> Vec<OutputRecord> {
        load_or_empty(self.outputs.as_ref())
    }

    /// 匹配键各字段候选值
    pub fn match_key_options(&self) -> MatchKeyOptions {
        MatchKeyOptions::from_inputs(&load_or_empty(self.inputs.as_ref()))
    }

    /// 新产出草稿（匹配键可编辑，行为空）
    pub fn new_draft(&self) -> OutputDraft {
        OutputDraft::new_blank()
    }

    /// 打开已保存的产出记录（匹配键锁定）
    pub fn open_draft(&self, id: &str) -> ApiResult<OutputDraft> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidInput("产出记录ID不能为空".to_string()));
        }

        let record = self
            .outputs
            .find_by_id(id)?
            .ok_or_else(|| ApiError::NotFound(format!("产出记录(id={})不存在", id)))?;
        Ok(OutputDraft::existing(record))
    }

    /// 应用一次字段修改并重算
    pub fn apply_change(&self, draft: &OutputDraft, change: &DraftChange) -> OutputDraft {
        self.orchestrator.recompute(draft, change, &self.snapshot())
    }

    /// 按最新数据重新计算草稿（保留已录入产出数量）
    pub fn refresh_draft(&self, draft: &OutputDraft) -> OutputDraft {
        self.orchestrator.reseed(draft, &self.snapshot())
    }

    /// 保存产出草稿（存在则整体替换）
    ///
    /// # 返回
    /// - Ok(OutputRecord): 已持久化的记录（合计已重算）
    /// - Err(ApiError::ValidationError): 匹配键不完整
    /// - Err(ApiError): 存储写入失败
    pub fn save_draft(&self, draft: &OutputDraft) -> ApiResult<OutputRecord> {
        let mut record = draft.record.clone();
        if record.id.trim().is_empty() {
            return Err(ApiError::InvalidInput("产出记录ID不能为空".to_string()));
        }
        if !record.match_key.is_complete() {
            return Err(ApiError::ValidationError(
                "匹配键不完整（线号/客户/PO/款式/PF/颜色均为必填）".to_string(),
            ));
        }
        record.recompute_totals();

        if record.has_over_shipment() {
            warn!(
                output_id = %record.id,
                match_key = %record.match_key,
                total_balance_quantity = record.total_balance_quantity,
                "产出超出投入（存在负余量）"
            );
        }

        self.outputs.upsert(&record).map_err(|e| {
            error!(output_id = %record.id, error = %e, "产出记录保存失败");
            ApiError::from(e)
        })?;

        info!(
            output_id = %record.id,
            match_key = %record.match_key,
            total_output_quantity = record.total_output_quantity,
            total_balance_quantity = record.total_balance_quantity,
            "产出记录已保存"
        );
        Ok(record)
    }

    /// 删除产出记录（不存在时为 no-op）
    pub fn delete_output(&self, id: &str) -> ApiResult<()> {
        if id.trim().is_empty() {
            return Err(ApiError::InvalidInput("产出记录ID不能为空".to_string()));
        }

        self.outputs.delete_by_id(id).map_err(|e| {
            error!(output_id = id, error = %e, "产出记录删除失败");
            ApiError::from(e)
        })?;

        info!(output_id = id, "产出记录已删除");
        Ok(())
    }

    /// 批次对账预览：投入合计 vs 全部产出记录
    pub fn preview_reconciliation(&self, key: &MatchKey) -> ApiResult<ReconciliationPreview> {
        if !key.is_complete() {
            return Err(ApiError::InvalidInput(format!("匹配键不完整: {}", key)));
        }

        let snapshot = self.snapshot();
        let aggregator = InputAggregator::new();
        let aggregation = aggregator.aggregate(&snapshot.inputs, key);
        // 无当前记录：占用即全部产出
        let claimed = ClaimEngine::new().claimed(&snapshot.outputs, key, "");

        let mut rows: Vec<PreviewRow> = aggregation
            .iter()
            .map(|(pair, input_quantity)| {
                let output_quantity = claimed.get(pair);
                let balance_quantity = input_quantity.saturating_sub(output_quantity);
                PreviewRow {
                    size: pair.size.clone(),
                    shade: pair.shade.clone(),
                    input_quantity,
                    output_quantity,
                    balance_quantity,
                    status: BalanceStatus::from_balance(balance_quantity),
                }
            })
            .collect();

        // 产出中出现但投入中没有的尺码/色差
        for (pair, output_quantity) in claimed.iter() {
            if !aggregation.contains(pair) {
                rows.push(PreviewRow {
                    size: pair.size.clone(),
                    shade: pair.shade.clone(),
                    input_quantity: 0,
                    output_quantity,
                    balance_quantity: 0i64.saturating_sub(output_quantity),
                    status: BalanceStatus::from_balance(0i64.saturating_sub(output_quantity)),
                });
            }
        }

        let preview = ReconciliationPreview {
            match_key: key.clone(),
            matching_inputs: aggregator.matching_inputs(&snapshot.inputs, key).len(),
            matching_outputs: snapshot
                .outputs
                .iter()
                .filter(|o| &o.match_key == key)
                .count(),
            total_input_quantity: saturating_sum(rows.iter().map(|r| r.input_quantity)),
            total_output_quantity: saturating_sum(rows.iter().map(|r| r.output_quantity)),
            total_balance_quantity: saturating_sum(rows.iter().map(|r| r.balance_quantity)),
            rows,
        };
        Ok(preview)
    }
}
