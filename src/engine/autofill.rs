// ==========================================
// 缝制线生产跟踪系统 - 自动填充编排器
// ==========================================
// 用途: 产出录入草稿的显式重算入口 recompute(state, change) -> new state
// 流程: 投入汇总 → 已产出占用 → 对账生成行 → 重算合计
// 红线: 已存在记录的匹配键锁定，键字段修改被忽略
// 红线: 匹配键不完整或无匹配投入时清空行集合，不做猜测
// ==========================================

use crate::domain::{MatchKeyField, OutputRecord, SizeShadeKey};
use crate::engine::aggregation::InputAggregator;
use crate::engine::claim::ClaimEngine;
use crate::engine::quantity::coerce_quantity;
use crate::engine::reconciliation::ReconciliationEngine;
use crate::engine::snapshot::RecordSnapshot;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

// ==========================================
// DraftMode / OutputDraft - 录入草稿
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftMode {
    New,      // 新建（匹配键可编辑）
    Existing, // 编辑已保存记录（匹配键锁定）
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDraft {
    pub record: OutputRecord,
    pub mode: DraftMode,
}

impl OutputDraft {
    pub fn new_blank() -> Self {
        Self {
            record: OutputRecord::new_blank(),
            mode: DraftMode::New,
        }
    }

    pub fn existing(record: OutputRecord) -> Self {
        Self {
            record,
            mode: DraftMode::Existing,
        }
    }

    pub fn is_key_locked(&self) -> bool {
        self.mode == DraftMode::Existing
    }
}

/// 草稿上的一次字段修改
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DraftChange {
    MatchKeyField { field: MatchKeyField, value: String },
    OutputQuantity { pair: SizeShadeKey, raw: String },
    Date { date: Option<NaiveDate> },
}

// ==========================================
// AutofillOrchestrator - 自动填充编排器
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct AutofillOrchestrator {
    aggregator: InputAggregator,
    claims: ClaimEngine,
    reconciliation: ReconciliationEngine,
}

impl AutofillOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 应用一次修改并返回重算后的草稿
    ///
    /// # 参数
    /// - `draft`: 当前草稿
    /// - `change`: 修改内容
    /// - `snapshot`: 投入/产出记录快照
    ///
    /// # 返回
    /// 新草稿（合计已重算）
    pub fn recompute(
        &self,
        draft: &OutputDraft,
        change: &DraftChange,
        snapshot: &RecordSnapshot,
    ) -> OutputDraft {
        let mut next = draft.clone();

        match change {
            DraftChange::MatchKeyField { field, value } => {
                if draft.is_key_locked() {
                    warn!(
                        output_id = %draft.record.id,
                        field = field.column_name(),
                        "已保存记录的匹配键不可修改，忽略"
                    );
                    return next;
                }
                next.record.match_key.set(*field, value.clone());
                self.seed(&mut next.record, snapshot);
            }
            DraftChange::OutputQuantity { pair, raw } => {
                self.edit_output(&mut next.record, pair, raw, snapshot);
            }
            DraftChange::Date { date } => {
                next.record.date = *date;
            }
        }

        self.reconciliation.recompute_totals(&mut next.record);
        next
    }

    /// 按当前匹配键重新生成行（无数据变化时结果不变）
    pub fn reseed(&self, draft: &OutputDraft, snapshot: &RecordSnapshot) -> OutputDraft {
        let mut next = draft.clone();
        self.seed(&mut next.record, snapshot);
        self.reconciliation.recompute_totals(&mut next.record);
        next
    }

    fn seed(&self, record: &mut OutputRecord, snapshot: &RecordSnapshot) {
        let key = record.match_key.clone();
        let cohort = self.aggregator.matching_inputs(&snapshot.inputs, &key);

        let Some(first) = cohort.first() else {
            debug!(output_id = %record.id, match_key = %key, "无匹配投入，清空产出行");
            record.rows.clear();
            record.sewing_finish_date = None;
            return;
        };
        record.sewing_finish_date = first.sewing_finish_date;

        let aggregation = self.aggregator.aggregate(&snapshot.inputs, &key);
        let claimed = self.claims.claimed(&snapshot.outputs, &key, &record.id);
        record.rows = self
            .reconciliation
            .seed_rows(&aggregation, &claimed, &record.rows);

        debug!(
            output_id = %record.id,
            match_key = %key,
            rows = record.rows.len(),
            "产出行已生成"
        );
    }

    fn edit_output(
        &self,
        record: &mut OutputRecord,
        pair: &SizeShadeKey,
        raw: &str,
        snapshot: &RecordSnapshot,
    ) {
        let claimed_by_others =
            self.claims
                .claimed_for(&snapshot.outputs, &record.match_key, &record.id, pair);

        let Some(row) = record.row_mut(pair) else {
            debug!(output_id = %record.id, pair = %pair, "尺码/色差不在产出行中，忽略");
            return;
        };
        *row = self
            .reconciliation
            .apply_output_edit(row, claimed_by_others, coerce_quantity(raw));
    }
}
