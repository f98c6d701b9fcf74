// ==========================================
// 缝制线生产跟踪系统 - 对账引擎
// ==========================================
// 职责: 合并投入汇总 + 已产出占用 + 本记录录入数量，计算每行余量
// 公式: balance = 投入合计 - 其他记录已产出 - 本记录产出
// 红线: 负余量合法（超出投入），不得截断为0，也不报错
// 红线: 每次改行后重算合计
// ==========================================

use crate::domain::{OutputRecord, OutputSizeShade};
use crate::engine::quantity::SizeShadeTotals;
use tracing::debug;

// ==========================================
// ReconciliationEngine - 对账引擎
// ==========================================
// 红线: 无状态引擎,所有方法都是纯函数
#[derive(Debug, Default, Clone, Copy)]
pub struct ReconciliationEngine;

impl ReconciliationEngine {
    pub fn new() -> Self {
        Self
    }

    /// 生成（或重新生成）产出行集合
    ///
    /// # 参数
    /// - `aggregation`: 投入汇总（决定行集合及顺序）
    /// - `claims`: 其他记录已产出
    /// - `previous_rows`: 当前记录已有的行（同尺码/色差保留已录入的产出数量）
    pub fn seed_rows(
        &self,
        aggregation: &SizeShadeTotals,
        claims: &SizeShadeTotals,
        previous_rows: &[OutputSizeShade],
    ) -> Vec<OutputSizeShade> {
        aggregation
            .iter()
            .map(|(pair, input_quantity)| {
                let output_quantity = previous_rows
                    .iter()
                    .find(|r| r.matches(pair))
                    .map(|r| r.output_quantity)
                    .unwrap_or(0);

                OutputSizeShade {
                    size: pair.size.clone(),
                    shade: pair.shade.clone(),
                    input_quantity,
                    output_quantity,
                    balance_quantity: input_quantity
                        .saturating_sub(claims.get(pair))
                        .saturating_sub(output_quantity),
                }
            })
            .collect()
    }

    /// 单行产出数量修改
    ///
    /// # 参数
    /// - `row`: 原行（尺码、色差、投入合计不变）
    /// - `claimed_by_others`: 其他记录已产出（不含本记录）
    /// - `new_output_quantity`: 新录入的产出数量
    pub fn apply_output_edit(
        &self,
        row: &OutputSizeShade,
        claimed_by_others: i64,
        new_output_quantity: i64,
    ) -> OutputSizeShade {
        let balance_quantity = row
            .input_quantity
            .saturating_sub(claimed_by_others)
            .saturating_sub(new_output_quantity);

        debug!(
            size = %row.size,
            shade = %row.shade,
            input_quantity = row.input_quantity,
            claimed_by_others,
            output_quantity = new_output_quantity,
            balance_quantity,
            "产出行余量已重算"
        );

        OutputSizeShade {
            size: row.size.clone(),
            shade: row.shade.clone(),
            input_quantity: row.input_quantity,
            output_quantity: new_output_quantity,
            balance_quantity,
        }
    }

    /// 重算记录合计
    pub fn recompute_totals(&self, record: &mut OutputRecord) {
        record.recompute_totals();
    }
}
