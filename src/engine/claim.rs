// ==========================================
// 缝制线生产跟踪系统 - 已产出占用引擎
// ==========================================
// 职责: 汇总同批次其他产出记录已占用的数量（按尺码/色差）
// 红线: 排除当前正在编辑的记录本身（按ID），其实时数量由对账引擎处理
// ==========================================

use crate::domain::{MatchKey, OutputRecord, SizeShadeKey};
use crate::engine::quantity::SizeShadeTotals;
use tracing::debug;

// ==========================================
// ClaimEngine - 已产出占用引擎
// ==========================================
#[derive(Debug, Default, Clone, Copy)]
pub struct ClaimEngine;

impl ClaimEngine {
    pub fn new() -> Self {
        Self
    }

    /// 其他产出记录的已占用数量
    ///
    /// # 参数
    /// - `outputs`: 全部产出记录
    /// - `key`: 匹配键
    /// - `current_id`: 当前编辑记录ID（被排除）
    pub fn claimed(
        &self,
        outputs: &[OutputRecord],
        key: &MatchKey,
        current_id: &str,
    ) -> SizeShadeTotals {
        let mut claims = SizeShadeTotals::new();
        if !key.is_complete() {
            return claims;
        }

        let others: Vec<&OutputRecord> = outputs
            .iter()
            .filter(|o| &o.match_key == key && o.id != current_id)
            .collect();

        for output in &others {
            for row in &output.rows {
                claims.add(row.key(), row.output_quantity);
            }
        }

        debug!(
            match_key = %key,
            current_id,
            other_outputs = others.len(),
            claimed_total = claims.grand_total(),
            "已产出占用汇总完成"
        );
        claims
    }

    /// 单个尺码/色差的已占用数量
    pub fn claimed_for(
        &self,
        outputs: &[OutputRecord],
        key: &MatchKey,
        current_id: &str,
        pair: &SizeShadeKey,
    ) -> i64 {
        if !key.is_complete() {
            return 0;
        }
        outputs
            .iter()
            .filter(|o| &o.match_key == key && o.id != current_id)
            .flat_map(|o| o.rows.iter())
            .filter(|r| r.matches(pair))
            .map(|r| r.output_quantity)
            .fold(0, i64::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OutputSizeShade;

    fn key() -> MatchKey {
        MatchKey::new("5", "H&M", "PO123", "Basic Tee", "PF001", "Black")
    }

    fn output(id: &str, key: MatchKey, rows: &[(&str, &str, i64)]) -> OutputRecord {
        let mut record = OutputRecord::with_id(id);
        record.match_key = key;
        record.rows = rows
            .iter()
            .map(|(s, sh, q)| OutputSizeShade {
                size: s.to_string(),
                shade: sh.to_string(),
                input_quantity: 0,
                output_quantity: *q,
                balance_quantity: 0,
            })
            .collect();
        record.recompute_totals();
        record
    }

    #[test]
    fn test_claimed_excludes_current_record() {
        let outputs = vec![
            output("OUT1", key(), &[("M", "A", 80), ("L", "A", 10)]),
            output("OUT2", key(), &[("M", "A", 20)]),
            output("OUT3", key(), &[("M", "A", 1000)]),
        ];

        let claims = ClaimEngine::new().claimed(&outputs, &key(), "OUT3");
        assert_eq!(claims.get(&SizeShadeKey::new("M", "A")), 100);
        assert_eq!(claims.get(&SizeShadeKey::new("L", "A")), 10);
        assert_eq!(claims.get(&SizeShadeKey::new("S", "A")), 0);
    }

    #[test]
    fn test_claimed_ignores_other_cohorts() {
        let mut other = key();
        other.po = "PO999".to_string();
        let outputs = vec![output("OUT1", other, &[("M", "A", 80)])];

        assert!(ClaimEngine::new().claimed(&outputs, &key(), "NEW").is_empty());
    }

    #[test]
    fn test_claimed_for_single_pair() {
        let outputs = vec![
            output("OUT1", key(), &[("M", "A", 80)]),
            output("OUT2", key(), &[("M", "A", 5), ("L", "A", 7)]),
        ];
        let engine = ClaimEngine::new();
        let pair = SizeShadeKey::new("M", "A");

        assert_eq!(engine.claimed_for(&outputs, &key(), "OUT2", &pair), 80);
        assert_eq!(engine.claimed_for(&outputs, &key(), "NEW", &pair), 85);
    }
}
