// ==========================================
// 缝制线生产跟踪系统 - 投入汇总引擎
// ==========================================
// 职责: 按匹配键筛选投入记录（批次 cohort），按尺码/色差汇总数量
// 输入: 全部投入记录 + 匹配键
// 输出: SizeShadeTotals（无匹配时为空）
// 红线: 匹配键不完整时不做汇总
// ==========================================

use crate::domain::{InputRecord, MatchKey};
use crate::engine::quantity::SizeShadeTotals;
use tracing::debug;

// ==========================================
// InputAggregator - 投入汇总引擎
// ==========================================
// 红线: 无状态引擎,所有方法都是纯函数
#[derive(Debug, Default, Clone, Copy)]
pub struct InputAggregator;

impl InputAggregator {
    pub fn new() -> Self {
        Self
    }

    /// 同批次投入记录（按存储顺序）
    pub fn matching_inputs<'a>(
        &self,
        inputs: &'a [InputRecord],
        key: &MatchKey,
    ) -> Vec<&'a InputRecord> {
        if !key.is_complete() {
            return Vec::new();
        }
        inputs.iter().filter(|i| &i.match_key == key).collect()
    }

    /// 按尺码/色差汇总同批次投入数量
    pub fn aggregate(&self, inputs: &[InputRecord], key: &MatchKey) -> SizeShadeTotals {
        let cohort = self.matching_inputs(inputs, key);

        let mut totals = SizeShadeTotals::new();
        for input in &cohort {
            for row in &input.rows {
                totals.add(row.key(), row.quantity);
            }
        }

        debug!(
            match_key = %key,
            cohort_size = cohort.len(),
            pairs = totals.len(),
            input_total = totals.grand_total(),
            "投入汇总完成"
        );
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InputSizeShade, SizeShadeKey};

    fn key() -> MatchKey {
        MatchKey::new("5", "H&M", "PO123", "Basic Tee", "PF001", "Black")
    }

    fn input(id: &str, key: MatchKey, rows: &[(&str, &str, i64)]) -> InputRecord {
        InputRecord::new(
            id,
            key,
            None,
            rows.iter()
                .map(|(s, sh, q)| InputSizeShade::new(*s, *sh, *q))
                .collect(),
        )
    }

    #[test]
    fn test_aggregate_sums_across_batches() {
        let inputs = vec![
            input("A", key(), &[("M", "A", 500), ("L", "A", 700)]),
            input("B", key(), &[("M", "A", 300)]),
        ];

        let totals = InputAggregator::new().aggregate(&inputs, &key());
        assert_eq!(totals.get(&SizeShadeKey::new("M", "A")), 800);
        assert_eq!(totals.get(&SizeShadeKey::new("L", "A")), 700);
        assert_eq!(totals.keys()[0], SizeShadeKey::new("M", "A"));
        assert_eq!(totals.len(), 2);
    }

    #[test]
    fn test_aggregate_caps_extreme_quantities() {
        let huge = crate::engine::coerce_quantity("9223372036854775807");
        let inputs = vec![
            input("A", key(), &[("M", "A", huge)]),
            input("B", key(), &[("M", "A", huge)]),
        ];

        let totals = InputAggregator::new().aggregate(&inputs, &key());
        assert_eq!(totals.get(&SizeShadeKey::new("M", "A")), i64::MAX, "超大数量封顶而非回绕");
    }

    #[test]
    fn test_aggregate_total_equals_matching_input_total() {
        let mut other = key();
        other.color = "White".to_string();
        let inputs = vec![
            input("A", key(), &[("M", "A", 500), ("L", "B", 70)]),
            input("B", other.clone(), &[("M", "A", 999)]),
            input("C", key(), &[("S", "A", 5)]),
        ];

        let aggregator = InputAggregator::new();
        let expected: i64 = aggregator
            .matching_inputs(&inputs, &key())
            .iter()
            .map(|i| i.total_quantity)
            .sum();
        assert_eq!(aggregator.aggregate(&inputs, &key()).grand_total(), expected);
        assert_eq!(expected, 575);
    }

    #[test]
    fn test_no_match_yields_empty() {
        let inputs = vec![input("A", key(), &[("M", "A", 500)])];
        let mut other = key();
        other.buyer = "h&m".to_string();

        let totals = InputAggregator::new().aggregate(&inputs, &other);
        assert!(totals.is_empty());
        assert_eq!(totals.grand_total(), 0);
    }

    #[test]
    fn test_partial_key_yields_empty() {
        let mut partial = key();
        partial.pf = String::new();
        let inputs = vec![input("A", partial.clone(), &[("M", "A", 500)])];

        assert!(InputAggregator::new().aggregate(&inputs, &partial).is_empty());
    }
}
