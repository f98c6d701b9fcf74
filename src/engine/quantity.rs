// ==========================================
// 缝制线生产跟踪系统 - 数量解析与汇总容器
// ==========================================
// 红线: 非数字输入一律按0处理，禁止把无效数值带入汇总
// 红线: 汇总一律饱和运算，极大值封顶于 i64::MAX，不溢出
// ==========================================

use crate::domain::SizeShadeKey;
use std::collections::HashMap;

/// 将录入文本转换为数量
///
/// 规则:
/// - 去空白后按整数解析
/// - 失败时按有限小数解析并向零取整
/// - 空串 / 非数字 / NaN / 无穷 → 0
/// - 负数 → 0（录入数量不得为负）
pub fn coerce_quantity(raw: &str) -> i64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0;
    }

    let parsed = match trimmed.parse::<i64>() {
        Ok(v) => v,
        Err(_) => match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => v.trunc() as i64,
            _ => 0,
        },
    };

    parsed.max(0)
}

/// 饱和求和（超出范围时封顶，不回绕）
pub fn saturating_sum<I: IntoIterator<Item = i64>>(values: I) -> i64 {
    values.into_iter().fold(0, i64::saturating_add)
}

// ==========================================
// SizeShadeTotals - 按尺码/色差汇总的数量
// ==========================================
// 保持首次出现顺序（投入记录顺序 → 行顺序），缺失键读作0
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeShadeTotals {
    order: Vec<SizeShadeKey>,
    totals: HashMap<SizeShadeKey, i64>,
}

impl SizeShadeTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加数量（饱和加法）
    pub fn add(&mut self, key: SizeShadeKey, quantity: i64) {
        match self.totals.get_mut(&key) {
            Some(total) => *total = total.saturating_add(quantity),
            None => {
                self.order.push(key.clone());
                self.totals.insert(key, quantity);
            }
        }
    }

    /// 读取数量（缺失键为0）
    pub fn get(&self, key: &SizeShadeKey) -> i64 {
        self.totals.get(key).copied().unwrap_or(0)
    }

    pub fn contains(&self, key: &SizeShadeKey) -> bool {
        self.totals.contains_key(key)
    }

    /// 按首次出现顺序遍历
    pub fn iter(&self) -> impl Iterator<Item = (&SizeShadeKey, i64)> + '_ {
        self.order.iter().map(move |k| (k, self.get(k)))
    }

    pub fn keys(&self) -> &[SizeShadeKey] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// 全部数量之和
    pub fn grand_total(&self) -> i64 {
        saturating_sum(self.totals.values().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_quantity() {
        assert_eq!(coerce_quantity("200"), 200);
        assert_eq!(coerce_quantity("  42 "), 42);
        assert_eq!(coerce_quantity("12.9"), 12);
        assert_eq!(coerce_quantity(""), 0);
        assert_eq!(coerce_quantity("abc"), 0);
        assert_eq!(coerce_quantity("NaN"), 0);
        assert_eq!(coerce_quantity("inf"), 0);
        assert_eq!(coerce_quantity("-5"), 0);
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let huge = coerce_quantity("9223372036854775807");
        assert_eq!(huge, i64::MAX);

        let mut totals = SizeShadeTotals::new();
        totals.add(SizeShadeKey::new("M", "A"), huge);
        totals.add(SizeShadeKey::new("M", "A"), huge);
        totals.add(SizeShadeKey::new("L", "A"), 10);

        assert_eq!(totals.get(&SizeShadeKey::new("M", "A")), i64::MAX);
        assert_eq!(totals.grand_total(), i64::MAX);
        assert_eq!(saturating_sum([i64::MIN, -1]), i64::MIN);
    }

    #[test]
    fn test_totals_keep_first_seen_order() {
        let mut totals = SizeShadeTotals::new();
        totals.add(SizeShadeKey::new("M", "A"), 500);
        totals.add(SizeShadeKey::new("L", "A"), 700);
        totals.add(SizeShadeKey::new("M", "A"), 300);

        let collected: Vec<(String, i64)> = totals
            .iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(collected, vec![("M/A".to_string(), 800), ("L/A".to_string(), 700)]);
        assert_eq!(totals.grand_total(), 1500);
        assert_eq!(totals.get(&SizeShadeKey::new("XL", "A")), 0);
    }
}
