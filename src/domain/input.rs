// ==========================================
// 缝制线生产跟踪系统 - 投入记录领域模型
// ==========================================
// 用途: 缝制线投入（按尺码/色差登记数量）
// 红线: total_quantity 恒等于各行 quantity 之和，每次改行后重算
// ==========================================

use crate::domain::types::{optional_date, MatchKey, RecordKind, SizeShadeKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// InputSizeShade - 投入行
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSizeShade {
    pub size: String,
    pub shade: String,
    pub quantity: i64, // >= 0
}

impl InputSizeShade {
    pub fn new(size: impl Into<String>, shade: impl Into<String>, quantity: i64) -> Self {
        Self {
            size: size.into(),
            shade: shade.into(),
            quantity: quantity.max(0),
        }
    }

    pub fn key(&self) -> SizeShadeKey {
        SizeShadeKey::new(self.size.clone(), self.shade.clone())
    }
}

// ==========================================
// InputRecord - 投入记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputRecord {
    pub id: String,
    #[serde(with = "optional_date", default)]
    pub date: Option<NaiveDate>,
    #[serde(flatten)]
    pub match_key: MatchKey,
    #[serde(with = "optional_date", default)]
    pub sewing_finish_date: Option<NaiveDate>,
    #[serde(rename = "sizeShadeQty")]
    pub rows: Vec<InputSizeShade>,
    pub total_quantity: i64,
}

impl InputRecord {
    /// 新投入记录：生成ID，预置一行空尺码/色差
    pub fn new_blank() -> Self {
        Self {
            id: RecordKind::Input.generate_id(),
            date: None,
            match_key: MatchKey::default(),
            sewing_finish_date: None,
            rows: vec![InputSizeShade::default()],
            total_quantity: 0,
        }
    }

    /// 由行构造记录并计算合计
    pub fn new(
        id: impl Into<String>,
        match_key: MatchKey,
        sewing_finish_date: Option<NaiveDate>,
        rows: Vec<InputSizeShade>,
    ) -> Self {
        let mut record = Self {
            id: id.into(),
            date: None,
            match_key,
            sewing_finish_date,
            rows,
            total_quantity: 0,
        };
        record.recompute_total();
        record
    }

    /// 重算合计（派生字段）
    pub fn recompute_total(&mut self) {
        self.total_quantity = self
            .rows
            .iter()
            .map(|r| r.quantity)
            .fold(0, i64::saturating_add);
    }

    pub fn add_row(&mut self) {
        self.rows.push(InputSizeShade::default());
    }

    /// 删除行（至少保留一行）
    pub fn remove_row(&mut self, index: usize) -> bool {
        if self.rows.len() <= 1 || index >= self.rows.len() {
            return false;
        }
        self.rows.remove(index);
        self.recompute_total();
        true
    }

    /// 修改行数量（负数按0处理）
    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> bool {
        match self.rows.get_mut(index) {
            Some(row) => {
                row.quantity = quantity.max(0);
                self.recompute_total();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> InputRecord {
        InputRecord::new(
            "INP001",
            MatchKey::new("5", "H&M", "PO123", "Basic Tee", "PF001", "Black"),
            NaiveDate::from_ymd_opt(2024, 7, 30),
            vec![
                InputSizeShade::new("M", "A", 500),
                InputSizeShade::new("L", "A", 700),
            ],
        )
    }

    #[test]
    fn test_total_follows_rows() {
        let mut input = sample();
        assert_eq!(input.total_quantity, 1200);

        assert!(input.set_quantity(0, 300));
        assert_eq!(input.total_quantity, 1000);

        assert!(input.set_quantity(1, -5));
        assert_eq!(input.rows[1].quantity, 0);
        assert_eq!(input.total_quantity, 300);

        assert!(!input.set_quantity(9, 1));
    }

    #[test]
    fn test_total_saturates_on_extreme_rows() {
        let mut input = sample();
        input.rows[0].quantity = i64::MAX;
        input.rows[1].quantity = i64::MAX;
        input.recompute_total();
        assert_eq!(input.total_quantity, i64::MAX);
    }

    #[test]
    fn test_remove_row_keeps_at_least_one() {
        let mut input = sample();
        assert!(input.remove_row(1));
        assert_eq!(input.total_quantity, 500);
        assert!(!input.remove_row(0));
    }

    #[test]
    fn test_serde_flattens_match_key() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["lineNumber"], "5");
        assert_eq!(json["sizeShadeQty"][1]["quantity"], 700);
        assert_eq!(json["totalQuantity"], 1200);
        assert_eq!(json["date"], "");

        let back: InputRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }
}
