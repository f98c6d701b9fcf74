// ==========================================
// 缝制线生产跟踪系统 - 产出记录领域模型
// ==========================================
// 用途: 缝制线产出（按尺码/色差对账投入）
// 红线: total_output_quantity / total_balance_quantity 为派生字段，每次改行后重算
// 红线: balance_quantity 允许为负（超出投入），不得截断
// ==========================================

use crate::domain::types::{optional_date, BalanceStatus, MatchKey, RecordKind, SizeShadeKey};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// OutputSizeShade - 产出行
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSizeShade {
    pub size: String,
    pub shade: String,
    pub input_quantity: i64,   // 批次投入合计
    pub output_quantity: i64,  // 本记录产出 (>= 0)
    pub balance_quantity: i64, // 投入 - 其他记录已产出 - 本记录产出
}

impl OutputSizeShade {
    pub fn key(&self) -> SizeShadeKey {
        SizeShadeKey::new(self.size.clone(), self.shade.clone())
    }

    pub fn matches(&self, key: &SizeShadeKey) -> bool {
        self.size == key.size && self.shade == key.shade
    }

    pub fn balance_status(&self) -> BalanceStatus {
        BalanceStatus::from_balance(self.balance_quantity)
    }
}

// ==========================================
// OutputRecord - 产出记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputRecord {
    pub id: String,
    #[serde(with = "optional_date", default)]
    pub date: Option<NaiveDate>,
    #[serde(flatten)]
    pub match_key: MatchKey,
    #[serde(with = "optional_date", default)]
    pub sewing_finish_date: Option<NaiveDate>,
    #[serde(rename = "sizeShadeQty")]
    pub rows: Vec<OutputSizeShade>,
    pub total_output_quantity: i64,
    pub total_balance_quantity: i64,
}

impl OutputRecord {
    /// 新产出记录：生成ID，行集合为空（由自动填充生成）
    pub fn new_blank() -> Self {
        Self::with_id(RecordKind::Output.generate_id())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            date: None,
            match_key: MatchKey::default(),
            sewing_finish_date: None,
            rows: Vec::new(),
            total_output_quantity: 0,
            total_balance_quantity: 0,
        }
    }

    /// 重算合计（派生字段）
    pub fn recompute_totals(&mut self) {
        self.total_output_quantity = self
            .rows
            .iter()
            .map(|r| r.output_quantity)
            .fold(0, i64::saturating_add);
        self.total_balance_quantity = self
            .rows
            .iter()
            .map(|r| r.balance_quantity)
            .fold(0, i64::saturating_add);
    }

    pub fn row(&self, key: &SizeShadeKey) -> Option<&OutputSizeShade> {
        self.rows.iter().find(|r| r.matches(key))
    }

    pub fn row_mut(&mut self, key: &SizeShadeKey) -> Option<&mut OutputSizeShade> {
        self.rows.iter_mut().find(|r| r.matches(key))
    }

    /// 是否存在超出投入的行
    pub fn has_over_shipment(&self) -> bool {
        self.rows
            .iter()
            .any(|r| r.balance_status() == BalanceStatus::OverShipped)
    }
}
