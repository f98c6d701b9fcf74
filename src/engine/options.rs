// ==========================================
// 缝制线生产跟踪系统 - 匹配键候选值
// ==========================================
// 用途: 产出录入时各匹配键字段的下拉候选（取自全部投入记录）
// 规则: 各字段独立去重，保持首次出现顺序，忽略空值
// ==========================================

use crate::domain::{InputRecord, MatchKeyField};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchKeyOptions {
    pub line_numbers: Vec<String>,
    pub buyers: Vec<String>,
    pub pos: Vec<String>,
    pub styles: Vec<String>,
    pub pfs: Vec<String>,
    pub colors: Vec<String>,
}

impl MatchKeyOptions {
    pub fn from_inputs(inputs: &[InputRecord]) -> Self {
        let mut options = Self::default();
        for input in inputs {
            for field in MatchKeyField::ALL {
                let value = input.match_key.get(field);
                if value.trim().is_empty() {
                    continue;
                }
                let values = options.values_mut(field);
                if !values.iter().any(|v| v == value) {
                    values.push(value.to_string());
                }
            }
        }
        options
    }

    pub fn values(&self, field: MatchKeyField) -> &[String] {
        match field {
            MatchKeyField::LineNumber => &self.line_numbers,
            MatchKeyField::Buyer => &self.buyers,
            MatchKeyField::Po => &self.pos,
            MatchKeyField::Style => &self.styles,
            MatchKeyField::Pf => &self.pfs,
            MatchKeyField::Color => &self.colors,
        }
    }

    fn values_mut(&mut self, field: MatchKeyField) -> &mut Vec<String> {
        match field {
            MatchKeyField::LineNumber => &mut self.line_numbers,
            MatchKeyField::Buyer => &mut self.buyers,
            MatchKeyField::Po => &mut self.pos,
            MatchKeyField::Style => &mut self.styles,
            MatchKeyField::Pf => &mut self.pfs,
            MatchKeyField::Color => &mut self.colors,
        }
    }
}
