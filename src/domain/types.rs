// ==========================================
// 缝制线生产跟踪系统 - 领域类型定义
// ==========================================
// 职责: 匹配键、尺码/色差键、记录类型、余量状态
// 红线: 匹配键比较为精确、区分大小写的字符串比较
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==========================================
// MatchKey - 生产批次匹配键
// ==========================================
// 六元组 (线号, 客户, PO, 款式, PF, 颜色) 唯一确定一个投入批次 (cohort)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchKey {
    pub line_number: String,
    pub buyer: String,
    pub po: String,
    pub style: String,
    pub pf: String,
    pub color: String,
}

impl MatchKey {
    pub fn new(
        line_number: impl Into<String>,
        buyer: impl Into<String>,
        po: impl Into<String>,
        style: impl Into<String>,
        pf: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            line_number: line_number.into(),
            buyer: buyer.into(),
            po: po.into(),
            style: style.into(),
            pf: pf.into(),
            color: color.into(),
        }
    }

    /// 六个字段全部非空时才允许参与汇总
    ///
    /// 仅含空白字符的字段视为空
    pub fn is_complete(&self) -> bool {
        MatchKeyField::ALL
            .iter()
            .all(|field| !self.get(*field).trim().is_empty())
    }

    /// 读取单个字段
    pub fn get(&self, field: MatchKeyField) -> &str {
        match field {
            MatchKeyField::LineNumber => &self.line_number,
            MatchKeyField::Buyer => &self.buyer,
            MatchKeyField::Po => &self.po,
            MatchKeyField::Style => &self.style,
            MatchKeyField::Pf => &self.pf,
            MatchKeyField::Color => &self.color,
        }
    }

    /// 写入单个字段
    pub fn set(&mut self, field: MatchKeyField, value: impl Into<String>) {
        let value = value.into();
        match field {
            MatchKeyField::LineNumber => self.line_number = value,
            MatchKeyField::Buyer => self.buyer = value,
            MatchKeyField::Po => self.po = value,
            MatchKeyField::Style => self.style = value,
            MatchKeyField::Pf => self.pf = value,
            MatchKeyField::Color => self.color = value,
        }
    }
}

impl fmt::Display for MatchKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}/{}",
            self.line_number, self.buyer, self.po, self.style, self.pf, self.color
        )
    }
}

// ==========================================
// MatchKeyField - 匹配键字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchKeyField {
    LineNumber,
    Buyer,
    Po,
    Style,
    Pf,
    Color,
}

impl MatchKeyField {
    pub const ALL: [MatchKeyField; 6] = [
        MatchKeyField::LineNumber,
        MatchKeyField::Buyer,
        MatchKeyField::Po,
        MatchKeyField::Style,
        MatchKeyField::Pf,
        MatchKeyField::Color,
    ];

    /// 数据库列名 / 导入表头
    pub fn column_name(&self) -> &'static str {
        match self {
            MatchKeyField::LineNumber => "line_number",
            MatchKeyField::Buyer => "buyer",
            MatchKeyField::Po => "po",
            MatchKeyField::Style => "style",
            MatchKeyField::Pf => "pf",
            MatchKeyField::Color => "color",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "line_number" | "linenumber" | "line" => Some(MatchKeyField::LineNumber),
            "buyer" => Some(MatchKeyField::Buyer),
            "po" => Some(MatchKeyField::Po),
            "style" => Some(MatchKeyField::Style),
            "pf" => Some(MatchKeyField::Pf),
            "color" | "colour" => Some(MatchKeyField::Color),
            _ => None,
        }
    }
}

impl fmt::Display for MatchKeyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.column_name())
    }
}

// ==========================================
// SizeShadeKey - 尺码/色差键
// ==========================================
// 以元组为键，尺码本身可以包含 '-'
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SizeShadeKey {
    pub size: String,
    pub shade: String,
}

impl SizeShadeKey {
    pub fn new(size: impl Into<String>, shade: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            shade: shade.into(),
        }
    }
}

impl fmt::Display for SizeShadeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.size, self.shade)
    }
}

// ==========================================
// RecordKind - 记录类型（决定ID前缀）
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordKind {
    Employee,
    Input,
    Output,
}

impl RecordKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            RecordKind::Employee => "EMP",
            RecordKind::Input => "INP",
            RecordKind::Output => "OUT",
        }
    }

    /// 生成新记录ID: 类型前缀 + UUID v4
    pub fn generate_id(&self) -> String {
        format!(
            "{}{}",
            self.prefix(),
            Uuid::new_v4().simple().to_string().to_uppercase()
        )
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Employee => write!(f, "employee"),
            RecordKind::Input => write!(f, "input"),
            RecordKind::Output => write!(f, "output"),
        }
    }
}

// ==========================================
// Gender - 性别
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
    Other,
}

impl Gender {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value.trim() {
            "Female" => Gender::Female,
            "Other" => Gender::Other,
            _ => Gender::Male,
        }
    }
}

// ==========================================
// BalanceStatus - 余量状态
// ==========================================
// 负余量是合法结果（超出投入的产出），不是错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BalanceStatus {
    Open,        // 仍有余量
    Complete,    // 余量为0
    OverShipped, // 超出投入
}

impl BalanceStatus {
    pub fn from_balance(balance: i64) -> Self {
        match balance {
            b if b > 0 => BalanceStatus::Open,
            0 => BalanceStatus::Complete,
            _ => BalanceStatus::OverShipped,
        }
    }
}

impl fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BalanceStatus::Open => write!(f, "OPEN"),
            BalanceStatus::Complete => write!(f, "COMPLETE"),
            BalanceStatus::OverShipped => write!(f, "OVER_SHIPPED"),
        }
    }
}

// ==========================================
// optional_date - 可空日期的序列化
// ==========================================
// 与前端记录格式对齐: 空字符串 <-> None, "YYYY-MM-DD" <-> Some
pub mod optional_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}
