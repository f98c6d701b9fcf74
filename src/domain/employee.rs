// ==========================================
// 缝制线生产跟踪系统 - 员工领域模型
// ==========================================
// 用途: 员工档案（基础信息、技能、家庭信息、地址）
// 约束: id / name / designation 保存时必填
// ==========================================

use crate::domain::types::{optional_date, Gender, RecordKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ==========================================
// EmployeeSkill - 员工技能（品类 + 工序）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeSkill {
    pub item: String,    // 品类，例如 T-Shirt
    pub process: String, // 工序，例如 Neck Join
}

// ==========================================
// Employee - 员工档案
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    // ===== 基础信息 =====
    pub id: String,
    pub name: String,
    pub designation: String,
    pub line_number: String,
    #[serde(with = "optional_date", default)]
    pub join_date: Option<NaiveDate>,
    pub phone: String,
    pub skills: Vec<EmployeeSkill>,

    // ===== 个人信息 =====
    pub nid: String,
    pub father_name: String,
    pub mother_name: String,
    pub is_married: bool,
    pub gender: Gender,
    pub blood_group: String,

    // ===== 地址 =====
    pub division: String,
    pub district: String,
    pub upazila: String,
    pub thana: String,
    pub post_office: String,
    pub village: String,

    // ===== 照片（base64 data URL）=====
    pub photo: String,
}

impl Employee {
    /// 新员工档案：生成ID，预置一行空技能
    pub fn new_blank() -> Self {
        Self::with_id(RecordKind::Employee.generate_id())
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            designation: String::new(),
            line_number: String::new(),
            join_date: None,
            phone: String::new(),
            skills: vec![EmployeeSkill::default()],
            nid: String::new(),
            father_name: String::new(),
            mother_name: String::new(),
            is_married: false,
            gender: Gender::Male,
            blood_group: String::new(),
            division: String::new(),
            district: String::new(),
            upazila: String::new(),
            thana: String::new(),
            post_office: String::new(),
            village: String::new(),
            photo: String::new(),
        }
    }

    pub fn add_skill(&mut self) {
        self.skills.push(EmployeeSkill::default());
    }

    /// 删除技能行（至少保留一行）
    ///
    /// # 返回
    /// - true: 已删除
    /// - false: 仅剩一行或下标越界
    pub fn remove_skill(&mut self, index: usize) -> bool {
        if self.skills.len() <= 1 || index >= self.skills.len() {
            return false;
        }
        self.skills.remove(index);
        true
    }

    /// 缺失的必填字段
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.id.trim().is_empty() {
            missing.push("id");
        }
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.designation.trim().is_empty() {
            missing.push("designation");
        }
        missing
    }
}
