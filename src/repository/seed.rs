// ==========================================
// 缝制线生产跟踪系统 - 演示数据初始化
// ==========================================
// 用途: 开发便利，非必需行为
// 规则: 每类记录仅在为空时写入（2名员工、2条投入、无产出）
// ==========================================

use crate::domain::types::Gender;
use crate::domain::{Employee, EmployeeSkill, InputRecord, InputSizeShade, MatchKey};
use crate::repository::error::RepositoryResult;
use crate::repository::record_store::RecordStore;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

/// 演示数据写入结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub employees_seeded: usize,
    pub inputs_seeded: usize,
}

/// 存储为空时写入演示数据
pub fn seed_demo_data_if_empty(
    employees: &dyn RecordStore<Employee>,
    inputs: &dyn RecordStore<InputRecord>,
) -> RepositoryResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    if employees.is_empty()? {
        for employee in demo_employees() {
            employees.upsert(&employee)?;
            summary.employees_seeded += 1;
        }
    }

    if inputs.is_empty()? {
        for input in demo_inputs() {
            inputs.upsert(&input)?;
            summary.inputs_seeded += 1;
        }
    }

    info!(
        employees_seeded = summary.employees_seeded,
        inputs_seeded = summary.inputs_seeded,
        "演示数据初始化完成"
    );
    Ok(summary)
}

/// 演示员工
pub fn demo_employees() -> Vec<Employee> {
    let mut john = Employee::with_id("EMP001");
    john.name = "John Doe".to_string();
    john.designation = "Sewing Operator".to_string();
    john.line_number = "5".to_string();
    john.join_date = NaiveDate::from_ymd_opt(2023, 1, 15);
    john.phone = "01234567890".to_string();
    john.skills = vec![EmployeeSkill {
        item: "T-Shirt".to_string(),
        process: "Neck Join".to_string(),
    }];
    john.nid = "1234567890".to_string();
    john.father_name = "Richard Doe".to_string();
    john.mother_name = "Jane Doe".to_string();
    john.is_married = true;
    john.gender = Gender::Male;
    john.blood_group = "O+".to_string();
    john.division = "Dhaka".to_string();
    john.district = "Dhaka".to_string();
    john.upazila = "Savar".to_string();
    john.thana = "Savar".to_string();
    john.post_office = "Savar Cantt".to_string();
    john.village = "Hemayetpur".to_string();

    let mut jane = Employee::with_id("EMP002");
    jane.name = "Jane Smith".to_string();
    jane.designation = "Quality Inspector".to_string();
    jane.line_number = "3".to_string();
    jane.join_date = NaiveDate::from_ymd_opt(2022, 11, 20);
    jane.phone = "09876543210".to_string();
    jane.skills = vec![EmployeeSkill {
        item: "Polo Shirt".to_string(),
        process: "Button Attach".to_string(),
    }];
    jane.nid = "0987654321".to_string();
    jane.father_name = "John Smith".to_string();
    jane.mother_name = "Mary Smith".to_string();
    jane.is_married = false;
    jane.gender = Gender::Female;
    jane.blood_group = "A+".to_string();
    jane.division = "Chattogram".to_string();
    jane.district = "Chattogram".to_string();
    jane.upazila = "Pahartali".to_string();
    jane.thana = "Pahartali".to_string();
    jane.post_office = "CDA Market".to_string();
    jane.village = "AK Khan".to_string();

    vec![john, jane]
}

/// 演示投入记录
pub fn demo_inputs() -> Vec<InputRecord> {
    let mut basic_tee = InputRecord::new(
        "INP001",
        MatchKey::new("5", "H&M", "PO123", "Basic Tee", "PF001", "Black"),
        NaiveDate::from_ymd_opt(2024, 7, 30),
        vec![
            InputSizeShade::new("M", "A", 500),
            InputSizeShade::new("L", "A", 700),
        ],
    );
    basic_tee.date = NaiveDate::from_ymd_opt(2024, 7, 20);

    let mut polo = InputRecord::new(
        "INP002",
        MatchKey::new("3", "Zara", "PO456", "Polo", "PF002", "White"),
        NaiveDate::from_ymd_opt(2024, 8, 5),
        vec![
            InputSizeShade::new("S", "B", 300),
            InputSizeShade::new("M", "B", 400),
        ],
    );
    polo.date = NaiveDate::from_ymd_opt(2024, 7, 21);

    vec![basic_tee, polo]
}
