// ==========================================
// 投入导入集成测试
// ==========================================
// 测试目标: CSV 导入 → SQLite 持久化 → 产出自动填充使用导入数据
// ==========================================

mod test_helpers;

use sewing_line_tracker::api::ApiError;
use sewing_line_tracker::app::AppState;
use sewing_line_tracker::logging;
use sewing_line_tracker::{DraftChange, MatchKeyField, SizeShadeKey};
use std::io::Write;
use tempfile::{Builder, NamedTempFile};
use test_helpers::{create_test_db, scenario_key};

fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = Builder::new().suffix(".csv").tempfile().expect("无法创建临时CSV");
    for line in lines {
        writeln!(file, "{}", line).expect("写入CSV失败");
    }
    file
}

#[test]
fn test_imported_inputs_drive_autofill() {
    logging::init_test();
    let (_db_file, db_path) = create_test_db().expect("无法创建测试环境");
    let state = AppState::new(db_path).expect("无法创建AppState");

    let csv = write_csv(&[
        "date,line_number,buyer,po,style,pf,color,sewing_finish_date,size,shade,quantity",
        "2024-07-20,5,H&M,PO123,Basic Tee,PF001,Black,2024/07/30,M,A,500",
        "2024-07-20,5,H&M,PO123,Basic Tee,PF001,Black,2024/07/30,L,A,700",
        "2024-07-22,5,H&M,PO123,Basic Tee,PF001,Black,20240801,M,A,300",
        "2024-07-22,,H&M,PO123,Basic Tee,PF001,Black,20240801,M,A,999",
    ]);

    let report = state.input_api.import_from_file(csv.path()).expect("导入失败");
    assert_eq!(report.imported_records, 2);
    assert_eq!(report.imported_rows, 3);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].row, 5);

    let options = state.output_api.match_key_options();
    assert_eq!(options.line_numbers, vec!["5"]);

    let key = scenario_key();
    let mut draft = state.output_api.new_draft();
    for field in MatchKeyField::ALL {
        draft = state.output_api.apply_change(
            &draft,
            &DraftChange::MatchKeyField {
                field,
                value: key.get(field).to_string(),
            },
        );
    }

    let m = draft
        .record
        .row(&SizeShadeKey::new("M", "A"))
        .expect("M/A 行应存在");
    assert_eq!(m.input_quantity, 800);
    assert_eq!(
        draft.record.sewing_finish_date,
        chrono::NaiveDate::from_ymd_opt(2024, 7, 30),
        "缝制完成日期取首条匹配投入"
    );
}

#[test]
fn test_reimport_with_ids_replaces_records() {
    let (_db_file, db_path) = create_test_db().expect("无法创建测试环境");
    let state = AppState::new(db_path).expect("无法创建AppState");

    let header = "input_id,line_number,buyer,po,style,pf,color,size,shade,quantity";
    let first = write_csv(&[header, "INP9,5,H&M,PO123,Basic Tee,PF001,Black,M,A,100"]);
    let second = write_csv(&[header, "INP9,5,H&M,PO123,Basic Tee,PF001,Black,M,A,150"]);

    state.input_api.import_from_file(first.path()).unwrap();
    state.input_api.import_from_file(second.path()).unwrap();

    let inputs = state.input_api.list_inputs();
    assert_eq!(inputs.len(), 1);
    assert_eq!(inputs[0].total_quantity, 150);
}

#[test]
fn test_unsupported_file_is_reported() {
    let (_db_file, db_path) = create_test_db().expect("无法创建测试环境");
    let state = AppState::new(db_path).expect("无法创建AppState");

    let file = Builder::new().suffix(".txt").tempfile().unwrap();
    let result = state.input_api.import_from_file(file.path());
    assert!(matches!(result, Err(ApiError::ImportError(_))));
    assert!(state.input_api.list_inputs().is_empty());
}
