// ==========================================
// 导出 / 导入集成测试
// ==========================================
// 测试目标: 导出再导入后数据按值一致; 导入失败时原数据不变
// ==========================================

mod test_helpers;

use student_score::api::backup_path_for;
use student_score::{
    AdditionRecord, ApiError, Compensation, DataSnapshot, DeductionRecord, DeductionType,
    ScoreStore, ViolationType,
};
use test_helpers::{create_memory_store, create_test_store, date, student_id};

fn populate(store: &ScoreStore) {
    store.update_initial_score("张三", 8.0).unwrap();
    let id = store
        .add_deduction(
            &DeductionRecord::violation("张三", 3.0, date(2024, 9, 2), ViolationType::StudyHallMisconduct)
                .with_behavior("自习讲话")
                .with_reason("第二次"),
        )
        .unwrap();
    store
        .compensate(id, 1.0, Some("写检讨"), &Compensation::new("主动认错", date(2024, 9, 3)))
        .unwrap();
    store
        .add_deduction(&DeductionRecord::non_violation("李四", 1.0, date(2024, 9, 4), "病假"))
        .unwrap();
    store
        .add_addition(
            &AdditionRecord::new("王五", 2.0, date(2024, 9, 1), date(2024, 9, 30)).with_reason("值日"),
        )
        .unwrap();
    store
        .add_locked_period("九月", date(2024, 9, 1), date(2024, 9, 30))
        .unwrap();
    store.config().set("class_name", "三年二班").unwrap();

    let g = store.create_group("一组", Some("前排")).unwrap();
    store.add_member(student_id(store, "王五"), g).unwrap();
}

/// 去掉导出时间, 只比较数据
fn data_of(store: &ScoreStore) -> DataSnapshot {
    DataSnapshot {
        exported_at: None,
        ..store.export_snapshot().unwrap()
    }
}

#[test]
fn test_export_then_import_round_trip() {
    let (_src_file, source) = create_test_store();
    populate(&source);

    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("export.json");
    source.export_to_file(&json_path).unwrap();

    let (target_file, target) = create_test_store();
    // 目标库已有的数据会被替换
    target
        .add_deduction(&DeductionRecord::non_violation("孙七", 9.0, date(2024, 1, 1), "旧数据"))
        .unwrap();

    let summary = target.import_from_file(&json_path).unwrap();
    assert_eq!(summary.compensation_records, 1);
    assert_eq!(summary.skipped_additions, 0);
    assert_eq!(data_of(&source), data_of(&target));

    // 文件库导入前已备份
    assert!(backup_path_for(target_file.path()).exists());
}

#[test]
fn test_import_into_memory_store() {
    let source = create_memory_store();
    populate(&source);
    let snapshot = source.export_snapshot().unwrap();

    let target = create_memory_store();
    target.import_snapshot(&snapshot).unwrap();
    assert_eq!(data_of(&source), data_of(&target));
    assert_eq!(target.config().get("class_name").unwrap().as_deref(), Some("三年二班"));
}

#[test]
fn test_failed_import_leaves_store_unchanged() {
    let store = create_memory_store();
    populate(&store);
    let before = data_of(&store);

    let mut broken = before.clone();
    broken.deduction_records.push(DeductionRecord::non_violation(
        "名单外",
        1.0,
        date(2024, 9, 5),
        "迟到",
    ));

    let err = store.import_snapshot(&broken).unwrap_err();
    assert!(matches!(err, ApiError::ImportError(_)));
    assert_eq!(data_of(&store), before);
}

#[test]
fn test_import_rejects_malformed_file() {
    let (_file, store) = create_test_store();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"students": []}"#).unwrap();

    assert!(matches!(
        store.import_from_file(&path).unwrap_err(),
        ApiError::Serialization(_)
    ));
    assert_eq!(store.list_students().unwrap().len(), 5);
}

#[test]
fn test_import_legacy_export_with_integer_codes() {
    let (_file, store) = create_test_store();
    let fixture = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/legacy_export.json");

    let summary = store.import_from_file(fixture).unwrap();
    assert_eq!(summary.students, 3);
    assert_eq!(summary.deduction_records, 2);
    assert_eq!(summary.compensation_records, 1);
    assert_eq!(summary.addition_records, 1);

    let late = store.get_deduction(1).unwrap().expect("deduction 1 imported");
    assert_eq!(late.deduction_type, DeductionType::Violation);
    assert_eq!(late.violation_type, Some(ViolationType::LateHomework));
    assert_eq!(late.date, date(2024, 3, 4));

    // 带时间部分的日期只保留日期
    let sick = store.get_deduction(2).unwrap().expect("deduction 2 imported");
    assert_eq!(sick.deduction_type, DeductionType::NonViolation);
    assert_eq!(sick.date, date(2024, 3, 5));
    assert_eq!(store.compensation_records(1).unwrap()[0].date, date(2024, 3, 6));

    let additions = store.list_additions("王五").unwrap();
    assert_eq!(additions[0].start_date, date(2024, 3, 1));
    assert_eq!(additions[0].end_date, date(2024, 3, 31));

    // 再次导出时写枚举名
    let json = serde_json::to_string(&store.export_snapshot().unwrap()).unwrap();
    assert!(json.contains("\"LATE_HOMEWORK\""));
}
