use super::DeductionRepository;
use crate::db::{init_schema, open_in_memory_connection, seed_students};
use crate::domain::deduction::{Compensation, DeductionFilter, DeductionRecord};
use crate::domain::period::DateRange;
use crate::domain::types::{DeductionType, ViolationCategory, ViolationType};
use crate::repository::error::RepositoryError;
use chrono::NaiveDate;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

fn setup_test_db() -> Arc<Mutex<Connection>> {
    let conn = open_in_memory_connection().unwrap();
    init_schema(&conn).unwrap();
    seed_students(&conn, &["张三", "李四", "王五"]).unwrap();
    Arc::new(Mutex::new(conn))
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn count_rows(conn: &Arc<Mutex<Connection>>, table: &str) -> i64 {
    conn.lock()
        .unwrap()
        .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .unwrap()
}

#[test]
fn test_insert_and_list_newest_first() {
    let conn = setup_test_db();
    let repo = DeductionRepository::new(conn);

    repo.insert(&DeductionRecord::violation("张三", 2.0, d(2024, 3, 1), ViolationType::LateHomework))
        .unwrap();
    repo.insert(
        &DeductionRecord::non_violation("张三", 1.0, d(2024, 3, 5), "仪容仪表")
            .with_reason("未穿校服"),
    )
    .unwrap();
    repo.insert(&DeductionRecord::violation("李四", 3.0, d(2024, 3, 2), ViolationType::Plagiarism))
        .unwrap();

    let records = repo.find_by_student("张三").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].date, d(2024, 3, 5));
    assert_eq!(records[0].deduction_type, DeductionType::NonViolation);
    assert_eq!(records[0].reason.as_deref(), Some("未穿校服"));
    assert_eq!(records[1].violation_type, Some(ViolationType::LateHomework));
}

#[test]
fn test_insert_unknown_student_is_storage_error() {
    let conn = setup_test_db();
    let repo = DeductionRepository::new(conn);

    let err = repo
        .insert(&DeductionRecord::violation("赵六", 1.0, d(2024, 3, 1), ViolationType::MissingHomework))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::ForeignKeyViolation(_)));
    assert!(!err.is_validation());
}

#[test]
fn test_negative_points_rejected() {
    let conn = setup_test_db();
    let repo = DeductionRepository::new(conn.clone());

    let err = repo
        .insert(&DeductionRecord::violation("张三", -1.0, d(2024, 3, 1), ViolationType::MissingHomework))
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(count_rows(&conn, "deduction_records"), 0);
}

#[test]
fn test_batch_insert_rolls_back_on_bad_reference() {
    let conn = setup_test_db();
    let repo = DeductionRepository::new(conn.clone());

    let records = vec![
        DeductionRecord::violation("张三", 1.0, d(2024, 3, 1), ViolationType::MissingHomework),
        DeductionRecord::violation("李四", 1.0, d(2024, 3, 1), ViolationType::MissingHomework),
        DeductionRecord::violation("不存在", 1.0, d(2024, 3, 1), ViolationType::MissingHomework),
        DeductionRecord::violation("王五", 1.0, d(2024, 3, 1), ViolationType::MissingHomework),
        DeductionRecord::violation("张三", 1.0, d(2024, 3, 2), ViolationType::MissingHomework),
    ];

    assert!(repo.batch_insert(&records).is_err());
    assert_eq!(count_rows(&conn, "deduction_records"), 0);

    let mut good = records.clone();
    good.remove(2);
    let ids = repo.batch_insert(&good).unwrap();
    assert_eq!(ids.len(), 4);
    assert_eq!(count_rows(&conn, "deduction_records"), 4);
}

#[test]
fn test_compensation_sequence_is_monotonic() {
    let conn = setup_test_db();
    let repo = DeductionRepository::new(conn.clone());

    let id = repo
        .insert(
            &DeductionRecord::violation("张三", 5.0, d(2024, 3, 1), ViolationType::ClassroomMisconduct)
                .with_treatment("警告"),
        )
        .unwrap();

    let first = repo
        .compensate(id, 3.0, Some("警告, 已改正"), &Compensation::new("表现良好", d(2024, 3, 10)))
        .unwrap();
    assert_eq!(first.old_points, 5.0);
    assert_eq!(first.new_points, 3.0);

    // 增加扣分被拒绝, 数据不变
    let err = repo
        .compensate(id, 4.0, Some("不应写入"), &Compensation::new("错误操作", d(2024, 3, 11)))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::CompensationExceedsPoints { .. }));
    let record = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(record.points, 3.0);
    assert_eq!(record.treatment_measures.as_deref(), Some("警告, 已改正"));

    // None 保留原处理措施
    repo.compensate(id, 1.0, None, &Compensation::new("再次表现良好", d(2024, 3, 20)))
        .unwrap();
    let record = repo.find_by_id(id).unwrap().unwrap();
    assert_eq!(record.points, 1.0);
    assert_eq!(record.treatment_measures.as_deref(), Some("警告, 已改正"));

    let history = repo.find_compensations(id).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].old_points, 3.0);
    assert_eq!(history[0].new_points, 1.0);
    assert_eq!(repo.find_student_compensations("张三").unwrap().len(), 2);
    assert!(repo.find_student_compensations("李四").unwrap().is_empty());
    assert_eq!(count_rows(&conn, "compensation_records"), 2);
}

#[test]
fn test_compensate_missing_record() {
    let conn = setup_test_db();
    let repo = DeductionRepository::new(conn);

    let err = repo
        .compensate(42, 0.0, None, &Compensation::new("x", d(2024, 1, 1)))
        .unwrap_err();
    assert!(matches!(err, RepositoryError::NotFound { .. }));
}

#[test]
fn test_search_filters_are_conjunctive() {
    let conn = setup_test_db();
    let repo = DeductionRepository::new(conn);

    repo.insert(&DeductionRecord::violation("张三", 2.0, d(2024, 3, 1), ViolationType::LateHomework))
        .unwrap();
    repo.insert(&DeductionRecord::violation("张三", 5.0, d(2024, 3, 15), ViolationType::ClassroomMisconduct))
        .unwrap();
    repo.insert(&DeductionRecord::non_violation("张三", 1.0, d(2024, 3, 31), "迟到"))
        .unwrap();
    repo.insert(&DeductionRecord::violation("李四", 4.0, d(2024, 4, 1), ViolationType::HygieneFailure))
        .unwrap();

    let march = DateRange::new(d(2024, 3, 1), d(2024, 3, 31)).unwrap();
    let all_march = repo.search(&DeductionFilter::new().date_range(march)).unwrap();
    assert_eq!(all_march.len(), 3);
    assert_eq!(all_march[0].date, d(2024, 3, 31));

    let violations = repo
        .search(
            &DeductionFilter::new()
                .student("张三")
                .deduction_type(DeductionType::Violation)
                .points_between(Some(3.0), None),
        )
        .unwrap();
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].points, 5.0);

    let study = repo
        .search(&DeductionFilter::new().violation_category(ViolationCategory::Study))
        .unwrap();
    assert_eq!(study.len(), 1);

    let late = repo
        .search(&DeductionFilter::new().non_violation_type("迟到"))
        .unwrap();
    assert_eq!(late.len(), 1);
    assert_eq!(repo.non_violation_types().unwrap(), vec!["迟到".to_string()]);
}

#[test]
fn test_count_violations_grouped_by_student() {
    let conn = setup_test_db();
    let repo = DeductionRepository::new(conn);

    for day in [1, 10, 20] {
        repo.insert(&DeductionRecord::violation("张三", 1.0, d(2024, 1, day), ViolationType::MissingHomework))
            .unwrap();
    }
    repo.insert(&DeductionRecord::violation("李四", 1.0, d(2024, 1, 31), ViolationType::MissingHomework))
        .unwrap();
    repo.insert(&DeductionRecord::non_violation("李四", 1.0, d(2024, 1, 15), "迟到"))
        .unwrap();
    repo.insert(&DeductionRecord::violation("王五", 1.0, d(2024, 2, 1), ViolationType::MissingHomework))
        .unwrap();

    let january = DateRange::new(d(2024, 1, 1), d(2024, 1, 31)).unwrap();
    let counts = repo.count_violations(None, january).unwrap();
    assert_eq!(counts.len(), 2);
    let zhang = counts.iter().find(|c| c.student_name == "张三").unwrap();
    assert_eq!(zhang.count, 3);
    assert_eq!(zhang.period, "2024-01-01 至 2024-01-31");
    let li = counts.iter().find(|c| c.student_name == "李四").unwrap();
    assert_eq!(li.count, 1);

    let only_li = repo.count_violations(Some("李四"), january).unwrap();
    assert_eq!(only_li.len(), 1);
}

#[test]
fn test_clear_all_removes_compensations_too() {
    let conn = setup_test_db();
    let repo = DeductionRepository::new(conn.clone());

    let id = repo
        .insert(&DeductionRecord::violation("张三", 2.0, d(2024, 3, 1), ViolationType::LateHomework))
        .unwrap();
    repo.compensate(id, 1.0, None, &Compensation::new("补交", d(2024, 3, 2)))
        .unwrap();

    let (deductions, compensations) = repo.clear_all().unwrap();
    assert_eq!((deductions, compensations), (1, 1));
    assert_eq!(count_rows(&conn, "deduction_records"), 0);
    assert_eq!(count_rows(&conn, "compensation_records"), 0);
}

#[test]
fn test_unknown_violation_code_fails_read() {
    let conn = setup_test_db();
    let repo = DeductionRepository::new(conn.clone());

    let id = repo
        .insert(&DeductionRecord::violation("张三", 2.0, d(2024, 3, 1), ViolationType::LateHomework))
        .unwrap();
    conn.lock()
        .unwrap()
        .execute("UPDATE deduction_records SET violation_type = 9 WHERE id = ?1", [id])
        .unwrap();

    assert!(repo.find_by_id(id).is_err());
    assert!(repo.list_all().is_err());
}
