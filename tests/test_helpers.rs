// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的临时数据库、名单、测试数据
// ==========================================

#![allow(dead_code)]

use chrono::NaiveDate;
use student_score::{Roster, ScoreStore};
use tempfile::NamedTempFile;

/// 测试名单
pub const ROSTER: [&str; 5] = ["张三", "李四", "王五", "赵六", "孙七"];

pub fn test_roster() -> Roster {
    Roster::from_names(ROSTER).expect("test roster")
}

/// 创建临时文件数据库并按测试名单初始化
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - ScoreStore: 已打开的积分存储
pub fn create_test_store() -> (NamedTempFile, ScoreStore) {
    student_score::logging::init_test();
    let temp_file = NamedTempFile::new().expect("temp db file");
    let store = ScoreStore::open(temp_file.path(), &test_roster()).expect("open store");
    (temp_file, store)
}

/// 内存库（不需要文件的测试）
pub fn create_memory_store() -> ScoreStore {
    student_score::logging::init_test();
    ScoreStore::open_in_memory(&test_roster()).expect("open in-memory store")
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// 按姓名取学生ID
pub fn student_id(store: &ScoreStore, name: &str) -> i64 {
    store
        .get_student(name)
        .expect("student exists")
        .id
        .expect("persisted student has id")
}
