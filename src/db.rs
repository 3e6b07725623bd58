// ==========================================
// 学生积分管理系统 - SQLite 连接与建库
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为（外键约束必须每个连接开启）
// - 统一建表/索引/旧库补列, 幂等执行
// - 名单初始化: 只补齐缺失学生, 不覆盖已有初始分
// ==========================================

use rusqlite::{params, Connection, OptionalExtension};
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 打开内存库（测试/临时计算用）
pub fn open_in_memory_connection() -> rusqlite::Result<Connection> {
    let conn = Connection::open_in_memory()?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 建表与索引（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT UNIQUE NOT NULL,
            initial_score REAL NOT NULL DEFAULT 0.0
        );

        CREATE TABLE IF NOT EXISTS deduction_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_name TEXT NOT NULL,
            points REAL NOT NULL,
            violation_behavior TEXT,
            treatment_measures TEXT,
            date TEXT NOT NULL,
            deduction_type INTEGER NOT NULL,
            violation_type INTEGER,
            reason TEXT,
            non_violation_type TEXT,
            FOREIGN KEY (student_name) REFERENCES students (name)
        );

        CREATE TABLE IF NOT EXISTS compensation_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            deduction_record_id INTEGER NOT NULL,
            old_points REAL NOT NULL,
            new_points REAL NOT NULL,
            reason TEXT NOT NULL,
            date TEXT NOT NULL,
            FOREIGN KEY (deduction_record_id) REFERENCES deduction_records (id)
        );

        CREATE TABLE IF NOT EXISTS addition_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_name TEXT NOT NULL,
            points REAL NOT NULL,
            reason TEXT,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            FOREIGN KEY (student_name) REFERENCES students (name)
        );

        CREATE TABLE IF NOT EXISTS groups (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS student_groups (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_name TEXT NOT NULL,
            group_id INTEGER NOT NULL,
            join_date TEXT NOT NULL,
            FOREIGN KEY (student_name) REFERENCES students (name),
            FOREIGN KEY (group_id) REFERENCES groups (id) ON DELETE CASCADE
        );

        CREATE TABLE IF NOT EXISTS config (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS locked_time_periods (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_deduction_student_name ON deduction_records(student_name);
        CREATE INDEX IF NOT EXISTS idx_deduction_date ON deduction_records(date);
        CREATE INDEX IF NOT EXISTS idx_compensation_deduction ON compensation_records(deduction_record_id);
        CREATE INDEX IF NOT EXISTS idx_addition_student_name ON addition_records(student_name);
        CREATE INDEX IF NOT EXISTS idx_addition_period ON addition_records(start_date, end_date);
        CREATE INDEX IF NOT EXISTS idx_student_groups_group ON student_groups(group_id);
        CREATE UNIQUE INDEX IF NOT EXISTS idx_student_groups_student ON student_groups(student_name);
        "#,
    )?;

    // 旧库补列: 早期版本的 deduction_records 缺少以下字段
    for (column, decl) in [
        ("violation_behavior", "TEXT"),
        ("treatment_measures", "TEXT"),
        ("reason", "TEXT"),
        ("non_violation_type", "TEXT"),
    ] {
        ensure_column(conn, "deduction_records", column, decl)?;
    }

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        params![CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 表缺列时补列（SQLite 仅支持 ADD COLUMN）
fn ensure_column(conn: &Connection, table: &str, column: &str, decl: &str) -> rusqlite::Result<()> {
    let has_col: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        params![table, column],
        |row| row.get(0),
    )?;
    if has_col > 0 {
        return Ok(());
    }

    tracing::info!(table, column, "旧库补列");
    conn.execute_batch(&format!("ALTER TABLE {} ADD COLUMN {} {};", table, column, decl))?;
    Ok(())
}

/// 按名单补齐学生（已存在的学生保持不变）
///
/// # 返回
/// - 新插入的学生数
pub fn seed_students<S: AsRef<str>>(conn: &Connection, names: &[S]) -> rusqlite::Result<usize> {
    let mut stmt = conn.prepare("INSERT OR IGNORE INTO students (name) VALUES (?1)")?;
    let mut inserted = 0;
    for name in names {
        let name = name.as_ref().trim();
        if name.is_empty() {
            continue;
        }
        inserted += stmt.execute(params![name])?;
    }
    Ok(inserted)
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
