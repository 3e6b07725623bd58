// ==========================================
// 学生积分管理系统 - 仓储层错误类型
// ==========================================
// 分两类:
// - 校验错误: 业务规则拒绝, 未写入任何数据
// - 存储错误: I/O / 锁 / 约束失败, 事务已回滚
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 业务校验错误 =====
    #[error("补偿后扣分不能大于原扣分值: record_id={record_id}, current={current}, requested={requested}")]
    CompensationExceedsPoints {
        record_id: i64,
        current: f64,
        requested: f64,
    },

    #[error("该时间段内已存在加分记录: student={student_name}, existing_id={existing_id}, period={period}")]
    AdditionPeriodOverlap {
        student_name: String,
        existing_id: i64,
        period: String,
    },

    #[error("学生已在小组中: student={student_name}, group_id={group_id}")]
    AlreadyInGroup { student_name: String, group_id: i64 },

    #[error("小组成员已达到上限: group_id={group_id}, limit={limit}")]
    GroupFull { group_id: i64, limit: usize },

    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },

    // ===== 数据库错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),
}

impl RepositoryError {
    /// 是否为业务校验错误（与存储错误区分上报）
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            RepositoryError::CompensationExceedsPoints { .. }
                | RepositoryError::AdditionPeriodOverlap { .. }
                | RepositoryError::AlreadyInGroup { .. }
                | RepositoryError::GroupFull { .. }
                | RepositoryError::FieldValueError { .. }
        )
    }

    pub(crate) fn not_found(entity: &str, id: impl ToString) -> Self {
        RepositoryError::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn field(field: &str, message: impl Into<String>) -> Self {
        RepositoryError::FieldValueError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// 实现 From<rusqlite::Error>
impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => {
                if msg.contains("UNIQUE") {
                    RepositoryError::UniqueConstraintViolation(msg)
                } else if msg.contains("FOREIGN KEY") {
                    RepositoryError::ForeignKeyViolation(msg)
                } else {
                    RepositoryError::DatabaseQueryError(msg)
                }
            }
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "Unknown".to_string(),
                id: "Unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_classification() {
        let overlap = RepositoryError::AdditionPeriodOverlap {
            student_name: "张三".to_string(),
            existing_id: 1,
            period: "2024-01-01 至 2024-01-10".to_string(),
        };
        assert!(overlap.is_validation());
        assert!(!RepositoryError::LockError("poisoned".to_string()).is_validation());
        assert!(!RepositoryError::not_found("Student", "x").is_validation());
    }

    #[test]
    fn test_foreign_key_failure_is_classified() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(787),
            Some("FOREIGN KEY constraint failed".to_string()),
        );
        assert!(matches!(
            RepositoryError::from(err),
            RepositoryError::ForeignKeyViolation(_)
        ));
    }
}
