// ==========================================
// 学生积分管理系统 - API层错误类型
// ==========================================
// 职责: 把 Repository 错误转换为调用方可读的错误, 并区分
// - 校验错误: 业务规则拒绝, 数据未变
// - 存储错误: 数据库/文件失败, 事务已回滚
// ==========================================

use crate::config::ConfigError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务校验错误
    // ==========================================
    #[error("补偿后扣分({requested})不能大于当前扣分({current}): record_id={record_id}")]
    CompensationExceedsPoints {
        record_id: i64,
        current: f64,
        requested: f64,
    },

    #[error("学生 {student_name} 在 {period} 已有加分记录(id={existing_id})")]
    AdditionPeriodOverlap {
        student_name: String,
        existing_id: i64,
        period: String,
    },

    #[error("学生 {student_name} 已在小组(id={group_id})中")]
    AlreadyInGroup { student_name: String, group_id: i64 },

    #[error("小组(id={group_id})成员已达到上限 {limit} 人")]
    GroupFull { group_id: i64, limit: usize },

    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 资源/存储错误
    // ==========================================
    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("数据约束违反: {0}")]
    ConstraintViolation(String),

    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 导入导出错误
    // ==========================================
    #[error("文件读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON 序列化失败: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("数据导入失败: {0}")]
    ImportError(String),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// 是否为业务校验错误（数据未发生任何变化）
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ApiError::CompensationExceedsPoints { .. }
                | ApiError::AdditionPeriodOverlap { .. }
                | ApiError::AlreadyInGroup { .. }
                | ApiError::GroupFull { .. }
                | ApiError::InvalidInput(_)
        )
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            // 业务校验错误原样透传
            RepositoryError::CompensationExceedsPoints {
                record_id,
                current,
                requested,
            } => ApiError::CompensationExceedsPoints {
                record_id,
                current,
                requested,
            },
            RepositoryError::AdditionPeriodOverlap {
                student_name,
                existing_id,
                period,
            } => ApiError::AdditionPeriodOverlap {
                student_name,
                existing_id,
                period,
            },
            RepositoryError::AlreadyInGroup {
                student_name,
                group_id,
            } => ApiError::AlreadyInGroup {
                student_name,
                group_id,
            },
            RepositoryError::GroupFull { group_id, limit } => ApiError::GroupFull { group_id, limit },
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }

            // 数据库错误
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::ConstraintViolation(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ForeignKeyViolation(msg) => {
                ApiError::ConstraintViolation(format!("外键约束违反: {}", msg))
            }
        }
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        RepositoryError::from(err).into()
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
