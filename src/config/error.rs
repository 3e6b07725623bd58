// ==========================================
// 学生积分管理系统 - 配置模块错误类型
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("名单文件不存在: {0}")]
    FileNotFound(String),

    #[error("名单文件读取失败: {0}")]
    FileReadError(String),

    #[error("名单解析失败: {0}")]
    ParseError(String),

    #[error("名单为空")]
    EmptyRoster,

    #[error("名单中存在重复姓名: {0}")]
    DuplicateName(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
