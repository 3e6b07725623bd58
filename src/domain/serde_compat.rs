// ==========================================
// 学生积分管理系统 - 旧版导出文件兼容
// ==========================================
// 旧版导出文件:
// - 扣分类型/违规类型写为整数代码 (1, 2, ...)
// - 日期可能带时间部分 ("2024-01-05T00:00:00")
// 写出路径始终使用枚举名与 YYYY-MM-DD
// ==========================================

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

pub const DATE_FMT: &str = "%Y-%m-%d";

/// 解析日期文本, 只取前 10 位日期部分
pub fn parse_date_prefix(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    let trimmed = raw.trim();
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, DATE_FMT)
}

/// 日期字段: 接受 "YYYY-MM-DD" 与带时间部分的 ISO 文本
pub fn lenient_date<'de, D>(d: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(d)?;
    parse_date_prefix(&raw)
        .map_err(|e| serde::de::Error::custom(format!("无法解析日期 {}: {}", raw, e)))
}

/// 枚举字段的原始取值: 整数代码或名称
pub(crate) enum CodeOrName {
    Code(i64),
    Name(String),
}

impl<'de> Deserialize<'de> for CodeOrName {
    fn deserialize<D>(d: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(d)? {
            serde_json::Value::String(s) => Ok(CodeOrName::Name(s)),
            serde_json::Value::Number(num) => num
                .as_i64()
                .map(CodeOrName::Code)
                .ok_or_else(|| serde::de::Error::custom(format!("无效的类型代码: {}", num))),
            other => Err(serde::de::Error::custom(format!(
                "类型字段应为整数代码或名称, 实际为: {}",
                other
            ))),
        }
    }
}
