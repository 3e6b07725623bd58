// ==========================================
// 学生积分管理系统 - 日志初始化
// ==========================================
// tracing + tracing-subscriber
// 日志级别: RUST_LOG 环境变量, 默认 info
// 输出格式: STUDENT_SCORE_LOG_FORMAT=json 时输出结构化 JSON
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

/// 日志格式环境变量
pub const LOG_FORMAT_ENV: &str = "STUDENT_SCORE_LOG_FORMAT";

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// 初始化日志系统
///
/// # 环境变量
/// - RUST_LOG: 日志级别过滤器（默认: info）
///   例如: RUST_LOG=student_score=debug
/// - STUDENT_SCORE_LOG_FORMAT: `json` 输出 JSON 行, 其他值输出文本
///
/// # 示例
/// ```no_run
/// use student_score::logging;
/// logging::init();
/// ```
pub fn init() {
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // 重复初始化时忽略（二进制与库可能各自调用）
    if json {
        let _ = fmt()
            .json()
            .with_env_filter(env_filter("info"))
            .with_target(true)
            .try_init();
    } else {
        let _ = fmt()
            .with_env_filter(env_filter("info"))
            .with_target(true)
            .with_thread_ids(false)
            .with_line_number(true)
            .try_init();
    }
}

/// 初始化测试环境的日志系统
///
/// 使用 debug 级别并写入测试输出
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
