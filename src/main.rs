// ==========================================
// 学生积分管理系统 - 命令行入口
// ==========================================
// 用法:
//   student-score [rankings]        打印排名
//   student-score export <file>     导出 JSON 快照
//   student-score import <file>     导入 JSON 快照（全量替换）
// 数据库: STUDENT_SCORE_DB_PATH, 名单: STUDENT_SCORE_ROSTER 或 --roster <file>
// ==========================================

use anyhow::{bail, Context};
use student_score::app::{get_default_db_path, AppState};
use student_score::{logging, RankingSortKey, Roster, ScoreStore};

fn main() -> anyhow::Result<()> {
    logging::init();

    let mut args: Vec<String> = std::env::args().skip(1).collect();
    let roster = match take_flag(&mut args, "--roster") {
        Some(path) => Roster::from_json_file(&path).with_context(|| format!("读取名单失败: {}", path))?,
        None => Roster::from_env().context("解析 STUDENT_SCORE_ROSTER 失败")?,
    };

    tracing::info!("{} v{}", student_score::APP_NAME, student_score::VERSION);
    let state = AppState::new(get_default_db_path(), &roster)
        .context("无法打开积分数据库")?;

    match args.first().map(String::as_str) {
        None | Some("rankings") => {
            let sort_key = RankingSortKey::parse(args.get(1).map(String::as_str).unwrap_or("total"));
            print_rankings(&state.store, sort_key)?;
        }
        Some("export") => {
            let Some(path) = args.get(1) else {
                bail!("用法: student-score export <file>");
            };
            state.store.export_to_file(path)?;
            println!("已导出到 {}", path);
        }
        Some("import") => {
            let Some(path) = args.get(1) else {
                bail!("用法: student-score import <file>");
            };
            let summary = state.store.import_from_file(path)?;
            println!(
                "导入完成: 学生 {}, 扣分 {}, 补偿 {}, 加分 {} (跳过重叠 {}), 小组 {}, 锁定时间段 {}",
                summary.students,
                summary.deduction_records,
                summary.compensation_records,
                summary.addition_records,
                summary.skipped_additions,
                summary.groups,
                summary.locked_time_periods,
            );
        }
        Some(other) => bail!("未知命令: {} (可用: rankings / export / import)", other),
    }
    Ok(())
}

/// 取出 `--flag value` 参数
fn take_flag(args: &mut Vec<String>, flag: &str) -> Option<String> {
    let idx = args.iter().position(|a| a == flag)?;
    args.remove(idx);
    if idx < args.len() {
        Some(args.remove(idx))
    } else {
        None
    }
}

fn print_rankings(store: &ScoreStore, sort_key: RankingSortKey) -> anyhow::Result<()> {
    println!("== 总分排名 ==");
    for (i, e) in store.total_score_ranking()?.iter().enumerate() {
        println!(
            "{:>3}. {:<8} 总分 {:>7.1} (初始 {:.1} + 加分 {:.1} - 扣分 {:.1})",
            i + 1,
            e.student_name,
            e.total_score,
            e.initial_score,
            e.addition_points,
            e.deduction_points
        );
    }

    println!("== 扣分排名 ==");
    for (i, e) in store.deduction_ranking(sort_key)?.iter().enumerate() {
        println!(
            "{:>3}. {:<8} 违规 {:.1} 非违规 {:.1} 合计 {:.1}",
            i + 1,
            e.student_name,
            e.violation_points,
            e.non_violation_points,
            e.total_points
        );
    }

    println!("== 加分排名 ==");
    for (i, e) in store.addition_ranking()?.iter().enumerate() {
        println!("{:>3}. {:<8} 加分 {:.1}", i + 1, e.student_name, e.addition_points);
    }

    let groups = store.group_ranking(None)?;
    if !groups.is_empty() {
        println!("== 小组排名 ==");
        for (i, g) in groups.iter().enumerate() {
            println!("{:>3}. {:<8} 加分 {:.1}", i + 1, g.group_name, g.total_points);
        }
    }
    Ok(())
}
