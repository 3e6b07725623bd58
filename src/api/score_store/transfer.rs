// ==========================================
// 数据导出 / 导入
// ==========================================
// 导出: 全部实体写入一个 JSON 文档 (DataSnapshot)
// 导入: 全量替换, 单事务; 文件库导入前先用 VACUUM INTO 备份为 <db>.bak
// ==========================================

use super::ScoreStore;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::snapshot::{DataSnapshot, ImportSummary};
use chrono::Local;
use rusqlite::params;
use std::path::{Path, PathBuf};

/// 导入前备份文件路径: `<db>.bak`
pub fn backup_path_for(db_path: &Path) -> PathBuf {
    let mut raw = db_path.as_os_str().to_owned();
    raw.push(".bak");
    PathBuf::from(raw)
}

impl ScoreStore {
    /// 读取全部数据为快照
    pub fn export_snapshot(&self) -> ApiResult<DataSnapshot> {
        let snapshot = DataSnapshot {
            exported_at: Some(Local::now().naive_local()),
            students: self.student_repo.list_all()?,
            deduction_records: self.deduction_repo.list_all()?,
            compensation_records: self.deduction_repo.list_all_compensations()?,
            addition_records: self.addition_repo.list_all()?,
            config: self.config_manager.list_all()?,
            locked_time_periods: self.locked_period_repo.list_all()?,
            groups: self.group_repo.list_all()?,
            group_memberships: self.group_repo.list_memberships()?,
        };
        tracing::info!(
            students = snapshot.students.len(),
            deductions = snapshot.deduction_records.len(),
            compensations = snapshot.compensation_records.len(),
            additions = snapshot.addition_records.len(),
            "导出数据快照"
        );
        Ok(snapshot)
    }

    /// 导出到 JSON 文件
    pub fn export_to_file(&self, path: impl AsRef<Path>) -> ApiResult<()> {
        let path = path.as_ref();
        let snapshot = self.export_snapshot()?;
        let json = serde_json::to_string_pretty(&snapshot)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), "数据已导出");
        Ok(())
    }

    /// 用快照替换全部数据
    ///
    /// 失败时事务回滚, 原数据保持不变
    pub fn import_snapshot(&self, snapshot: &DataSnapshot) -> ApiResult<ImportSummary> {
        if let Some(backup) = self.backup()? {
            tracing::info!(backup = %backup.display(), "导入前已备份数据库");
        }
        self.snapshot_repo.replace_all(snapshot).map_err(|e| {
            tracing::warn!(error = %e, "数据导入失败, 已回滚");
            if e.is_validation() {
                ApiError::from(e)
            } else {
                ApiError::ImportError(e.to_string())
            }
        })
    }

    /// 从 JSON 文件导入
    pub fn import_from_file(&self, path: impl AsRef<Path>) -> ApiResult<ImportSummary> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let snapshot: DataSnapshot = serde_json::from_str(&raw)?;
        tracing::info!(path = %path.display(), "读取导入文件");
        self.import_snapshot(&snapshot)
    }

    /// 文件库写出 `<db>.bak` 备份; 内存库跳过
    fn backup(&self) -> ApiResult<Option<PathBuf>> {
        let db_path = match &self.db_path {
            Some(path) => path,
            None => return Ok(None),
        };
        let backup = backup_path_for(db_path);
        if backup.exists() {
            std::fs::remove_file(&backup)?;
        }

        let conn = self
            .conn
            .lock()
            .map_err(|e| ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", e)))?;
        conn.execute("VACUUM INTO ?1", params![backup.to_string_lossy().into_owned()])?;
        Ok(Some(backup))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_path_appends_suffix() {
        assert_eq!(
            backup_path_for(Path::new("/data/score.db")),
            PathBuf::from("/data/score.db.bak")
        );
    }
}
