// ==========================================
// 学生积分管理系统 - 小组仓储
// ==========================================
// 对齐: groups / student_groups 表
// 红线:
// - 一个学生最多属于一个小组 (student_groups.student_name 唯一索引兜底)
// - 小组成员不超过 MAX_GROUP_MEMBERS
// - 删除小组时成员关系同事务删除
// ==========================================

use crate::domain::group::{Group, GroupMember, GroupMembership, MAX_GROUP_MEMBERS};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::sql_utils::{fmt_date, fmt_datetime, row_date, row_datetime};
use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex, MutexGuard};

pub struct GroupRepository {
    conn: Arc<Mutex<Connection>>,
}

impl GroupRepository {
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Group> {
        Ok(Group {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            created_at: row_datetime(row, 3)?,
        })
    }

    // ==========================================
    // 小组
    // ==========================================

    /// 创建小组
    pub fn create(&self, name: &str, description: Option<&str>) -> RepositoryResult<i64> {
        if name.trim().is_empty() {
            return Err(RepositoryError::field("name", "小组名称不能为空"));
        }
        let conn = self.get_conn()?;
        conn.execute(
            "INSERT INTO groups (name, description, created_at) VALUES (?1, ?2, ?3)",
            params![name, description, fmt_datetime(Local::now().naive_local())],
        )?;
        let id = conn.last_insert_rowid();
        tracing::info!(id, name, "创建小组");
        Ok(id)
    }

    /// 插入一行小组（导入用, 保留原 id）
    pub(crate) fn insert_row(conn: &Connection, group: &Group) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO groups (id, name, description, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                group.id,
                group.name,
                group.description,
                fmt_datetime(group.created_at)
            ],
        )?;
        Ok(())
    }

    /// 删除小组及其成员关系
    pub fn delete(&self, group_id: i64) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let members = tx.execute(
            "DELETE FROM student_groups WHERE group_id = ?1",
            params![group_id],
        )?;
        let rows = tx.execute("DELETE FROM groups WHERE id = ?1", params![group_id])?;
        if rows == 0 {
            return Err(RepositoryError::not_found("Group", group_id));
        }
        tx.commit()?;
        tracing::info!(group_id, members, "删除小组");
        Ok(())
    }

    pub fn find_by_id(&self, group_id: i64) -> RepositoryResult<Option<Group>> {
        let conn = self.get_conn()?;
        let group = conn
            .query_row(
                "SELECT id, name, description, created_at FROM groups WHERE id = ?1",
                params![group_id],
                Self::map_row,
            )
            .optional()?;
        Ok(group)
    }

    /// 全部小组（按名称）
    pub fn list_all(&self) -> RepositoryResult<Vec<Group>> {
        let conn = self.get_conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, description, created_at FROM groups ORDER BY name, id")?;
        let groups = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(groups)
    }

    // ==========================================
    // 成员关系
    // ==========================================

    /// 添加小组成员
    ///
    /// # 返回
    /// - `Err(NotFound)`: 学生或小组不存在
    /// - `Err(AlreadyInGroup)`: 学生已属于某个小组（含本组）
    /// - `Err(GroupFull)`: 小组已满
    pub fn add_member(&self, student_id: i64, group_id: i64) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        let student_name: String = tx
            .query_row(
                "SELECT name FROM students WHERE id = ?1",
                params![student_id],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| RepositoryError::not_found("Student", student_id))?;

        let group_exists = tx
            .query_row("SELECT 1 FROM groups WHERE id = ?1", params![group_id], |_| Ok(()))
            .optional()?
            .is_some();
        if !group_exists {
            return Err(RepositoryError::not_found("Group", group_id));
        }

        let current_group: Option<i64> = tx
            .query_row(
                "SELECT group_id FROM student_groups WHERE student_name = ?1",
                params![student_name],
                |row| row.get(0),
            )
            .optional()?;
        if let Some(existing) = current_group {
            return Err(RepositoryError::AlreadyInGroup {
                student_name,
                group_id: existing,
            });
        }

        let size: i64 = tx.query_row(
            "SELECT COUNT(*) FROM student_groups WHERE group_id = ?1",
            params![group_id],
            |row| row.get(0),
        )?;
        if size as usize >= MAX_GROUP_MEMBERS {
            return Err(RepositoryError::GroupFull {
                group_id,
                limit: MAX_GROUP_MEMBERS,
            });
        }

        tx.execute(
            "INSERT INTO student_groups (student_name, group_id, join_date) VALUES (?1, ?2, ?3)",
            params![student_name, group_id, fmt_date(Local::now().date_naive())],
        )?;
        tx.commit()?;
        tracing::info!(student = %student_name, group_id, "添加小组成员");
        Ok(())
    }

    /// 插入一行成员关系（导入用）
    pub(crate) fn insert_membership_row(
        conn: &Connection,
        membership: &GroupMembership,
    ) -> rusqlite::Result<()> {
        conn.execute(
            "INSERT INTO student_groups (student_name, group_id, join_date) VALUES (?1, ?2, ?3)",
            params![
                membership.student_name,
                membership.group_id,
                fmt_date(membership.join_date)
            ],
        )?;
        Ok(())
    }

    /// 移除小组成员
    pub fn remove_member(&self, group_id: i64, student_id: i64) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let rows = conn.execute(
            r#"
            DELETE FROM student_groups
            WHERE group_id = ?1
              AND student_name = (SELECT name FROM students WHERE id = ?2)
            "#,
            params![group_id, student_id],
        )?;
        if rows == 0 {
            return Err(RepositoryError::not_found(
                "GroupMember",
                format!("group={}, student={}", group_id, student_id),
            ));
        }
        tracing::info!(group_id, student_id, "移除小组成员");
        Ok(())
    }

    /// 小组成员（按姓名）
    pub fn members(&self, group_id: i64) -> RepositoryResult<Vec<GroupMember>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT sg.student_name, s.id, sg.join_date
            FROM student_groups sg
            JOIN students s ON s.name = sg.student_name
            WHERE sg.group_id = ?1
            ORDER BY sg.student_name
            "#,
        )?;
        let members = stmt
            .query_map(params![group_id], |row| {
                Ok(GroupMember {
                    student_name: row.get(0)?,
                    student_id: row.get(1)?,
                    join_date: row_date(row, 2)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(members)
    }

    /// 全部成员关系（导出用）
    pub fn list_memberships(&self) -> RepositoryResult<Vec<GroupMembership>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT student_name, group_id, join_date FROM student_groups ORDER BY group_id, student_name",
        )?;
        let memberships = stmt
            .query_map([], |row| {
                Ok(GroupMembership {
                    student_name: row.get(0)?,
                    group_id: row.get(1)?,
                    join_date: row_date(row, 2)?,
                })
            })?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(memberships)
    }

    /// 清除全部小组与成员关系
    ///
    /// # 返回
    /// - (删除的小组数, 删除的成员关系数)
    pub fn clear_all(&self) -> RepositoryResult<(usize, usize)> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;
        let members = tx.execute("DELETE FROM student_groups", [])?;
        let groups = tx.execute("DELETE FROM groups", [])?;
        tx.commit()?;
        tracing::info!(groups, members, "清除全部小组数据");
        Ok((groups, members))
    }
}
