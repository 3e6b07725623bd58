use super::ScoreStore;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::group::{Group, GroupMember};

impl ScoreStore {
    // ==========================================
    // 小组
    // ==========================================

    /// 创建小组
    pub fn create_group(&self, name: &str, description: Option<&str>) -> ApiResult<i64> {
        Ok(self.group_repo.create(name, description)?)
    }

    /// 删除小组（成员关系一并删除）
    pub fn delete_group(&self, group_id: i64) -> ApiResult<()> {
        Ok(self.group_repo.delete(group_id)?)
    }

    pub fn get_group(&self, group_id: i64) -> ApiResult<Group> {
        self.group_repo
            .find_by_id(group_id)?
            .ok_or_else(|| ApiError::NotFound(format!("小组(id={})不存在", group_id)))
    }

    /// 全部小组（按名称）
    pub fn list_groups(&self) -> ApiResult<Vec<Group>> {
        Ok(self.group_repo.list_all()?)
    }

    /// 添加小组成员
    ///
    /// 学生已属于任一小组（含本组）或小组已满时拒绝, 成员关系不变
    pub fn add_member(&self, student_id: i64, group_id: i64) -> ApiResult<()> {
        Ok(self.group_repo.add_member(student_id, group_id)?)
    }

    pub fn remove_member(&self, group_id: i64, student_id: i64) -> ApiResult<()> {
        Ok(self.group_repo.remove_member(group_id, student_id)?)
    }

    /// 小组成员（按姓名）
    pub fn group_members(&self, group_id: i64) -> ApiResult<Vec<GroupMember>> {
        Ok(self.group_repo.members(group_id)?)
    }

    /// 清除全部小组与成员关系
    pub fn clear_group_data(&self) -> ApiResult<(usize, usize)> {
        Ok(self.group_repo.clear_all()?)
    }
}
