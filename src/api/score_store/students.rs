use super::ScoreStore;
use crate::api::error::{ApiError, ApiResult};
use crate::domain::student::Student;

impl ScoreStore {
    // ==========================================
    // 学生
    // ==========================================

    /// 全部学生（按姓名排序）
    pub fn list_students(&self) -> ApiResult<Vec<Student>> {
        Ok(self.student_repo.list_all()?)
    }

    /// 按姓名查询学生
    pub fn get_student(&self, name: &str) -> ApiResult<Student> {
        self.student_repo
            .find_by_name(name)?
            .ok_or_else(|| ApiError::NotFound(format!("学生 {} 不存在", name)))
    }

    /// 按ID查询学生
    pub fn get_student_by_id(&self, student_id: i64) -> ApiResult<Student> {
        self.student_repo
            .find_by_id(student_id)?
            .ok_or_else(|| ApiError::NotFound(format!("学生(id={})不存在", student_id)))
    }

    /// 修改初始分（允许负数）
    pub fn update_initial_score(&self, name: &str, initial_score: f64) -> ApiResult<()> {
        if !initial_score.is_finite() {
            return Err(ApiError::InvalidInput(format!("初始分无效: {}", initial_score)));
        }
        self.student_repo.update_initial_score(name, initial_score)?;
        tracing::info!(student = name, initial_score, "修改初始分");
        Ok(())
    }
}
