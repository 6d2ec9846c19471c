use std::sync::Arc;

use crate::grading::{GradeRecord, GradebookSource};
use crate::models::{
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest},
        responses::CourseListResponse,
    },
    grades::entities::{Grade, GradeWriteOutcome},
    submissions::{entities::Submission, requests::SubmitWorkRequest},
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;

    /// 课程管理方法
    // 创建课程
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course>;
    // 通过ID获取课程
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    // 通过名称获取课程
    async fn get_course_by_name(&self, name: &str) -> Result<Option<Course>>;
    // 列出课程
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;

    /// 作业管理方法
    // 在课程下创建作业
    async fn create_assignment(
        &self,
        course_id: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    // 通过ID获取作业
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    // 列出课程的作业（按截止时间升序）
    async fn list_course_assignments(&self, course_id: i64) -> Result<Vec<Assignment>>;

    /// 提交管理方法
    // 提交或重新提交作业，返回提交及是否为新建
    async fn upsert_submission(
        &self,
        assignment_id: i64,
        submission: SubmitWorkRequest,
    ) -> Result<(Submission, bool)>;
    // 通过ID获取提交
    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>>;
    // 获取参与者在某作业下的提交
    async fn get_submission_by_assignment_and_participant(
        &self,
        assignment_id: i64,
        participant_id: i64,
    ) -> Result<Option<Submission>>;

    /// 评分管理方法
    // 写入评分（新建或覆盖），在单个事务中完成
    async fn upsert_grade(
        &self,
        submission_id: i64,
        record: GradeRecord,
    ) -> Result<(Grade, GradeWriteOutcome)>;
    // 通过提交ID获取评分
    async fn get_grade_by_submission_id(&self, submission_id: i64) -> Result<Option<Grade>>;

    /// 报表读模型
    // 读取生成成绩册所需的全部行；指定参与者时只读取该参与者的提交
    async fn load_gradebook_source(
        &self,
        course_id: i64,
        participant_id: Option<i64>,
    ) -> Result<Option<GradebookSource>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
