//! 作业存储操作

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::errors::{LmsError, Result};
use crate::models::assignments::{entities::Assignment, requests::CreateAssignmentRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 在课程下创建作业，调用方负责校验满分与权重
    pub async fn create_assignment_impl(
        &self,
        course_id: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(course_id),
            title: Set(req.title.trim().to_string()),
            max_mark: Set(req.max_mark),
            weight: Set(req.weight),
            due_date: Set(req.due_date.timestamp()),
            assignment_type: Set(req.assignment_type.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建作业失败: {e}")))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取作业
    pub async fn get_assignment_by_id_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(assignment_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 列出课程作业，按截止时间升序
    pub async fn list_course_assignments_impl(&self, course_id: i64) -> Result<Vec<Assignment>> {
        let result = Assignments::find()
            .filter(Column::CourseId.eq(course_id))
            .order_by_asc(Column::DueDate)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业列表失败: {e}")))?;

        Ok(result.into_iter().map(|m| m.into_assignment()).collect())
    }
}
