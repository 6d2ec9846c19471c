//! 提交存储操作

use super::SeaOrmStorage;
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions, Model};
use crate::errors::{LmsError, Result};
use crate::models::submissions::{entities::Submission, requests::SubmitWorkRequest};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 提交作业；已提交过则替换内容和提交时间，已有评分保留
    ///
    /// 单条 upsert 写入，同一参与者的并发首次提交不会触发唯一索引冲突。
    pub async fn upsert_submission_impl(
        &self,
        assignment_id: i64,
        req: SubmitWorkRequest,
    ) -> Result<(Submission, bool)> {
        let now = chrono::Utc::now().timestamp();
        let participant_id = req.participant_id;

        let existed = self
            .find_submission_model(assignment_id, participant_id)
            .await?
            .is_some();

        let model = ActiveModel {
            assignment_id: Set(assignment_id),
            participant_id: Set(participant_id),
            content: Set(req.content),
            submitted_at: Set(now),
            ..Default::default()
        };

        Submissions::insert(model)
            .on_conflict(
                OnConflict::columns([Column::AssignmentId, Column::ParticipantId])
                    .update_columns([Column::Content, Column::SubmittedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("写入提交失败: {e}")))?;

        let saved = self
            .find_submission_model(assignment_id, participant_id)
            .await?
            .ok_or_else(|| {
                LmsError::database_operation(format!(
                    "提交写入后未找到: assignment {assignment_id}, participant {participant_id}"
                ))
            })?;

        Ok((saved.into_submission(), !existed))
    }

    async fn find_submission_model(
        &self,
        assignment_id: i64,
        participant_id: i64,
    ) -> Result<Option<Model>> {
        Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::ParticipantId.eq(participant_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))
    }

    /// 通过 ID 获取提交
    pub async fn get_submission_by_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(submission_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 获取参与者在某作业下的提交
    pub async fn get_submission_by_assignment_and_participant_impl(
        &self,
        assignment_id: i64,
        participant_id: i64,
    ) -> Result<Option<Submission>> {
        let result = self
            .find_submission_model(assignment_id, participant_id)
            .await?;
        Ok(result.map(|m| m.into_submission()))
    }
}
