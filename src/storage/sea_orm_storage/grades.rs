//! 评分存储操作

use super::SeaOrmStorage;
use crate::entity::grades::{ActiveModel, Column, Entity as Grades, Model};
use crate::errors::{LmsError, Result};
use crate::grading::GradeRecord;
use crate::models::grades::entities::{Grade, GradeWriteOutcome};
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 写入评分
    ///
    /// 同一提交只有一条评分，重新评分时原地覆盖（后写入者生效）。
    /// 与已存储结果一致时不写库，评分时间保持不变。
    /// 写入是单条 upsert 语句，并发评分不会因 SQLite 写锁升级失败。
    pub async fn upsert_grade_impl(
        &self,
        submission_id: i64,
        record: GradeRecord,
    ) -> Result<(Grade, GradeWriteOutcome)> {
        let existing = self.find_grade_model(submission_id).await?;

        if let Some(model) = existing.as_ref() {
            let stored = GradeRecord {
                raw_mark: model.raw_mark,
                final_mark: model.final_mark,
                has_passed: model.has_passed,
                feedback: model.feedback.clone(),
                marker_id: model.marker_id,
                graded_at: crate::entity::from_timestamp(model.graded_at),
            };
            if stored.same_result(&record) {
                return Ok((model.clone().into_grade(), GradeWriteOutcome::Unchanged));
            }
        }

        let active = ActiveModel {
            submission_id: Set(submission_id),
            marker_id: Set(record.marker_id),
            raw_mark: Set(record.raw_mark),
            final_mark: Set(record.final_mark),
            has_passed: Set(record.has_passed),
            feedback: Set(record.feedback),
            graded_at: Set(record.graded_at.timestamp()),
            ..Default::default()
        };

        Grades::insert(active)
            .on_conflict(
                OnConflict::column(Column::SubmissionId)
                    .update_columns([
                        Column::MarkerId,
                        Column::RawMark,
                        Column::FinalMark,
                        Column::HasPassed,
                        Column::Feedback,
                        Column::GradedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("写入评分失败: {e}")))?;

        let outcome = if existing.is_some() {
            GradeWriteOutcome::Updated
        } else {
            GradeWriteOutcome::Created
        };

        // 并发写入时读到的是最后一次写入的结果
        let model = self.find_grade_model(submission_id).await?.ok_or_else(|| {
            LmsError::database_operation(format!("评分写入后未找到: submission {submission_id}"))
        })?;

        Ok((model.into_grade(), outcome))
    }

    async fn find_grade_model(&self, submission_id: i64) -> Result<Option<Model>> {
        Grades::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询评分失败: {e}")))
    }

    /// 通过提交 ID 获取评分
    pub async fn get_grade_by_submission_id_impl(
        &self,
        submission_id: i64,
    ) -> Result<Option<Grade>> {
        let result = self.find_grade_model(submission_id).await?;
        Ok(result.map(|m| m.into_grade()))
    }
}
