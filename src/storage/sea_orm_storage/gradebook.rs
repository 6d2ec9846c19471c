//! 报表读模型
//!
//! 按需批量读取课程、作业、提交、评分和提交者，不做关联图的整体加载。

use std::collections::BTreeSet;

use super::SeaOrmStorage;
use crate::entity::prelude::{Assignments, Courses, Grades, Submissions, Users};
use crate::entity::{assignments, grades, submissions, users};
use crate::errors::{LmsError, Result};
use crate::grading::GradebookSource;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    pub async fn load_gradebook_source_impl(
        &self,
        course_id: i64,
        participant_id: Option<i64>,
    ) -> Result<Option<GradebookSource>> {
        // 1. 课程
        let Some(course) = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程失败: {e}")))?
        else {
            return Ok(None);
        };

        // 2. 作业
        let assignments = Assignments::find()
            .filter(assignments::Column::CourseId.eq(course_id))
            .order_by_asc(assignments::Column::DueDate)
            .order_by_asc(assignments::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询作业失败: {e}")))?;
        let assignment_ids: Vec<i64> = assignments.iter().map(|a| a.id).collect();

        // 3. 提交（可限定参与者）
        let submissions = if assignment_ids.is_empty() {
            Vec::new()
        } else {
            let mut select =
                Submissions::find().filter(submissions::Column::AssignmentId.is_in(assignment_ids));
            if let Some(pid) = participant_id {
                select = select.filter(submissions::Column::ParticipantId.eq(pid));
            }
            select
                .all(&self.db)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询提交失败: {e}")))?
        };

        // 4. 评分
        let submission_ids: Vec<i64> = submissions.iter().map(|s| s.id).collect();
        let grades = if submission_ids.is_empty() {
            Vec::new()
        } else {
            Grades::find()
                .filter(grades::Column::SubmissionId.is_in(submission_ids))
                .all(&self.db)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询评分失败: {e}")))?
        };

        // 5. 提交者
        let participant_ids: BTreeSet<i64> = submissions
            .iter()
            .map(|s| s.participant_id)
            .chain(participant_id)
            .collect();
        let participants = if participant_ids.is_empty() {
            Vec::new()
        } else {
            Users::find()
                .filter(users::Column::Id.is_in(participant_ids))
                .all(&self.db)
                .await
                .map_err(|e| LmsError::database_operation(format!("查询用户失败: {e}")))?
        };

        Ok(Some(GradebookSource {
            course: course.into_course(),
            assignments: assignments.into_iter().map(|m| m.into_assignment()).collect(),
            participants: participants.into_iter().map(|m| m.into_user()).collect(),
            submissions: submissions
                .into_iter()
                .map(|m| m.into_submission())
                .collect(),
            grades: grades.into_iter().map(|m| m.into_grade()).collect(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use crate::grading::{GradedSubset, build_gradebook, grade_submission};
    use crate::models::assignments::{entities::AssignmentType, requests::CreateAssignmentRequest};
    use crate::models::courses::requests::CreateCourseRequest;
    use crate::models::grades::entities::GradeWriteOutcome;
    use crate::models::submissions::requests::SubmitWorkRequest;
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::storage::sea_orm_storage::{SeaOrmStorage, testing::memory_storage};

    async fn user(storage: &SeaOrmStorage, username: &str, name: &str, role: UserRole) -> i64 {
        storage
            .create_user_impl(CreateUserRequest {
                username: username.to_string(),
                display_name: Some(name.to_string()),
                role,
            })
            .await
            .unwrap()
            .id
    }

    async fn assignment(
        storage: &SeaOrmStorage,
        course_id: i64,
        title: &str,
        max_mark: f64,
        weight: f64,
        day: u32,
    ) -> i64 {
        storage
            .create_assignment_impl(
                course_id,
                CreateAssignmentRequest {
                    title: title.to_string(),
                    max_mark,
                    weight,
                    due_date: Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap(),
                    assignment_type: AssignmentType::Written,
                },
            )
            .await
            .unwrap()
            .id
    }

    async fn submit(storage: &SeaOrmStorage, assignment_id: i64, participant_id: i64) -> i64 {
        storage
            .upsert_submission_impl(
                assignment_id,
                SubmitWorkRequest {
                    participant_id,
                    content: Some("work".to_string()),
                },
            )
            .await
            .unwrap()
            .0
            .id
    }

    #[tokio::test]
    async fn test_regrade_overwrites_and_is_idempotent() {
        let storage = memory_storage().await;
        let marker = user(&storage, "marker", "Marker", UserRole::Staff).await;
        let student = user(&storage, "bob", "Bob", UserRole::Student).await;
        let course = storage
            .create_course_impl(CreateCourseRequest {
                name: "Rust 101".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let essay = assignment(&storage, course.id, "Essay", 20.0, 0.5, 5).await;
        let submission = submit(&storage, essay, student).await;

        let at = Utc.with_ymd_and_hms(2025, 3, 6, 9, 0, 0).unwrap();
        let record = grade_submission(15.0, 20.0, Some("ok".into()), marker, at).unwrap();

        let (first, outcome) = storage
            .upsert_grade_impl(submission, record.clone())
            .await
            .unwrap();
        assert_eq!(outcome, GradeWriteOutcome::Created);
        assert_eq!(first.final_mark, 75.0);
        assert!(first.has_passed);

        // 相同输入再次评分：结果不变，评分时间保持
        let later = Utc.with_ymd_and_hms(2025, 3, 7, 9, 0, 0).unwrap();
        let again = grade_submission(15.0, 20.0, Some("ok".into()), marker, later).unwrap();
        let (second, outcome) = storage.upsert_grade_impl(submission, again).await.unwrap();
        assert_eq!(outcome, GradeWriteOutcome::Unchanged);
        assert_eq!(second.id, first.id);
        assert_eq!(second.graded_at, at);

        // 不同输入覆盖原评分
        let changed = grade_submission(8.0, 20.0, None, marker, later).unwrap();
        let (third, outcome) = storage.upsert_grade_impl(submission, changed).await.unwrap();
        assert_eq!(outcome, GradeWriteOutcome::Updated);
        assert_eq!(third.id, first.id);
        assert_eq!(third.final_mark, 40.0);
        assert!(!third.has_passed);
        assert_eq!(third.graded_at, later);

        let stored = storage
            .get_grade_by_submission_id_impl(submission)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.raw_mark, 8.0);
        assert_eq!(stored.feedback, None);
    }

    #[tokio::test]
    async fn test_resubmission_keeps_single_row() {
        let storage = memory_storage().await;
        let student = user(&storage, "bob", "Bob", UserRole::Student).await;
        let course = storage
            .create_course_impl(CreateCourseRequest {
                name: "Rust 101".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let essay = assignment(&storage, course.id, "Essay", 20.0, 0.5, 5).await;

        let (first, created) = storage
            .upsert_submission_impl(
                essay,
                SubmitWorkRequest {
                    participant_id: student,
                    content: Some("draft".to_string()),
                },
            )
            .await
            .unwrap();
        assert!(created);

        let (second, created) = storage
            .upsert_submission_impl(
                essay,
                SubmitWorkRequest {
                    participant_id: student,
                    content: Some("final".to_string()),
                },
            )
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(second.content.as_deref(), Some("final"));
    }

    #[tokio::test]
    async fn test_load_gradebook_source() {
        let storage = memory_storage().await;
        let marker = user(&storage, "marker", "Marker", UserRole::Staff).await;
        let bob = user(&storage, "bob", "Bob", UserRole::Student).await;
        let alice = user(&storage, "alice", "Alice", UserRole::Student).await;
        let _carol = user(&storage, "carol", "Carol", UserRole::Student).await;

        let course = storage
            .create_course_impl(CreateCourseRequest {
                name: "Rust 101".to_string(),
                description: None,
            })
            .await
            .unwrap();
        let other = storage
            .create_course_impl(CreateCourseRequest {
                name: "Other".to_string(),
                description: None,
            })
            .await
            .unwrap();

        let project = assignment(&storage, course.id, "Final Project", 100.0, 0.5, 20).await;
        let essay = assignment(&storage, course.id, "Essay", 10.0, 0.3, 5).await;
        let quiz = assignment(&storage, course.id, "Quiz", 50.0, 0.2, 10).await;
        let unrelated = assignment(&storage, other.id, "Elsewhere", 10.0, 1.0, 1).await;

        let at = Utc::now();
        let bob_essay = submit(&storage, essay, bob).await;
        let bob_quiz = submit(&storage, quiz, bob).await;
        submit(&storage, quiz, alice).await;
        submit(&storage, unrelated, alice).await;
        storage
            .upsert_grade_impl(bob_essay, grade_submission(8.0, 10.0, None, marker, at).unwrap())
            .await
            .unwrap();
        storage
            .upsert_grade_impl(bob_quiz, grade_submission(30.0, 50.0, None, marker, at).unwrap())
            .await
            .unwrap();

        let source = storage
            .load_gradebook_source_impl(course.id, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(source.assignments.len(), 3);
        assert_eq!(source.assignments[2].id, project);
        assert_eq!(source.submissions.len(), 3);
        assert_eq!(source.grades.len(), 2);
        assert_eq!(source.participants.len(), 2);

        let book = build_gradebook(&source, &GradedSubset);
        let names: Vec<_> = book.rows.iter().map(|r| r.display_name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);
        assert_eq!(book.rows[1].final_mark.display(), "72%");
        assert_eq!(book.rows[0].cells[1].display(), "Submitted");

        // 指定参与者时只读取其提交
        let only_alice = storage
            .load_gradebook_source_impl(course.id, Some(alice))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(only_alice.submissions.len(), 1);
        assert!(only_alice.grades.is_empty());
        assert_eq!(only_alice.participants.len(), 1);

        assert!(
            storage
                .load_gradebook_source_impl(9999, None)
                .await
                .unwrap()
                .is_none()
        );
    }
}
