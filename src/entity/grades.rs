//! 评分实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub submission_id: i64,
    pub marker_id: i64,
    #[sea_orm(column_type = "Double")]
    pub raw_mark: f64,
    #[sea_orm(column_type = "Double")]
    pub final_mark: f64,
    pub has_passed: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub feedback: Option<String>,
    pub graded_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id"
    )]
    Submission,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::MarkerId",
        to = "super::users::Column::Id"
    )]
    Marker,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Marker.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_grade(self) -> crate::models::grades::entities::Grade {
        crate::models::grades::entities::Grade {
            id: self.id,
            submission_id: self.submission_id,
            marker_id: self.marker_id,
            raw_mark: self.raw_mark,
            final_mark: self.final_mark,
            has_passed: self.has_passed,
            feedback: self.feedback,
            graded_at: super::from_timestamp(self.graded_at),
        }
    }
}
