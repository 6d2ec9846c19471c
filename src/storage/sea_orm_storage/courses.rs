//! 课程存储操作

use super::SeaOrmStorage;
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::errors::{LmsError, Result};
use crate::models::{
    PaginationInfo,
    courses::{
        entities::Course,
        requests::{CourseListQuery, CreateCourseRequest},
        responses::CourseListResponse,
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name.trim().to_string()),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建课程失败: {e}")))?;

        Ok(result.into_course())
    }

    /// 通过 ID 获取课程
    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 通过名称获取课程
    pub async fn get_course_by_name_impl(&self, name: &str) -> Result<Option<Course>> {
        let result = Courses::find()
            .filter(Column::Name.eq(name.trim()))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程失败: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程
    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        let mut select = Courses::find();

        // 搜索条件
        if let Some(ref search) = query.search {
            let escaped = escape_like_pattern(search);
            select = select.filter(Column::Name.contains(&escaped));
        }

        // 排序
        select = select.order_by_asc(Column::Name);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程页数失败: {e}")))?;

        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询课程列表失败: {e}")))?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::models::courses::requests::{CourseListQuery, CreateCourseRequest};
    use crate::storage::sea_orm_storage::testing::memory_storage;

    #[tokio::test]
    async fn test_course_listing_and_search() {
        let storage = memory_storage().await;
        for name in ["Rust 101", "Databases", "Rust Advanced"] {
            storage
                .create_course_impl(CreateCourseRequest {
                    name: name.to_string(),
                    description: None,
                })
                .await
                .unwrap();
        }

        let all = storage
            .list_courses_with_pagination_impl(CourseListQuery {
                page: 1,
                size: 2,
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(all.pagination.total, 3);
        assert_eq!(all.pagination.total_pages, 2);
        assert_eq!(all.items[0].name, "Databases");

        let rust = storage
            .list_courses_with_pagination_impl(CourseListQuery {
                page: 1,
                size: 20,
                search: Some("Rust".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(rust.items.len(), 2);

        let found = storage.get_course_by_name_impl(" Databases ").await.unwrap();
        assert!(found.is_some());
    }
}
