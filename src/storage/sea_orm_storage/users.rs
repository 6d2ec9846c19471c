use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{LmsError, Result};
use crate::models::users::{entities::User, requests::CreateUserRequest};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        // 未填写显示名时使用用户名
        let display_name = req
            .display_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| req.username.clone());

        let model = ActiveModel {
            username: Set(req.username),
            display_name: Set(display_name),
            role: Set(req.role.to_string()),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("创建用户失败: {e}")))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("查询用户失败: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("统计用户数量失败: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use crate::models::users::{entities::UserRole, requests::CreateUserRequest};
    use crate::storage::sea_orm_storage::testing::memory_storage;

    #[tokio::test]
    async fn test_create_and_find_user() {
        let storage = memory_storage().await;
        let user = storage
            .create_user_impl(CreateUserRequest {
                username: "alice".to_string(),
                display_name: None,
                role: UserRole::Staff,
            })
            .await
            .unwrap();

        assert_eq!(user.display_name, "alice");
        assert_eq!(user.role, UserRole::Staff);

        let found = storage.get_user_by_username_impl("alice").await.unwrap();
        assert_eq!(found.map(|u| u.id), Some(user.id));
        assert!(storage.get_user_by_id_impl(999).await.unwrap().is_none());
        assert_eq!(storage.count_users_impl().await.unwrap(), 1);
    }
}
