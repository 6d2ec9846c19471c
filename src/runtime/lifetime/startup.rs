use crate::errors::Result;
use crate::models::users::entities::UserRole;
use crate::models::users::requests::CreateUserRequest;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

const DEFAULT_STAFF_USERNAME: &str = "staff";

/// 初始化默认评分账号
/// 如果数据库中没有任何用户，则创建一个 staff 账号，保证至少有人可以评分
pub(crate) async fn seed_staff(storage: &Arc<dyn Storage>) {
    match storage.count_users().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} user(s), skipping staff seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No users found in database, creating default staff account...");
        }
        Err(e) => {
            warn!("Failed to count users: {}, skipping staff seed", e);
            return;
        }
    }

    let username =
        std::env::var("STAFF_USERNAME").unwrap_or_else(|_| DEFAULT_STAFF_USERNAME.to_string());

    let staff_request = CreateUserRequest {
        username,
        display_name: Some("Course Staff".to_string()),
        role: UserRole::Staff,
    };

    match storage.create_user(staff_request).await {
        Ok(user) => {
            info!(
                "Default staff account created successfully (ID: {}, username: {})",
                user.id, user.username
            );
        }
        Err(e) => {
            warn!("Failed to create staff account: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
/// 连接数据库、执行迁移并写入初始数据
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_staff(&storage).await;

    Ok(StartupContext { storage })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sea_orm_storage::testing::memory_storage;

    #[tokio::test]
    async fn test_seed_staff_only_on_empty_database() {
        let storage: Arc<dyn Storage> = Arc::new(memory_storage().await);

        seed_staff(&storage).await;
        assert_eq!(storage.count_users().await.unwrap(), 1);
        let staff = storage
            .get_user_by_username(DEFAULT_STAFF_USERNAME)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(staff.role, UserRole::Staff);

        seed_staff(&storage).await;
        assert_eq!(storage.count_users().await.unwrap(), 1);
    }
}
