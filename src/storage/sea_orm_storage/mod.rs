//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod assignments;
mod courses;
mod gradebook;
mod grades;
mod submissions;
mod users;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{LmsError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        Self::connect(&AppConfig::get().database).await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LmsError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        // 内存库每个连接都是独立的数据库，只能使用单连接且不能被回收
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.pool_size)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .connect_with(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(LmsError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 课程模块
    async fn create_course(&self, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn get_course_by_name(&self, name: &str) -> Result<Option<Course>> {
        self.get_course_by_name_impl(name).await
    }

    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        course_id: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(course_id, assignment).await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn list_course_assignments(&self, course_id: i64) -> Result<Vec<Assignment>> {
        self.list_course_assignments_impl(course_id).await
    }

    // 提交模块
    async fn upsert_submission(
        &self,
        assignment_id: i64,
        submission: SubmitWorkRequest,
    ) -> Result<(Submission, bool)> {
        self.upsert_submission_impl(assignment_id, submission).await
    }

    async fn get_submission_by_id(&self, submission_id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(submission_id).await
    }

    async fn get_submission_by_assignment_and_participant(
        &self,
        assignment_id: i64,
        participant_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_by_assignment_and_participant_impl(assignment_id, participant_id)
            .await
    }

    // 评分模块
    async fn upsert_grade(
        &self,
        submission_id: i64,
        record: GradeRecord,
    ) -> Result<(Grade, GradeWriteOutcome)> {
        self.upsert_grade_impl(submission_id, record).await
    }

    async fn get_grade_by_submission_id(&self, submission_id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_submission_id_impl(submission_id).await
    }

    // 报表读模型
    async fn load_gradebook_source(
        &self,
        course_id: i64,
        participant_id: Option<i64>,
    ) -> Result<Option<GradebookSource>> {
        self.load_gradebook_source_impl(course_id, participant_id)
            .await
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// 每个测试独立的内存数据库
    pub async fn memory_storage() -> SeaOrmStorage {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            pool_size: 1,
            timeout: 5,
        };
        SeaOrmStorage::connect(&config)
            .await
            .expect("failed to open in-memory database")
    }

    /// 文件数据库，多连接，用于并发写入测试
    pub async fn file_storage(dir: &std::path::Path, pool_size: u32) -> SeaOrmStorage {
        let config = DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", dir.join("lms_gradebook.db").display()),
            pool_size,
            timeout: 5,
        };
        SeaOrmStorage::connect(&config)
            .await
            .expect("failed to open file database")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("lms.db").unwrap(),
            "sqlite://lms.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("sqlite::memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://localhost/lms").is_ok());
        assert!(SeaOrmStorage::build_database_url("redis://localhost").is_err());
    }
}
