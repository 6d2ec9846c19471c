//! LMS Gradebook - 课程成绩汇总与报表服务
//!
//! 基于 Actix Web 构建，负责作业评分、课程总评汇总以及成绩报表导出。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `grading`: 评分换算与总评汇总（纯计算）
//! - `models`: 数据模型定义
//! - `report`: 报表排版与 XLSX 输出
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod grading;
pub mod models;
pub mod report;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
