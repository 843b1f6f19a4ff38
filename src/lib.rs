//! Bookshelf - 个人读书记录 REST API
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Book Context: 书籍、阅读状态机、笔记、作者 / 出版社
//! - Stats: 名称归并与日期分桶计数
//!
//! 应用层 (application/):
//! - Ports: 端口定义（Repositories, IdentityVerifier, 查询规格）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API + Bearer 认证中间件
//! - Persistence: SQLite 存储
//! - Identity: token / 固定账户校验

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
